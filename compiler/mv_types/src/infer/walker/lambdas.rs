//! Lambdas and spec quantifiers.
//!
//! A lambda's signature is settled when the lambda is reached, but its body
//! is deferred: the enclosing expression (usually a call) may still refine
//! the parameter types. Bodies are drained after the owner's own body, in
//! the order the lambdas were met.

use mv_ir::ast::ExprKind;
use mv_ir::NodeId;

use crate::ty::{CallableKind, Ty};

use super::expr::infer_expr_coercable_to;
use super::patterns::{collect_bindings, BindingMode};
use super::{Expected, TypeWalker, Walk};

pub(super) fn infer_lambda(
    walker: &mut TypeWalker<'_>,
    expr: NodeId,
    params: &[NodeId],
    expected: &Expected,
) -> Walk<Ty> {
    let (expected_params, expected_ret) =
        match expected.ty().map(|ty| walker.ctx.resolve_vars_if_possible(ty)) {
            Some(Ty::Callable { params, ret, .. }) => (params, Some(*ret)),
            _ => (Vec::new(), None),
        };

    let mut param_tys = Vec::with_capacity(params.len());
    for (index, &param) in params.iter().enumerate() {
        let Some(decl) = walker.tree().as_param(param) else {
            continue;
        };
        let ty = match (decl.ty, expected_params.get(index)) {
            (Some(annotation), _) => walker.lowering.lower_type(annotation)?,
            (None, Some(expected)) => expected.clone(),
            (None, None) => walker.ctx.fresh_ty_var(None),
        };
        collect_bindings(walker, decl.pat, &ty, BindingMode::ByValue)?;
        param_tys.push(ty);
    }
    let ret = expected_ret.unwrap_or_else(|| walker.ctx.fresh_ty_var(None));

    let ty = Ty::Callable {
        params: param_tys,
        ret: Box::new(ret),
        kind: CallableKind::Lambda,
    };
    walker.ctx.lambda_types.insert(expr, ty.clone());
    walker.ctx.lambda_queue.push_back(expr);
    Ok(ty)
}

/// Infer queued lambda bodies until none remain. A body may queue further
/// lambdas.
pub(super) fn drain_lambdas(walker: &mut TypeWalker<'_>) -> Walk<()> {
    loop {
        walker.check_cancelled()?;
        walker.ctx.resolve_all_vars_if_possible();
        let Some(lambda) = walker.ctx.lambda_queue.pop_front() else {
            break;
        };
        let Some(ExprKind::Lambda { body, .. }) = walker.tree().as_expr(lambda) else {
            continue;
        };
        let ret = match walker.ctx.lambda_types.get(&lambda) {
            Some(Ty::Callable { ret, .. }) => ret.as_ref().clone(),
            _ => Ty::Unknown,
        };
        let ret = walker.ctx.resolve_vars_if_possible(&ret);
        tracing::debug!(
            lambda = ?lambda,
            remaining = walker.ctx.lambda_queue.len(),
            "inferring lambda body"
        );
        infer_expr_coercable_to(walker, *body, ret)?;
    }
    Ok(())
}

/// `forall`/`exists`: bindings come into scope for the where clause and
/// the body, both predicates.
pub(super) fn infer_quant(
    walker: &mut TypeWalker<'_>,
    bindings: &[NodeId],
    where_clause: Option<NodeId>,
    body: NodeId,
) -> Walk<Ty> {
    walker.bind_params(bindings)?;
    if let Some(where_clause) = where_clause {
        infer_expr_coercable_to(walker, where_clause, Ty::Bool)?;
    }
    infer_expr_coercable_to(walker, body, Ty::Bool)?;
    Ok(Ty::Bool)
}
