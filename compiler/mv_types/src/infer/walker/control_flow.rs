//! Control flow inference: if, while, loop, return and match.

use mv_ir::ast::{ExprKind, NodeKind};
use mv_ir::{NodeId, SyntaxTree};

use crate::ty::Ty;

use super::expr::{infer_expr, infer_expr_coercable_to};
use super::patterns::{collect_bindings, BindingMode};
use super::{Expected, TypeWalker, Walk};

/// Infer an if expression. Without an else branch it is `()`; otherwise
/// both branches are intersected.
pub(super) fn infer_if(
    walker: &mut TypeWalker<'_>,
    cond: NodeId,
    then_branch: NodeId,
    else_branch: Option<NodeId>,
    expected: &Expected,
) -> Walk<Ty> {
    infer_expr_coercable_to(walker, cond, Ty::Bool)?;
    let then_ty = infer_expr(walker, then_branch, expected.clone())?;
    let Some(else_branch) = else_branch else {
        return Ok(Ty::Unit);
    };
    let else_ty = infer_expr(walker, else_branch, expected.clone())?;
    Ok(walker.intersect_types(&[(then_branch, then_ty), (else_branch, else_ty)]))
}

pub(super) fn infer_while(walker: &mut TypeWalker<'_>, cond: NodeId, body: NodeId) -> Walk<Ty> {
    infer_expr_coercable_to(walker, cond, Ty::Bool)?;
    infer_expr(walker, body, Expected::NoValue)?;
    Ok(Ty::Unit)
}

/// A loop only terminates through a `break`.
pub(super) fn infer_loop(walker: &mut TypeWalker<'_>, body: NodeId) -> Walk<Ty> {
    infer_expr(walker, body, Expected::NoValue)?;
    Ok(if breaks_out(walker.tree(), body) {
        Ty::Unit
    } else {
        Ty::Never
    })
}

/// Whether a `break` inside `node` targets the loop around it, ignoring
/// nested loops and lambdas.
fn breaks_out(tree: &SyntaxTree, node: NodeId) -> bool {
    match tree.kind(node) {
        NodeKind::Expr(ExprKind::Break) => true,
        NodeKind::Expr(
            ExprKind::Loop { .. } | ExprKind::While { .. } | ExprKind::Lambda { .. },
        ) => false,
        kind => kind
            .children()
            .into_iter()
            .any(|child| breaks_out(tree, child)),
    }
}

pub(super) fn infer_return(walker: &mut TypeWalker<'_>, value: Option<NodeId>) -> Walk<Ty> {
    if let Some(value) = value {
        let ret = walker.ret_ty.clone();
        infer_expr_coercable_to(walker, value, ret)?;
    }
    Ok(Ty::Never)
}

/// Arms bind their patterns against the scrutinee; guards are `bool`;
/// bodies are intersected.
pub(super) fn infer_match(
    walker: &mut TypeWalker<'_>,
    scrutinee: NodeId,
    arms: &[NodeId],
    expected: &Expected,
) -> Walk<Ty> {
    let scrutinee_ty = infer_expr(walker, scrutinee, Expected::NoValue)?;
    let scrutinee_ty = walker.ctx.resolve_vars_if_possible(&scrutinee_ty);
    let tree = walker.tree();
    let mut bodies = Vec::with_capacity(arms.len());
    for &arm in arms {
        let Some(arm) = tree.as_match_arm(arm) else {
            continue;
        };
        collect_bindings(walker, arm.pat, &scrutinee_ty, BindingMode::ByValue)?;
        if let Some(guard) = arm.guard {
            infer_expr_coercable_to(walker, guard, Ty::Bool)?;
        }
        let body_ty = infer_expr(walker, arm.body, expected.clone())?;
        bodies.push((arm.body, body_ty));
    }
    Ok(walker.intersect_types(&bodies))
}
