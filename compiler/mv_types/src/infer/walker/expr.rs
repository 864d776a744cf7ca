//! Expression dispatch.
//!
//! [`infer_expr`] records the expected type, dispatches on [`ExprKind`] and
//! records the result. Each expression is typed at most once; a second
//! visit returns the recorded type.

use mv_ir::ast::{ExprKind, Lit};
use mv_ir::NodeId;
use mv_stack::ensure_sufficient_stack;

use crate::ty::{IntKind, Ty};

use super::{
    blocks, calls, control_flow, identifiers, lambdas, operators, sequences, structs, Expected,
    TypeWalker, Walk,
};

/// Infer the type of `expr` under `expected`.
#[tracing::instrument(level = "trace", skip(walker, expected))]
pub(super) fn infer_expr(walker: &mut TypeWalker<'_>, expr: NodeId, expected: Expected) -> Walk<Ty> {
    if let Some(ty) = walker.ctx.expr_types.get(&expr) {
        return Ok(ty.clone());
    }
    ensure_sufficient_stack(|| infer_expr_inner(walker, expr, expected))
}

/// Infer `expr` and coerce it to `expected`.
///
/// Returns `expected` when the coercion succeeded, the inferred type
/// otherwise.
pub(super) fn infer_expr_coercable_to(
    walker: &mut TypeWalker<'_>,
    expr: NodeId,
    expected: Ty,
) -> Walk<Ty> {
    let actual = infer_expr(walker, expr, Expected::from(expected.clone()))?;
    if walker.coerce_types(expr, &actual, &expected) {
        Ok(expected)
    } else {
        Ok(actual)
    }
}

fn infer_expr_inner(walker: &mut TypeWalker<'_>, expr: NodeId, expected: Expected) -> Walk<Ty> {
    if let Some(ty) = expected.ty() {
        walker.ctx.write_expected_expr_ty(expr, ty.clone());
    }
    let Some(kind) = walker.tree().as_expr(expr) else {
        return Ok(Ty::Unknown);
    };

    let ty = match kind {
        ExprKind::Lit(lit) => infer_lit(walker, lit),

        // Names
        ExprKind::Path(path) => identifiers::infer_path_expr(walker, *path, &expected)?,
        ExprKind::Call { path, args } => calls::infer_call(walker, expr, *path, args, &expected)?,
        ExprKind::MethodCall {
            receiver,
            name,
            type_args,
            args,
        } => calls::infer_method_call(walker, expr, *receiver, *name, type_args, args, &expected)?,

        // Structs
        ExprKind::Field { receiver, name } => structs::infer_field(walker, expr, *receiver, *name)?,
        ExprKind::StructLit { path, fields } => {
            structs::infer_struct_lit(walker, *path, fields, &expected)?
        }

        // Operators
        ExprKind::Borrow {
            mutable,
            expr: inner,
        } => operators::infer_borrow(walker, *mutable, *inner, &expected)?,
        ExprKind::Deref(inner) => operators::infer_deref(walker, expr, *inner)?,
        ExprKind::Not(inner) => {
            infer_expr_coercable_to(walker, *inner, Ty::Bool)?;
            Ty::Bool
        }
        ExprKind::Copy(inner) | ExprKind::Move(inner) => infer_expr(walker, *inner, expected)?,
        ExprKind::Binary { op, lhs, rhs } => operators::infer_binary(walker, *op, *lhs, *rhs)?,
        ExprKind::Assign { lhs, rhs } => operators::infer_assign(walker, *lhs, *rhs)?,

        // Control flow
        ExprKind::Block(block) => blocks::infer_block(walker, *block, expected, false)?,
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => control_flow::infer_if(walker, *cond, *then_branch, *else_branch, &expected)?,
        ExprKind::While { cond, body } => control_flow::infer_while(walker, *cond, *body)?,
        ExprKind::Loop { body } => control_flow::infer_loop(walker, *body)?,
        ExprKind::Return(value) => control_flow::infer_return(walker, *value)?,
        ExprKind::Abort(code) => {
            infer_expr_coercable_to(walker, *code, Ty::Integer(IntKind::U64))?;
            Ty::Never
        }
        ExprKind::Break | ExprKind::Continue => Ty::Never,
        ExprKind::Match { scrutinee, arms } => {
            control_flow::infer_match(walker, *scrutinee, arms, &expected)?
        }

        // Sequences
        ExprKind::Vector { elem_ty, elems } => {
            sequences::infer_vector_lit(walker, *elem_ty, elems, &expected)?
        }
        ExprKind::Tuple(items) => sequences::infer_tuple(walker, items, &expected)?,
        ExprKind::Unit => Ty::Unit,
        ExprKind::Index { base, index } => sequences::infer_index(walker, *base, *index)?,

        // Annotations
        ExprKind::Cast { expr: inner, ty } => {
            infer_expr(walker, *inner, Expected::NoValue)?;
            walker.lowering.lower_type(*ty)?
        }
        ExprKind::Annotated { expr: inner, ty } => {
            let ty = walker.lowering.lower_type(*ty)?;
            infer_expr_coercable_to(walker, *inner, ty.clone())?;
            ty
        }

        // Binders
        ExprKind::Lambda { params, .. } => lambdas::infer_lambda(walker, expr, params, &expected)?,
        ExprKind::Quant {
            bindings,
            where_clause,
            body,
            ..
        } => lambdas::infer_quant(walker, bindings, *where_clause, *body)?,
    };

    walker.ctx.write_expr_ty(expr, ty.clone());
    Ok(ty)
}

fn infer_lit(walker: &mut TypeWalker<'_>, lit: &Lit) -> Ty {
    match lit {
        Lit::Int {
            suffix: Some(suffix),
            ..
        } => Ty::Integer(IntKind::from(*suffix)),
        Lit::Int { suffix: None, .. } if walker.ctx.msl => Ty::Num,
        Lit::Int { suffix: None, .. } => walker.ctx.fresh_int_var(),
        Lit::Bool(_) => Ty::Bool,
        Lit::Address(_) => Ty::Address,
        Lit::ByteString => Ty::vector(Ty::Integer(IntKind::U8)),
    }
}
