//! Borrows, dereferences, binary operators and assignment.

use mv_ir::ast::BinaryOp;
use mv_ir::NodeId;

use crate::ty::{IntKind, Ty, TyInfer};
use crate::type_error::{TypeError, TypeErrorKind};

use super::expr::{infer_expr, infer_expr_coercable_to};
use super::{Expected, TypeWalker, Walk};

/// `&e` / `&mut e`; an expected reference passes its referent down.
pub(super) fn infer_borrow(
    walker: &mut TypeWalker<'_>,
    mutable: bool,
    inner: NodeId,
    expected: &Expected,
) -> Walk<Ty> {
    let expected = expected.ty().map(|ty| walker.ctx.resolve_vars_if_possible(ty));
    let inner_expected = match expected {
        Some(Ty::Reference { referenced, .. }) => Expected::from(*referenced),
        _ => Expected::NoValue,
    };
    let ty = infer_expr(walker, inner, inner_expected)?;
    Ok(Ty::reference(ty, mutable))
}

pub(super) fn infer_deref(walker: &mut TypeWalker<'_>, expr: NodeId, inner: NodeId) -> Walk<Ty> {
    let ty = infer_expr(walker, inner, Expected::NoValue)?;
    let ty = walker.ctx.resolve_vars_if_possible(&ty);
    Ok(match ty {
        Ty::Reference { referenced, .. } => *referenced,
        Ty::Unknown | Ty::Never | Ty::Infer(TyInfer::TyVar(_)) => Ty::Unknown,
        // References are transparent in specs.
        other if walker.ctx.msl => other,
        other => {
            walker
                .ctx
                .report(TypeError::new(expr, TypeErrorKind::InvalidDereference { ty: other }));
            Ty::Unknown
        }
    })
}

pub(super) fn infer_binary(
    walker: &mut TypeWalker<'_>,
    op: BinaryOp,
    lhs: NodeId,
    rhs: NodeId,
) -> Walk<Ty> {
    if op.is_logic() {
        infer_expr_coercable_to(walker, lhs, Ty::Bool)?;
        infer_expr_coercable_to(walker, rhs, Ty::Bool)?;
        return Ok(Ty::Bool);
    }
    if op.is_equality() {
        let lhs_ty = infer_expr(walker, lhs, Expected::NoValue)?;
        infer_expr_coercable_to(walker, rhs, lhs_ty)?;
        return Ok(Ty::Bool);
    }
    if op == BinaryOp::Range {
        infer_expr(walker, lhs, Expected::NoValue)?;
        infer_expr(walker, rhs, Expected::NoValue)?;
        return Ok(Ty::Primitive(walker.project().known().range));
    }

    let lhs_ty = infer_expr(walker, lhs, Expected::NoValue)?;
    let lhs_ok = check_integer_operand(walker, op, lhs, &lhs_ty);
    if op.is_shift() {
        infer_expr_coercable_to(walker, rhs, Ty::Integer(IntKind::U8))?;
    } else if lhs_ok {
        infer_expr_coercable_to(walker, rhs, lhs_ty.clone())?;
    } else {
        let rhs_ty = infer_expr(walker, rhs, Expected::NoValue)?;
        check_integer_operand(walker, op, rhs, &rhs_ty);
    }

    Ok(if op.is_ordering() {
        Ty::Bool
    } else if walker.ctx.msl {
        Ty::Num
    } else {
        walker.ctx.resolve_vars_if_possible(&lhs_ty)
    })
}

/// Arithmetic, bitwise and ordering operands must be integers. Types that
/// are not known yet pass.
fn check_integer_operand(walker: &mut TypeWalker<'_>, op: BinaryOp, operand: NodeId, ty: &Ty) -> bool {
    let ty = walker
        .ctx
        .resolve_vars_if_possible(ty)
        .refine_for_specs(walker.ctx.msl);
    let ok = ty.is_integer_like()
        || matches!(ty, Ty::Unknown | Ty::Never | Ty::Infer(TyInfer::TyVar(_)));
    if !ok {
        walker.ctx.report(TypeError::new(
            operand,
            TypeErrorKind::UnsupportedBinaryOp { op, ty },
        ));
    }
    ok
}

pub(super) fn infer_assign(walker: &mut TypeWalker<'_>, lhs: NodeId, rhs: NodeId) -> Walk<Ty> {
    let lhs_ty = infer_expr(walker, lhs, Expected::NoValue)?;
    infer_expr_coercable_to(walker, rhs, lhs_ty)?;
    Ok(Ty::Unit)
}
