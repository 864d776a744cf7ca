//! Vector literals, tuples and indexing.

use mv_ir::NodeId;

use crate::ty::{IntKind, Ty};

use super::expr::{infer_expr, infer_expr_coercable_to};
use super::{Expected, TypeWalker, Walk};

/// `vector<T>[a, b]`; without an annotation the element type comes from
/// the expectation or a fresh variable.
pub(super) fn infer_vector_lit(
    walker: &mut TypeWalker<'_>,
    elem_ty: Option<NodeId>,
    elems: &[NodeId],
    expected: &Expected,
) -> Walk<Ty> {
    let item = match elem_ty {
        Some(ty) => walker.lowering.lower_type(ty)?,
        None => match expected.ty().map(|ty| walker.ctx.resolve_vars_if_possible(ty)) {
            Some(Ty::Vector(item)) => *item,
            _ => walker.ctx.fresh_ty_var(None),
        },
    };
    for &elem in elems {
        infer_expr_coercable_to(walker, elem, item.clone())?;
    }
    Ok(Ty::vector(walker.ctx.resolve_vars_if_possible(&item)))
}

pub(super) fn infer_tuple(
    walker: &mut TypeWalker<'_>,
    items: &[NodeId],
    expected: &Expected,
) -> Walk<Ty> {
    let expected_items = match expected.ty().map(|ty| walker.ctx.resolve_vars_if_possible(ty)) {
        Some(Ty::Tuple(tys)) if tys.len() == items.len() => tys,
        _ => Vec::new(),
    };
    let mut tys = Vec::with_capacity(items.len());
    for (index, &item) in items.iter().enumerate() {
        let expectation = Expected::from_type(expected_items.get(index).cloned());
        tys.push(infer_expr(walker, item, expectation)?);
    }
    Ok(Ty::Tuple(tys))
}

/// `v[i]` on vectors; in specs also `v[range]` and `R[addr]` on resources.
pub(super) fn infer_index(walker: &mut TypeWalker<'_>, base: NodeId, index: NodeId) -> Walk<Ty> {
    let base_ty = infer_expr(walker, base, Expected::NoValue)?;
    let base_ty = walker.ctx.resolve_vars_if_possible(&base_ty).innermost().clone();
    match base_ty {
        Ty::Vector(item) if walker.ctx.msl => {
            let index_ty = infer_expr(walker, index, Expected::NoValue)?;
            let index_ty = walker.ctx.resolve_vars_if_possible(&index_ty);
            let range = walker.project().known().range;
            if matches!(index_ty, Ty::Primitive(name) if name == range) {
                return Ok(Ty::Vector(item));
            }
            walker.coerce_types(index, &index_ty, &Ty::Num);
            Ok(*item)
        }
        Ty::Vector(item) => {
            infer_expr_coercable_to(walker, index, Ty::Integer(IntKind::U64))?;
            Ok(*item)
        }
        adt @ Ty::Adt { .. } => {
            infer_expr_coercable_to(walker, index, Ty::Address)?;
            Ok(adt)
        }
        _ => {
            infer_expr(walker, index, Expected::NoValue)?;
            Ok(Ty::Unknown)
        }
    }
}
