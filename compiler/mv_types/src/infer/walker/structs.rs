//! Field access and struct literals.

use mv_ir::ast::NodeKind;
use mv_ir::{Name, NodeId, SyntaxTree};

use crate::fold::{substitute, substitute_or_unknown};
use crate::lower::{adt_item, adt_substitution, fields_of};
use crate::ty::Ty;

use super::expr::{infer_expr, infer_expr_coercable_to};
use super::{Expected, TypeWalker, Walk};

/// `receiver.name`, looking through references. On enums the field is
/// taken from the first variant that declares it.
pub(super) fn infer_field(
    walker: &mut TypeWalker<'_>,
    expr: NodeId,
    receiver: NodeId,
    name: Name,
) -> Walk<Ty> {
    let receiver_ty = infer_expr(walker, receiver, Expected::NoValue)?;
    let receiver_ty = walker.ctx.resolve_vars_if_possible(&receiver_ty);
    let tree = walker.tree();
    let Ty::Adt { item, args } = receiver_ty.innermost() else {
        walker.ctx.resolved_fields.insert(expr, None);
        return Ok(Ty::Unknown);
    };
    let field = adt_field(tree, *item, name);
    walker.ctx.resolved_fields.insert(expr, field);
    let Some(field) = field else {
        return Ok(Ty::Unknown);
    };
    let subst = adt_substitution(tree, *item, args);
    Ok(substitute_or_unknown(&walker.lowering.decl_ty(field)?, &subst))
}

fn adt_field(tree: &SyntaxTree, item: NodeId, name: Name) -> Option<NodeId> {
    match tree.kind(item) {
        NodeKind::Struct(_) => named_field(tree, item, name),
        NodeKind::Enum(decl) => decl
            .variants
            .iter()
            .find_map(|&variant| named_field(tree, variant, name)),
        _ => None,
    }
}

/// Field `name` declared directly by a struct or variant.
pub(super) fn named_field(tree: &SyntaxTree, item: NodeId, name: Name) -> Option<NodeId> {
    fields_of(tree, item)
        .iter()
        .copied()
        .find(|&field| tree.kind(field).decl_name() == Some(name))
}

/// `S<T> { a: e, b }` or `E::V { .. }`.
pub(super) fn infer_struct_lit(
    walker: &mut TypeWalker<'_>,
    path: NodeId,
    fields: &[NodeId],
    expected: &Expected,
) -> Walk<Ty> {
    let tree = walker.tree();
    let item = walker
        .resolve_path(path)?
        .filter(|&item| matches!(tree.kind(item), NodeKind::Struct(_) | NodeKind::Variant(_)));
    let Some((item, adt)) = item.and_then(|item| Some((item, adt_item(tree, item)?))) else {
        for &field in fields {
            if let Some(lit_field) = tree.as_struct_lit_field(field) {
                walker.ctx.resolved_fields.insert(field, None);
                infer_expr(walker, lit_field.expr, Expected::NoValue)?;
            }
        }
        return Ok(Ty::Unknown);
    };

    let subst = walker.instantiate_path(path, item)?;
    let ty = walker.instantiated_adt(adt, &subst);
    walker.unify_with_expected(&ty, expected);

    for &field in fields {
        let Some(lit_field) = tree.as_struct_lit_field(field) else {
            continue;
        };
        let decl = named_field(tree, item, lit_field.name);
        walker.ctx.resolved_fields.insert(field, decl);
        let field_ty = match decl {
            Some(decl) => substitute(&walker.lowering.decl_ty(decl)?, &subst),
            None => Ty::Unknown,
        };
        infer_expr_coercable_to(walker, lit_field.expr, field_ty)?;
    }
    Ok(walker.ctx.resolve_vars_if_possible(&ty))
}
