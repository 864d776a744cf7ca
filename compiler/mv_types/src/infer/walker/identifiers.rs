//! Path expressions: locals, constants, functions, unit variants, schema
//! fields, globals and `result`.

use mv_ir::ast::NodeKind;
use mv_ir::NodeId;
use mv_resolve::item_spec_target;

use crate::fold::substitute;
use crate::lower::adt_item;
use crate::ty::Ty;

use super::{Expected, TypeWalker, Walk};

pub(super) fn infer_path_expr(
    walker: &mut TypeWalker<'_>,
    path: NodeId,
    expected: &Expected,
) -> Walk<Ty> {
    let Some(item) = walker.resolve_path(path)? else {
        return Ok(Ty::Unknown);
    };
    let tree = walker.tree();
    let ty = match tree.kind(item) {
        NodeKind::Pat(_) => walker.ctx.pat_types.get(&item).cloned().unwrap_or(Ty::Unknown),
        NodeKind::Const(_) | NodeKind::SchemaField(_) | NodeKind::Field(_) => {
            walker.lowering.decl_ty(item)?
        }
        NodeKind::GlobalVar(_) => {
            let subst = walker.instantiate_path(path, item)?;
            substitute(&walker.lowering.decl_ty(item)?, &subst)
        }
        NodeKind::Function(_) => {
            let subst = walker.instantiate_path(path, item)?;
            substitute(&walker.lowering.function_ty(item)?, &subst)
        }
        NodeKind::Variant(_) => {
            let Some(adt) = adt_item(tree, item) else {
                return Ok(Ty::Unknown);
            };
            let subst = walker.instantiate_path(path, item)?;
            let ty = walker.instantiated_adt(adt, &subst);
            walker.unify_with_expected(&ty, expected);
            walker.ctx.resolve_vars_if_possible(&ty)
        }
        // `result` inside the spec of a function.
        NodeKind::ItemSpec(_) => match item_spec_target(walker.project(), item) {
            Some(target) => walker.lowering.return_ty(target)?,
            None => Ty::Unknown,
        },
        _ => Ty::Unknown,
    };
    Ok(ty)
}
