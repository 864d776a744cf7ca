//! Blocks and statements.

use mv_ir::ast::{NodeKind, StmtKind};
use mv_ir::NodeId;

use crate::ty::Ty;

use super::expr::{infer_expr, infer_expr_coercable_to};
use super::patterns::{anonymous_shape, collect_bindings, BindingMode};
use super::{Expected, TypeWalker, Walk};

/// Infer the statements of `block`, then its tail under `expected`.
///
/// With `coerce` the tail is coerced to the expected type, as for function
/// bodies. A block without a tail is `()`, or `Never` if its last
/// statement diverges.
pub(super) fn infer_block(
    walker: &mut TypeWalker<'_>,
    block: NodeId,
    expected: Expected,
    coerce: bool,
) -> Walk<Ty> {
    let Some(decl) = walker.tree().as_block(block) else {
        return Ok(Ty::Unknown);
    };
    for &stmt in &decl.stmts {
        infer_stmt(walker, stmt)?;
    }
    match (decl.tail, expected) {
        (Some(tail), Expected::ExpectType(ty)) if coerce => infer_expr_coercable_to(walker, tail, ty),
        (Some(tail), expected) => infer_expr(walker, tail, expected),
        (None, _) => {
            let diverges = decl.stmts.last().is_some_and(|&stmt| {
                match walker.tree().as_stmt(stmt) {
                    Some(StmtKind::Expr(expr)) => walker
                        .ctx
                        .expr_types
                        .get(expr)
                        .is_some_and(Ty::is_never),
                    _ => false,
                }
            });
            Ok(if diverges { Ty::Never } else { Ty::Unit })
        }
    }
}

fn infer_stmt(walker: &mut TypeWalker<'_>, stmt: NodeId) -> Walk<()> {
    match walker.tree().kind(stmt) {
        NodeKind::Stmt(StmtKind::Let { pat, ty, init }) => infer_let(walker, *pat, *ty, *init),
        NodeKind::Stmt(StmtKind::Expr(expr)) => {
            infer_expr(walker, *expr, Expected::NoValue)?;
            Ok(())
        }
        NodeKind::Stmt(StmtKind::Spec { expr, .. }) => {
            infer_expr_coercable_to(walker, *expr, Ty::Bool)?;
            Ok(())
        }
        // Use declarations and schema fields carry no expressions.
        _ => Ok(()),
    }
}

/// `let pat: ty = init;`
///
/// A declared type is both the expectation and the pattern's type.
/// Otherwise the pattern's shape guides the initializer and the
/// initializer's type is destructured.
fn infer_let(
    walker: &mut TypeWalker<'_>,
    pat: NodeId,
    ty: Option<NodeId>,
    init: Option<NodeId>,
) -> Walk<()> {
    let declared = match ty {
        Some(ty) => Some(walker.lowering.lower_type(ty)?),
        None => None,
    };
    let pat_ty = match (declared, init) {
        (Some(declared), Some(init)) => {
            infer_expr_coercable_to(walker, init, declared.clone())?;
            declared
        }
        (Some(declared), None) => declared,
        (None, Some(init)) => {
            let shape = anonymous_shape(walker, pat);
            let ty = infer_expr(walker, init, Expected::from(shape))?;
            walker.ctx.resolve_vars_if_possible(&ty)
        }
        (None, None) => anonymous_shape(walker, pat),
    };
    collect_bindings(walker, pat, &pat_ty, BindingMode::ByValue)
}
