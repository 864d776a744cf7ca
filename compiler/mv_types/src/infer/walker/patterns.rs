//! Pattern destructuring.
//!
//! [`collect_bindings`] matches a pattern against the type of the value it
//! destructures and records a type for every pattern node. Matching through
//! references switches the binding mode to by-reference, so that bindings
//! nested in a struct pattern over `&S` receive `&T` for a field of type
//! `T`. A mutable binding mode never survives an immutable reference.

use mv_ir::ast::{NodeKind, PatKind};
use mv_ir::{NodeId, SyntaxTree};
use mv_resolve::{Namespace, ResolvedPath};
use mv_stack::ensure_sufficient_stack;

use crate::fold::{substitute_or_unknown, Substitution};
use crate::lower::{adt_item, adt_substitution};
use crate::ty::Ty;
use crate::type_error::{TypeError, TypeErrorKind};

use super::structs::named_field;
use super::{TypeWalker, Walk};

/// How a binding captures the value it matches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindingMode {
    ByValue,
    ByRef { mutable: bool },
}

impl BindingMode {
    /// The type a binding in this mode receives for a value of type `ty`.
    pub fn apply(self, ty: Ty) -> Ty {
        match self {
            BindingMode::ByValue => ty,
            BindingMode::ByRef { mutable } => Ty::reference(ty, mutable),
        }
    }
}

/// Peel every reference off `ty`, folding each into `mode`.
pub fn strip_references(ty: &Ty, mut mode: BindingMode) -> (Ty, BindingMode) {
    let mut ty = ty;
    while let Ty::Reference {
        referenced,
        mutable,
    } = ty
    {
        mode = match mode {
            BindingMode::ByValue => BindingMode::ByRef { mutable: *mutable },
            BindingMode::ByRef { mutable: outer } => BindingMode::ByRef {
                mutable: outer && *mutable,
            },
        };
        ty = referenced;
    }
    (ty.clone(), mode)
}

/// The type structure a pattern implies on its own: a variable for a
/// binding, a tuple of variables for a tuple pattern.
pub(super) fn anonymous_shape(walker: &mut TypeWalker<'_>, pat: NodeId) -> Ty {
    match walker.tree().as_pat(pat) {
        Some(PatKind::Binding { .. }) => walker.ctx.fresh_ty_var(None),
        Some(PatKind::Tuple(items)) => {
            Ty::Tuple(items.iter().map(|_| walker.ctx.fresh_ty_var(None)).collect())
        }
        _ => Ty::Unknown,
    }
}

/// Destructure `ty` with `pat`, recording a type for every pattern node.
pub(super) fn collect_bindings(
    walker: &mut TypeWalker<'_>,
    pat: NodeId,
    ty: &Ty,
    mode: BindingMode,
) -> Walk<()> {
    ensure_sufficient_stack(|| collect_bindings_inner(walker, pat, ty, mode))
}

fn collect_bindings_inner(
    walker: &mut TypeWalker<'_>,
    pat: NodeId,
    ty: &Ty,
    mode: BindingMode,
) -> Walk<()> {
    let tree = walker.tree();
    let ty = walker.ctx.resolve_vars_if_possible(ty);
    let Some(kind) = tree.as_pat(pat) else {
        return Ok(());
    };
    match kind {
        PatKind::Binding { name } => {
            let bound = if is_arm_pattern(tree, pat) {
                strip_references(&ty, mode).0
            } else {
                mode.apply(ty)
            };
            walker.ctx.write_pat_ty(pat, bound);
            if let Some(arm) = enclosing_arm(tree, pat) {
                // A name in an arm pattern may denote a constant rather than
                // introduce a binding.
                let scope = tree.parent(arm).unwrap_or(arm);
                let resolved = walker.resolver.resolve_local_name(scope, *name, Namespace::VALUE)?;
                let constant = resolved
                    .iter()
                    .map(|r| r.element)
                    .find(|&decl| matches!(tree.kind(decl), NodeKind::Const(_) | NodeKind::Variant(_)));
                walker.ctx.resolved_bindings.insert(pat, constant);
            }
        }
        PatKind::Wild | PatKind::Unit => walker.ctx.write_pat_ty(pat, ty),
        PatKind::Path(path) => {
            walker.resolve_path(*path)?;
            walker.ctx.write_pat_ty(pat, ty);
        }
        PatKind::Tuple(items) => collect_tuple(walker, pat, items, ty, mode)?,
        PatKind::Struct { path, fields, .. } => collect_struct(walker, pat, *path, fields, &ty, mode)?,
    }
    Ok(())
}

fn collect_tuple(
    walker: &mut TypeWalker<'_>,
    pat: NodeId,
    items: &[NodeId],
    ty: Ty,
    mode: BindingMode,
) -> Walk<()> {
    // `let (x) = e;` is a parenthesized binding.
    if let [single] = items {
        if !matches!(ty, Ty::Tuple(_)) {
            walker.ctx.write_pat_ty(pat, ty.clone());
            return collect_bindings(walker, *single, &ty, mode);
        }
    }

    let shape = Ty::Tuple(vec![Ty::Unknown; items.len()]);
    if !walker.ctx.is_compatible(&ty, &shape) {
        walker.ctx.report(TypeError::new(
            pat,
            TypeErrorKind::InvalidUnpacking { ty: ty.clone() },
        ));
        walker.ctx.write_pat_ty(pat, ty);
        for &item in items {
            collect_bindings(walker, item, &Ty::Unknown, mode)?;
        }
        return Ok(());
    }

    let elems = match &ty {
        Ty::Tuple(elems) => elems.clone(),
        // A variable or `Unknown`; give it the tuple's structure.
        _ => {
            let vars: Vec<Ty> = items.iter().map(|_| walker.ctx.fresh_ty_var(None)).collect();
            if let Err(mismatch) = walker.ctx.combine_types(&ty, &Ty::Tuple(vars.clone())) {
                tracing::trace!(?mismatch, "tuple shape rejected after compatibility check");
            }
            vars.iter()
                .map(|var| walker.ctx.resolve_vars_if_possible(var))
                .collect()
        }
    };
    walker.ctx.write_pat_ty(pat, ty);
    for (&item, elem) in items.iter().zip(&elems) {
        collect_bindings(walker, item, elem, mode)?;
    }
    Ok(())
}

fn collect_struct(
    walker: &mut TypeWalker<'_>,
    pat: NodeId,
    path: NodeId,
    fields: &[NodeId],
    ty: &Ty,
    mode: BindingMode,
) -> Walk<()> {
    let tree = walker.tree();
    let (expected, field_mode) = strip_references(ty, mode);
    walker.ctx.write_pat_ty(pat, expected.clone());

    let item = struct_pattern_item(walker, pat, path, &expected)?;
    let subst = match (item, &expected) {
        (Some(item), Ty::Adt { item: adt, args }) if adt_item(tree, item) == Some(*adt) => {
            adt_substitution(tree, item, args)
        }
        _ => Substitution::default(),
    };

    for &field in fields {
        let Some(pat_field) = tree.as_pat_field(field) else {
            continue;
        };
        let decl = item.and_then(|item| named_field(tree, item, pat_field.name));
        walker.ctx.resolved_fields.insert(field, decl);
        let field_ty = match decl {
            Some(decl) => substitute_or_unknown(&walker.lowering.decl_ty(decl)?, &subst),
            None => Ty::Unknown,
        };
        if pat_field.shorthand {
            let bound = field_mode.apply(field_ty);
            walker.ctx.write_pat_field_ty(field, bound.clone());
            walker.ctx.write_pat_ty(pat_field.pat, bound);
        } else {
            walker.ctx.write_pat_field_ty(field, field_ty.clone());
            collect_bindings(walker, pat_field.pat, &field_ty, field_mode)?;
        }
    }
    Ok(())
}

/// The struct or variant a struct pattern destructures.
///
/// An unqualified path in a match arm over an enum names a variant of that
/// enum and is never looked up in scope; an unknown name stays unresolved.
/// Otherwise the path is resolved, falling back to the expected struct.
fn struct_pattern_item(
    walker: &mut TypeWalker<'_>,
    pat: NodeId,
    path: NodeId,
    expected: &Ty,
) -> Walk<Option<NodeId>> {
    let tree = walker.tree();
    let path_decl = tree.as_path(path);
    let unqualified = path_decl.is_some_and(|p| p.qualifier.is_none());
    let scrutinee_enum = match expected {
        Ty::Adt { item, .. } => tree.as_enum(*item),
        _ => None,
    };
    let in_arm = unqualified && enclosing_arm(tree, pat).is_some();
    if let Some(decl) = scrutinee_enum.filter(|_| in_arm) {
        let name = path_decl.and_then(|p| p.name());
        let variant = decl
            .variants
            .iter()
            .copied()
            .find(|&variant| tree.kind(variant).decl_name() == name);
        let candidates = variant
            .map(|element| ResolvedPath {
                element,
                is_visible: true,
            })
            .into_iter()
            .collect();
        walker.ctx.write_resolved_path(path, candidates);
        return Ok(variant);
    }

    let resolved = walker
        .resolve_path(path)?
        .filter(|&decl| matches!(tree.kind(decl), NodeKind::Struct(_) | NodeKind::Variant(_)));
    Ok(resolved.or(match expected {
        Ty::Adt { item, .. } if tree.as_struct(*item).is_some() => Some(*item),
        _ => None,
    }))
}

/// Pattern sits directly under a match arm.
fn is_arm_pattern(tree: &SyntaxTree, pat: NodeId) -> bool {
    tree.parent(pat)
        .is_some_and(|parent| tree.as_match_arm(parent).is_some())
}

/// The match arm whose pattern contains `pat`, if any.
fn enclosing_arm(tree: &SyntaxTree, pat: NodeId) -> Option<NodeId> {
    tree.ancestors(pat)
        .find(|&node| !matches!(tree.kind(node), NodeKind::Pat(_) | NodeKind::PatField(_)))
        .filter(|&node| tree.as_match_arm(node).is_some())
}
