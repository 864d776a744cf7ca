//! Type traversal.
//!
//! - [`TypeFolder`] rebuilds a type, overriding the variants it cares about.
//! - [`TypeVisitor`] walks a type and can stop early.
//!
//! The free functions at the bottom cover the folds inference needs over and
//! over: substituting type parameters and mapping inference variables.

use rustc_hash::FxHashMap;

use mv_ir::NodeId;
use mv_stack::ensure_sufficient_stack;

use crate::ty::{CallableKind, Ty, TyInfer};

/// Type parameter to type.
pub type Substitution = FxHashMap<NodeId, Ty>;

/// Transform a type by structural recursion.
///
/// The default `fold` dispatches to the `fold_*` hooks; the structural hooks
/// fold their children and rebuild, the leaf hooks return their input.
pub trait TypeFolder {
    fn fold(&mut self, ty: &Ty) -> Ty {
        ensure_sufficient_stack(|| match ty {
            Ty::Infer(infer) => self.fold_infer(*infer),
            Ty::TypeParam(param) => self.fold_type_param(*param),
            Ty::Vector(item) => self.fold_vector(item),
            Ty::Reference {
                referenced,
                mutable,
            } => self.fold_reference(referenced, *mutable),
            Ty::Tuple(items) => self.fold_tuple(items),
            Ty::Adt { item, args } => self.fold_adt(*item, args),
            Ty::Callable { params, ret, kind } => self.fold_callable(params, ret, *kind),
            Ty::Unknown
            | Ty::Never
            | Ty::Unit
            | Ty::Primitive(_)
            | Ty::Integer(_)
            | Ty::Num
            | Ty::Bool
            | Ty::Address
            | Ty::Signer => ty.clone(),
        })
    }

    fn fold_infer(&mut self, infer: TyInfer) -> Ty {
        Ty::Infer(infer)
    }

    fn fold_type_param(&mut self, param: NodeId) -> Ty {
        Ty::TypeParam(param)
    }

    fn fold_vector(&mut self, item: &Ty) -> Ty {
        Ty::vector(self.fold(item))
    }

    fn fold_reference(&mut self, referenced: &Ty, mutable: bool) -> Ty {
        Ty::reference(self.fold(referenced), mutable)
    }

    fn fold_tuple(&mut self, items: &[Ty]) -> Ty {
        Ty::Tuple(items.iter().map(|t| self.fold(t)).collect())
    }

    fn fold_adt(&mut self, item: NodeId, args: &[Ty]) -> Ty {
        Ty::Adt {
            item,
            args: args.iter().map(|a| self.fold(a)).collect(),
        }
    }

    fn fold_callable(&mut self, params: &[Ty], ret: &Ty, kind: CallableKind) -> Ty {
        Ty::Callable {
            params: params.iter().map(|p| self.fold(p)).collect(),
            ret: Box::new(self.fold(ret)),
            kind,
        }
    }
}

/// Walk a type.
///
/// Returning `true` from [`visit`](Self::visit) stops the walk and makes the
/// whole traversal return `true`.
pub trait TypeVisitor {
    fn visit(&mut self, ty: &Ty) -> bool {
        self.super_visit(ty)
    }

    /// Visit the direct children of `ty`.
    fn super_visit(&mut self, ty: &Ty) -> bool {
        ensure_sufficient_stack(|| match ty {
            Ty::Vector(item) => self.visit(item),
            Ty::Reference { referenced, .. } => self.visit(referenced),
            Ty::Tuple(items) | Ty::Adt { args: items, .. } => items.iter().any(|t| self.visit(t)),
            Ty::Callable { params, ret, .. } => {
                params.iter().any(|p| self.visit(p)) || self.visit(ret)
            }
            Ty::Unknown
            | Ty::Never
            | Ty::Unit
            | Ty::Primitive(_)
            | Ty::Integer(_)
            | Ty::Num
            | Ty::Bool
            | Ty::Address
            | Ty::Signer
            | Ty::TypeParam(_)
            | Ty::Infer(_) => false,
        })
    }
}

struct InferFolder<F>(F);

impl<F: FnMut(TyInfer) -> Ty> TypeFolder for InferFolder<F> {
    fn fold_infer(&mut self, infer: TyInfer) -> Ty {
        (self.0)(infer)
    }
}

struct TypeParamFolder<F>(F);

impl<F: FnMut(NodeId) -> Ty> TypeFolder for TypeParamFolder<F> {
    fn fold_type_param(&mut self, param: NodeId) -> Ty {
        (self.0)(param)
    }
}

struct InferVisitor<F>(F);

impl<F: FnMut(TyInfer) -> bool> TypeVisitor for InferVisitor<F> {
    fn visit(&mut self, ty: &Ty) -> bool {
        match ty {
            Ty::Infer(infer) => (self.0)(*infer),
            _ => self.super_visit(ty),
        }
    }
}

/// Replace every inference variable with `f(var)`.
pub fn fold_ty_infer_with(ty: &Ty, f: impl FnMut(TyInfer) -> Ty) -> Ty {
    InferFolder(f).fold(ty)
}

/// Replace every type parameter with `f(param)`.
pub fn fold_type_params_with(ty: &Ty, f: impl FnMut(NodeId) -> Ty) -> Ty {
    TypeParamFolder(f).fold(ty)
}

/// Call `f` on every inference variable until it returns `true`.
pub fn visit_ty_infers(ty: &Ty, f: impl FnMut(TyInfer) -> bool) -> bool {
    InferVisitor(f).visit(ty)
}

/// Every inference variable in `ty`, in traversal order.
pub fn collect_ty_infers(ty: &Ty) -> Vec<TyInfer> {
    let mut out = Vec::new();
    visit_ty_infers(ty, |infer| {
        out.push(infer);
        false
    });
    out
}

/// Apply `subst`; parameters it does not mention stay as they are.
pub fn substitute(ty: &Ty, subst: &Substitution) -> Ty {
    if subst.is_empty() {
        return ty.clone();
    }
    fold_type_params_with(ty, |param| {
        subst.get(&param).cloned().unwrap_or(Ty::TypeParam(param))
    })
}

/// Apply `subst`; parameters it does not mention become `Unknown`.
pub fn substitute_or_unknown(ty: &Ty, subst: &Substitution) -> Ty {
    fold_type_params_with(ty, |param| subst.get(&param).cloned().unwrap_or(Ty::Unknown))
}

#[cfg(test)]
mod tests;
