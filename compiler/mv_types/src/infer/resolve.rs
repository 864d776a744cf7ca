//! Substituting variable bindings back into types.

use crate::fold::TypeFolder;
use crate::ty::{Ty, TyInfer};

use super::InferenceContext;

/// What an unbound variable turns into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Fallback {
    /// Left in place.
    Keep,
    Unknown,
    /// The type parameter a type variable was instantiated for.
    Origin,
}

struct VarResolver<'c, 'a> {
    ctx: &'c mut InferenceContext<'a>,
    fallback: Fallback,
}

impl TypeFolder for VarResolver<'_, '_> {
    fn fold_infer(&mut self, infer: TyInfer) -> Ty {
        match self.ctx.resolve_ty_infer(infer) {
            Ty::Infer(TyInfer::TyVar(var)) => match self.fallback {
                Fallback::Keep => Ty::ty_var(var),
                Fallback::Unknown => Ty::Unknown,
                Fallback::Origin => var.origin.map_or(Ty::Unknown, Ty::TypeParam),
            },
            Ty::Infer(TyInfer::IntVar(var)) => match self.fallback {
                Fallback::Keep => Ty::int_var(var),
                Fallback::Unknown | Fallback::Origin => Ty::Unknown,
            },
            bound => self.fold(&bound),
        }
    }
}

impl InferenceContext<'_> {
    /// One step of resolution: the value bound to `infer`, or the
    /// representative variable of its class.
    pub fn resolve_ty_infer(&mut self, infer: TyInfer) -> Ty {
        match infer {
            TyInfer::IntVar(var) => self
                .int_table
                .value_of(var)
                .unwrap_or_else(|| Ty::int_var(self.int_table.find(var))),
            TyInfer::TyVar(var) => match self.var_table.value_of(var) {
                Some(Ty::Infer(TyInfer::IntVar(int))) => {
                    self.resolve_ty_infer(TyInfer::IntVar(int))
                }
                Some(value) => value,
                None => Ty::ty_var(self.var_table.find(var)),
            },
        }
    }

    /// Resolve only the outermost variable of `ty`.
    pub fn shallow_resolve(&mut self, ty: &Ty) -> Ty {
        match ty {
            Ty::Infer(infer) => self.resolve_ty_infer(*infer),
            _ => ty.clone(),
        }
    }

    /// Substitute every bound variable; unbound ones stay.
    pub fn resolve_vars_if_possible(&mut self, ty: &Ty) -> Ty {
        self.resolve_with(ty, Fallback::Keep)
    }

    /// Substitute every bound variable; unbound ones become `Unknown`.
    pub fn fully_resolve(&mut self, ty: &Ty) -> Ty {
        self.resolve_with(ty, Fallback::Unknown)
    }

    /// Like [`fully_resolve`](Self::fully_resolve), but unbound type
    /// variables become the type parameter they were instantiated for.
    /// Used for messages, where `T` reads better than `<unknown>`.
    pub fn fully_resolve_with_origins(&mut self, ty: &Ty) -> Ty {
        self.resolve_with(ty, Fallback::Origin)
    }

    fn resolve_with(&mut self, ty: &Ty, fallback: Fallback) -> Ty {
        if !ty.has_infer() {
            return ty.clone();
        }
        VarResolver {
            ctx: self,
            fallback,
        }
        .fold(ty)
    }
}
