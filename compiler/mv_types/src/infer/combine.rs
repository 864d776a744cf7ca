//! Structural unification of two types.
//!
//! `combine_types(expected, actual)` makes the two types equal by binding
//! inference variables, or reports that they cannot be. Both operands are
//! shallow-resolved first, and in specification mode refined so that
//! references are transparent and every integer is `num`.
//!
//! Rules, after resolution:
//!
//! | expected / actual            | outcome                                   |
//! |------------------------------|-------------------------------------------|
//! | type variable, anything      | union or bind (occurs check)              |
//! | integer variable, anything   | union, bind to an integer, or mismatch    |
//! | equal types                  | ok                                        |
//! | `Never`, anything            | ok                                        |
//! | `Unknown`, anything          | ok; variables on the other side → unknown |
//! | `&mut T`, `&T`               | mismatch outside specs                    |
//! | same constructor             | component-wise                            |
//!
//! A variable whose binding would contain itself is bound to `Unknown`
//! instead, so resolution always terminates.

use mv_ir::ast::Abilities;

use crate::flags::TypeFlags;
use crate::fold::collect_ty_infers;
use crate::ty::{IntVar, Ty, TyInfer, TyVar};

use super::InferenceContext;

/// Two types that could not be combined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: Ty,
    pub actual: Ty,
}

pub type CombineResult = Result<(), TypeMismatch>;

impl InferenceContext<'_> {
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn combine_types(&mut self, expected: &Ty, actual: &Ty) -> CombineResult {
        let expected = self.prepare_for_combine(expected);
        let actual = self.prepare_for_combine(actual);
        match (&expected, &actual) {
            (Ty::Infer(TyInfer::TyVar(var)), _) => {
                self.unify_ty_var(*var, &actual);
                Ok(())
            }
            (_, Ty::Infer(TyInfer::TyVar(var))) => {
                self.unify_ty_var(*var, &expected);
                Ok(())
            }
            (Ty::Infer(TyInfer::IntVar(var)), other) | (other, Ty::Infer(TyInfer::IntVar(var))) => {
                if self.combine_int_var(*var, other) {
                    Ok(())
                } else {
                    Err(TypeMismatch {
                        expected: expected.clone(),
                        actual: actual.clone(),
                    })
                }
            }
            _ => self.combine_no_infer(&expected, &actual),
        }
    }

    fn prepare_for_combine(&mut self, ty: &Ty) -> Ty {
        let refined = ty.refine_for_specs(self.msl);
        self.shallow_resolve(&refined).refine_for_specs(self.msl)
    }

    /// `var` is an unbound root after shallow resolution.
    fn unify_ty_var(&mut self, var: TyVar, other: &Ty) {
        if let Ty::Infer(TyInfer::TyVar(other)) = other {
            self.var_table.unify_var_var(var, *other);
            return;
        }
        let root = self.var_table.find(var);
        let value = self.resolve_vars_if_possible(other);
        let occurs = collect_ty_infers(&value).into_iter().any(|infer| match infer {
            TyInfer::TyVar(inner) => self.var_table.find(inner) == root,
            TyInfer::IntVar(_) => false,
        });
        if occurs {
            tracing::trace!(?var, "cyclic binding, falling back to unknown");
            self.var_table.unify_var_value(var, Ty::Unknown);
        } else {
            self.var_table.unify_var_value(var, value);
        }
    }

    /// Integer variables only take integers, `num` or other integer
    /// variables. `Unknown` and `Never` are accepted without binding.
    fn combine_int_var(&mut self, var: IntVar, other: &Ty) -> bool {
        match other {
            Ty::Infer(TyInfer::IntVar(other)) => {
                self.int_table.unify_var_var(var, *other);
                true
            }
            Ty::Integer(_) | Ty::Num => {
                self.int_table.unify_var_value(var, other.clone());
                true
            }
            Ty::Unknown | Ty::Never => true,
            _ => false,
        }
    }

    fn combine_no_infer(&mut self, expected: &Ty, actual: &Ty) -> CombineResult {
        if expected == actual {
            return Ok(());
        }
        let mismatch = || {
            Err(TypeMismatch {
                expected: expected.clone(),
                actual: actual.clone(),
            })
        };
        match (expected, actual) {
            (Ty::Never, _) | (_, Ty::Never) => Ok(()),
            (Ty::Unknown, other) | (other, Ty::Unknown) => {
                self.bind_vars_to_unknown(other);
                Ok(())
            }
            (Ty::Integer(e), Ty::Integer(a)) if e.is_compatible(*a) => Ok(()),
            (Ty::Vector(e), Ty::Vector(a)) => self.combine_types(e, a),
            (
                Ty::Reference {
                    referenced: e,
                    mutable: e_mut,
                },
                Ty::Reference {
                    referenced: a,
                    mutable: a_mut,
                },
            ) => {
                if *e_mut && !*a_mut && !self.msl {
                    return mismatch();
                }
                self.combine_types(e, a)
            }
            (
                Ty::Callable {
                    params: e_params,
                    ret: e_ret,
                    ..
                },
                Ty::Callable {
                    params: a_params,
                    ret: a_ret,
                    ..
                },
            ) => {
                for (e, a) in e_params.iter().zip(a_params) {
                    self.combine_types(e, a)?;
                }
                self.combine_types(e_ret, a_ret)
            }
            (Ty::Adt { item: e, args: e_args }, Ty::Adt { item: a, args: a_args }) if e == a => {
                self.combine_pairs(e_args, a_args)
            }
            (Ty::Tuple(e), Ty::Tuple(a)) if e.len() == a.len() => self.combine_pairs(e, a),
            _ => mismatch(),
        }
    }

    /// Combine every pair, even after a failure; the first failure wins.
    fn combine_pairs(&mut self, expected: &[Ty], actual: &[Ty]) -> CombineResult {
        let mut result = Ok(());
        for (e, a) in expected.iter().zip(actual) {
            let pair = self.combine_types(e, a);
            if result.is_ok() {
                result = pair;
            }
        }
        result
    }

    fn bind_vars_to_unknown(&mut self, ty: &Ty) {
        let resolved = self.resolve_vars_if_possible(ty);
        for infer in collect_ty_infers(&resolved) {
            if let TyInfer::TyVar(var) = infer {
                self.var_table.unify_var_value(var, Ty::Unknown);
            }
        }
    }

    /// Abilities `expected` demands that `actual` lacks, if any.
    ///
    /// Skipped in specs and for types whose abilities cannot vary. An
    /// unbound variable demands the bounds of the type parameter it was
    /// instantiated for, so `expected` is taken before resolution.
    pub fn abilities_compatible(&mut self, expected: &Ty, actual: &Ty) -> Result<(), Abilities> {
        if self.msl || !expected.flags().intersects(TypeFlags::NEEDS_ABILITY_CHECK) {
            return Ok(());
        }
        let required = match expected {
            Ty::Infer(TyInfer::TyVar(TyVar { origin: None, .. })) => Abilities::empty(),
            Ty::Infer(TyInfer::TyVar(TyVar {
                origin: Some(param),
                ..
            })) => Ty::TypeParam(*param).abilities(self.project),
            _ => self.resolve_vars_if_possible(expected).abilities(self.project),
        };
        let provided = self.resolve_vars_if_possible(actual).abilities(self.project);
        let missing = required.difference(provided);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}

#[cfg(test)]
mod tests;
