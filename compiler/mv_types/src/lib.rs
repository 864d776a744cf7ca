//! Types and type inference for Move.
//!
//! # Layers
//!
//! - [`Ty`] is the structural type representation; [`TypeFolder`] and
//!   [`TypeVisitor`] walk it, [`TypeFlags`] summarize it.
//! - [`UnificationTable`] is a snapshot-able union-find over type and
//!   integer variables.
//! - [`TyLowering`] turns type syntax and declared signatures into [`Ty`].
//! - [`infer`] types one owner (function, item spec, schema, constant) at a
//!   time and freezes the outcome into an [`InferenceResult`].
//! - [`TypeckDb`] caches results per owner and infers owners in parallel.
//!
//! Inference never fails on ill-typed programs: problems are recorded as
//! [`TypeError`]s and the walk goes on. The only way a run ends early is
//! cancellation.

mod config;
mod error;
mod flags;
mod fold;
pub mod infer;
mod lower;
mod service;
mod trace;
mod ty;
mod type_error;
mod unify;

#[cfg(test)]
mod test_support;

pub use config::InferConfig;
pub use error::InferenceError;
pub use flags::TypeFlags;
pub use fold::{
    collect_ty_infers, fold_ty_infer_with, fold_type_params_with, substitute,
    substitute_or_unknown, visit_ty_infers, Substitution, TypeFolder, TypeVisitor,
};
pub use infer::{infer_owner, Expected, InferenceContext, InferenceResult, TypeWalker};
pub use lower::{adt_item, adt_substitution, fields_of, item_ty, type_params_of, TyLowering};
pub use service::{InferenceCache, TypeckDb};
pub use trace::init_tracing;
pub use ty::{CallableKind, IntKind, IntVar, Ty, TyInfer, TyVar};
pub use type_error::{TypeError, TypeErrorKind};
pub use unify::{Snapshot, UnificationTable, UnifyKey};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::TyVar;
    mv_ir::static_assert_size!(TyVar, 12);
}
