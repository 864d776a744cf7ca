//! Type inference for Move function bodies, specs and constants.
//!
//! An inference *owner* is a function, item spec, schema or constant. Each
//! owner is inferred in isolation by a [`TypeWalker`] that accumulates
//! types in an [`InferenceContext`] and freezes them into an
//! [`InferenceResult`]. Owners never see each other's inference variables,
//! so independent owners can be inferred in parallel.

mod combine;
mod context;
mod expected;
mod resolve;
mod result;
mod walker;

pub use combine::{CombineResult, TypeMismatch};
pub use context::InferenceContext;
pub use expected::Expected;
pub use result::InferenceResult;
pub use walker::{BindingMode, TypeWalker};

use mv_ir::NodeId;
use mv_resolve::Resolver;
use mv_stack::{CancellationFlag, Cancelled};

use crate::config::InferConfig;

/// Infer `owner` from scratch.
///
/// `msl` selects specification typing rules; item specs and schemas are
/// always inferred that way by callers, functions may be inferred both
/// ways.
#[tracing::instrument(level = "debug", skip_all, fields(owner = ?owner, msl = msl))]
pub fn infer_owner<'a>(
    resolver: Resolver<'a>,
    cancel: Option<&'a CancellationFlag>,
    owner: NodeId,
    msl: bool,
    config: InferConfig,
) -> Result<InferenceResult, Cancelled> {
    TypeWalker::new(resolver, msl, config, cancel).run(owner)
}

#[cfg(test)]
mod tests;
