//! Recursion guards shared by the resolver and the type checker.
//!
//! Two concerns live here because both are checked at the same points, the
//! recursion boundaries of a query:
//!
//! - [`ensure_sufficient_stack`] grows the native stack before deeply nested
//!   expression trees are walked.
//! - [`CancellationFlag`] lets a caller abort a long-running query. Queries
//!   poll it at module and function granularity and bail out with
//!   [`Cancelled`].
//!
//! # Stack configuration
//!
//! - **Red zone**: 128KB. Less remaining stack than this triggers growth.
//! - **Growth size**: 2MB per segment.

mod cancel;

pub use cancel::{CancellationFlag, Cancelled};

/// Minimum stack space to keep available before recursing further.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// Wrap every self-recursive walk over syntax trees or types with this.
/// Types are trees of arbitrary depth (`vector<vector<...>>`) and so are
/// expression bodies, so neither walk has a static depth bound.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
