//! Cooperative cancellation.
//!
//! An editor request that became obsolete flips the flag; the running query
//! notices at its next checkpoint and unwinds through `?`. Nothing computed by
//! a cancelled query is published, so readers never observe partial results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The query was cancelled before it completed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("query cancelled")]
pub struct Cancelled;

/// Shared cancellation signal.
///
/// Cloning is cheap and every clone observes the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Create a flag that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every query holding this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear a previous cancellation request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Whether cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Checkpoint: fail with [`Cancelled`] if cancellation was requested.
    #[inline]
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
