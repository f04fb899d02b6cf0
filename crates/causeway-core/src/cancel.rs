//! Cooperative cancellation for long-running searches.
//!
//! A [`CancellationFlag`] is a cheap, cloneable handle around a shared
//! atomic boolean. The search loops poll it at the top of every
//! enumeration step and return their best partial result once it is set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared interruption flag.
///
/// Clones observe the same flag, so a controller thread can keep one
/// handle and pass another into the search.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    /// Create a flag that is not yet cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            log::debug!("cancellation requested");
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear the flag so the handle can be reused for another search.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
