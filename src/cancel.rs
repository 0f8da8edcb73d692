//! Cooperative cancellation
//!
//! A [`CancellationToken`] is threaded through every pipeline stage. Stages
//! call [`CancellationToken::check`] between units of work (opening the input,
//! each buffer copy, each container read iteration) and abort with
//! [`LoafError::Cancelled`] once the token has been tripped.

use crate::error::{LoafError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared check-and-abort flag
///
/// Clones share the same flag, so a caller can keep one clone and hand
/// another to a background job.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, untripped token
    pub fn new() -> Self {
        Self::default()
    }

    /// A token nobody else holds; it can never be tripped from outside
    pub fn none() -> Self {
        Self::default()
    }

    /// Request cancellation of every operation observing this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Abort the current stage if cancellation has been requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(LoafError::Cancelled)
        } else {
            Ok(())
        }
    }
}
