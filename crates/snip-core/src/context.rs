use crate::error::Interrupted;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation scope for a single call into the core.
///
/// A context carries an optional deadline and a cancel flag. Clones share the
/// flag, so the request layer can keep one half and hand the other down.
/// Every repository operation calls [`Context::check`] before it takes a lock.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Context {
    /// A context that never expires and is only cancelled explicitly.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    ///
    /// A timeout too large to represent behaves like [`Context::background`].
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            cancelled: Arc::default(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Returns why the operation must not start, if it must not.
    ///
    /// Explicit cancellation wins over an expired deadline.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
