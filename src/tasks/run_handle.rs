//! # Run handle: liveness flag for a task loop.
//!
//! [`RunHandle`] is held by a task body for as long as its loop executes.
//! The orchestrator never blocks on it; it polls [`RunHandle::is_running`]
//! with a bounded interval.
//!
//! ## Rules
//! - At most one [`RunGuard`] exists per handle at any time.
//! - The flag is set iff a guard is alive; dropping the guard (normal exit,
//!   early return or panic unwinding) releases it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared liveness flag of one task loop.
#[derive(Clone, Debug, Default)]
pub struct RunHandle {
    running: Arc<AtomicBool>,
}

impl RunHandle {
    /// Creates a released handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the handle for the duration of the returned guard.
    ///
    /// Returns `None` if the loop already holds it.
    #[must_use]
    pub fn try_enter(&self) -> Option<RunGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                running: Arc::clone(&self.running),
            })
    }

    /// Returns true while a guard is held.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Proof that the owning task loop is executing; releases the handle on drop.
#[derive(Debug)]
pub struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
