//! # Lifecycle events emitted by the orchestrator.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: init, start, stop and finalize of one task
//! - **Shutdown events**: bulk wait completed, shutdown requested
//! - **Delivery events**: a message was dropped on a full queue
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task id
//! and error details.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use cellvisor::{Event, EventKind, TaskId};
//!
//! let ev = Event::new(EventKind::LifecycleFailed)
//!     .with_task(TaskId::Sensor)
//!     .with_error("init_failed")
//!     .with_code(-7);
//!
//! assert_eq!(ev.kind, EventKind::LifecycleFailed);
//! assert_eq!(ev.task, Some(TaskId::Sensor));
//! assert_eq!(ev.code, Some(-7));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::tasks::TaskId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of orchestrator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// Task body completed `init`.
    ///
    /// Sets: `task`
    TaskInitialized,

    /// `on_enter` ran and `start` is about to be invoked.
    ///
    /// Sets: `task`
    TaskStarting,

    /// `start` returned successfully (the task loop is spawned).
    ///
    /// Sets: `task`
    TaskStarted,

    /// `stop` was invoked on the task body.
    ///
    /// Sets: `task`
    StopRequested,

    /// Task run handle observed released after a stop request.
    ///
    /// Sets: `task`
    TaskStopped,

    /// Task body completed `finalize`.
    ///
    /// Sets: `task`
    TaskFinalized,

    /// A lifecycle call returned an error.
    ///
    /// Sets: `task`, `error` (label), `code`
    LifecycleFailed,

    // === Shutdown events ===
    /// Shutdown flag was raised.
    ShutdownRequested,

    /// Every non-explicit-stop task was observed stopped in one pass.
    AllStopped,

    // === Delivery events ===
    /// A message was dropped because the queue was full or closed.
    ///
    /// Sets: `task`, `error` (`"full"` or `"closed"`)
    MessageDropped,
}

/// Orchestrator event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Task the event refers to, if applicable.
    pub task: Option<TaskId>,
    /// Short error label or reason.
    pub error: Option<Arc<str>>,
    /// Signed error code, if applicable.
    pub code: Option<i32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            error: None,
            code: None,
        }
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }

    /// Attaches an error label or reason.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attaches a signed error code.
    #[inline]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Creates a `LifecycleFailed` event from an orchestrator error.
    pub fn failure(err: &crate::error::OrchestratorError) -> Self {
        Event::new(EventKind::LifecycleFailed)
            .with_task(err.task())
            .with_error(err.as_label())
            .with_code(err.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskStarted);
        assert!(b.seq > a.seq);
    }
}
