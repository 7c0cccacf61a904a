//! Error types used by the orchestrator and by task bodies.
//!
//! This module defines two main error enums:
//!
//! - [`OrchestratorError`] - errors raised by the orchestration core itself.
//! - [`TaskError`] - errors raised by a task body's lifecycle calls.
//!
//! Both carry a stable signed code ([`OrchestratorError::code`], [`TaskError::code`])
//! for callers that drive the device from a top-level loop, and a short
//! label (`as_label`) for logs.

use thiserror::Error;

use crate::tasks::TaskId;

/// # Errors produced by the orchestrator.
///
/// Lookup failures and lifecycle failures are surfaced to the immediate caller;
/// the orchestrator never retries on its own.
///
/// A full or closed message queue is not an error: `send_message` reports it
/// as [`Delivery::Dropped`](crate::Delivery::Dropped).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// No runner is registered for the task id.
    #[error("task {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: TaskId,
    },

    /// Operation attempted before the task completed `init`.
    #[error("task {id} is not initialised")]
    NotInitialized {
        /// The task that is not ready.
        id: TaskId,
    },

    /// Shutdown is in progress; new tasks are not started.
    #[error("shutdown in progress, not running task {id}")]
    Cancelled {
        /// The task that was refused.
        id: TaskId,
    },

    /// The task body's `init` failed.
    #[error("failed to initialise task {id}: {source}")]
    InitFailed {
        /// The failing task.
        id: TaskId,
        /// Error returned by the task body.
        source: TaskError,
    },

    /// The task body's `start` failed.
    #[error("failed to start task {id}: {source}")]
    StartFailed {
        /// The failing task.
        id: TaskId,
        /// Error returned by the task body.
        source: TaskError,
    },

    /// The task body's `stop` failed.
    #[error("failed to stop task {id}: {source}")]
    StopFailed {
        /// The failing task.
        id: TaskId,
        /// Error returned by the task body.
        source: TaskError,
    },

    /// The task body's `finalize` failed.
    #[error("failed to finalize task {id}: {source}")]
    FinalizeFailed {
        /// The failing task.
        id: TaskId,
        /// Error returned by the task body.
        source: TaskError,
    },

    /// The wait predicate passed to `run` never became true.
    #[error("gave up waiting for task {id} after {waited_ms}ms")]
    WaitFailed {
        /// The task that was started.
        id: TaskId,
        /// How long the orchestrator waited.
        waited_ms: u64,
    },

    /// The message does not fit the element size registered for the queue.
    #[error("message of {size} bytes exceeds task {id} limit of {max} bytes")]
    InvalidMessage {
        /// The receiving task.
        id: TaskId,
        /// Size of the rejected payload.
        size: usize,
        /// Registered element size.
        max: usize,
    },

    /// Two runners were registered for the same id.
    #[error("task {id} registered twice")]
    DuplicateTask {
        /// The duplicated id.
        id: TaskId,
    },
}

impl OrchestratorError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use cellvisor::{OrchestratorError, TaskId};
    ///
    /// let err = OrchestratorError::NotFound { id: TaskId::Sensor };
    /// assert_eq!(err.as_label(), "task_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            OrchestratorError::NotFound { .. } => "task_not_found",
            OrchestratorError::NotInitialized { .. } => "task_not_initialised",
            OrchestratorError::Cancelled { .. } => "shutdown_cancelled",
            OrchestratorError::InitFailed { .. } => "init_failed",
            OrchestratorError::StartFailed { .. } => "start_failed",
            OrchestratorError::StopFailed { .. } => "stop_failed",
            OrchestratorError::FinalizeFailed { .. } => "finalize_failed",
            OrchestratorError::WaitFailed { .. } => "wait_failed",
            OrchestratorError::InvalidMessage { .. } => "invalid_message",
            OrchestratorError::DuplicateTask { .. } => "duplicate_task",
        }
    }

    /// Returns the signed error code reported to the application driver.
    ///
    /// Lifecycle failures report the task body's own code verbatim.
    pub fn code(&self) -> i32 {
        match self {
            OrchestratorError::WaitFailed { .. } => -1,
            OrchestratorError::NotInitialized { .. } => -2,
            OrchestratorError::InvalidMessage { .. } | OrchestratorError::DuplicateTask { .. } => {
                -5
            }
            OrchestratorError::NotFound { .. } => -11,
            OrchestratorError::Cancelled { .. } => -15,
            OrchestratorError::InitFailed { source, .. }
            | OrchestratorError::StartFailed { source, .. }
            | OrchestratorError::StopFailed { source, .. }
            | OrchestratorError::FinalizeFailed { source, .. } => source.code(),
        }
    }

    /// Returns the task this error refers to.
    pub fn task(&self) -> TaskId {
        match self {
            OrchestratorError::NotFound { id }
            | OrchestratorError::NotInitialized { id }
            | OrchestratorError::Cancelled { id }
            | OrchestratorError::InitFailed { id, .. }
            | OrchestratorError::StartFailed { id, .. }
            | OrchestratorError::StopFailed { id, .. }
            | OrchestratorError::FinalizeFailed { id, .. }
            | OrchestratorError::WaitFailed { id, .. }
            | OrchestratorError::InvalidMessage { id, .. }
            | OrchestratorError::DuplicateTask { id } => *id,
        }
    }
}

/// # Errors produced by task bodies.
///
/// Returned from [`TaskBody`](crate::TaskBody) lifecycle calls and propagated
/// verbatim by the orchestrator.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Lifecycle call failed with a device/SDK error code.
    #[error("failed with code {code}: {error}")]
    Fail {
        /// Negative error code from the underlying SDK.
        code: i32,
        /// The underlying error message.
        error: String,
    },

    /// `start` was called while the loop still holds its run handle.
    #[error("task loop is already running")]
    AlreadyRunning,

    /// The lifecycle call was made before the task received its context.
    #[error("task context missing (init not called)")]
    NoContext,
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(code: i32, error: impl Into<String>) -> Self {
        TaskError::Fail {
            code,
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use cellvisor::TaskError;
    ///
    /// assert_eq!(TaskError::AlreadyRunning.as_label(), "task_already_running");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::AlreadyRunning => "task_already_running",
            TaskError::NoContext => "task_no_context",
        }
    }

    /// Returns the signed code of this error.
    pub fn code(&self) -> i32 {
        match self {
            TaskError::Fail { code, .. } => *code,
            TaskError::AlreadyRunning => -13,
            TaskError::NoContext => -2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_report_body_code() {
        let err = OrchestratorError::InitFailed {
            id: TaskId::CellScan,
            source: TaskError::fail(-42, "at timeout"),
        };
        assert_eq!(err.code(), -42);
        assert_eq!(err.task(), TaskId::CellScan);
        assert_eq!(err.as_label(), "init_failed");
    }

    #[test]
    fn lookup_errors_have_distinct_codes() {
        let not_found = OrchestratorError::NotFound { id: TaskId::Sensor };
        let not_init = OrchestratorError::NotInitialized { id: TaskId::Sensor };
        let cancelled = OrchestratorError::Cancelled { id: TaskId::Sensor };
        assert_ne!(not_found.code(), not_init.code());
        assert_ne!(not_found.code(), cancelled.code());
        assert!(not_found.code() < 0 && not_init.code() < 0 && cancelled.code() < 0);
    }
}
