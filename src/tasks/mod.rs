//! # Task abstractions and declarations.
//!
//! This module provides the task-related types:
//! - [`TaskId`] - closed set of task identities
//! - [`TaskBody`] - lifecycle trait implemented by every task
//! - [`TaskSpec`] - registration-time declaration
//! - [`TaskRuntimeState`] - shared runtime record (initialized flag, run handle, queue)
//! - [`TaskContext`] - what a body receives on `init`

mod body;
mod context;
mod id;
mod queue;
mod run_handle;
mod runtime;
mod spec;

pub use body::{TaskBody, TaskParams};
pub use context::TaskContext;
pub use id::TaskId;
pub use queue::{MessageQueue, QueueError};
pub use run_handle::{RunGuard, RunHandle};
pub use runtime::{OnEnter, TaskRuntimeState};
pub use spec::TaskSpec;
