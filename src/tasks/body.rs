//! # Task body contract.
//!
//! This module defines the [`TaskBody`] trait: the four lifecycle entry points
//! every registered task implements. The orchestrator is the only caller.
//!
//! ## Contract
//! - `init(ctx)`: allocate resources, keep the [`TaskContext`]; called once.
//! - `start(params)`: spawn the task loop and return immediately.
//! - `stop(params)`: signal the loop to exit; must not wait for it.
//! - `finalize()`: release resources; called after the loop has exited.

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::context::TaskContext;

/// Opaque parameters forwarded to `start` / `stop` (e.g. from a downlink command).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskParams {
    /// Positional command arguments.
    pub args: Vec<String>,
}

impl TaskParams {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// # Lifecycle of one registered task.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use std::sync::Mutex;
/// use cellvisor::{TaskBody, TaskContext, TaskError, TaskParams};
///
/// #[derive(Default)]
/// struct Idle {
///     ctx: Mutex<Option<TaskContext>>,
/// }
///
/// #[async_trait]
/// impl TaskBody for Idle {
///     async fn init(&self, ctx: TaskContext) -> Result<(), TaskError> {
///         *self.ctx.lock().unwrap() = Some(ctx);
///         Ok(())
///     }
///
///     async fn start(&self, _params: TaskParams) -> Result<(), TaskError> {
///         let ctx = self.ctx.lock().unwrap().clone().ok_or(TaskError::NoContext)?;
///         ctx.spawn_loop(|ctx| async move {
///             ctx.dwell(|| false).await;
///         })?;
///         Ok(())
///     }
///
///     async fn finalize(&self) -> Result<(), TaskError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait TaskBody: Send + Sync + 'static {
    /// Prepares the task; receives the context it keeps for the rest of its life.
    async fn init(&self, ctx: TaskContext) -> Result<(), TaskError>;

    /// Spawns the task loop and returns without waiting for it.
    async fn start(&self, params: TaskParams) -> Result<(), TaskError>;

    /// Whether the task has a stop entry point.
    ///
    /// Tasks without one finish on their own; the orchestrator treats a stop
    /// request as an immediate success and only waits for the loop to exit.
    fn has_stop(&self) -> bool {
        true
    }

    /// Signals the loop to exit. Must not block on the loop.
    async fn stop(&self, _params: TaskParams) -> Result<(), TaskError> {
        Ok(())
    }

    /// Releases resources after the loop has exited.
    async fn finalize(&self) -> Result<(), TaskError>;
}
