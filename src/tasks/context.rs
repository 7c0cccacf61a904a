//! # Task context handed to a body on `init`.
//!
//! [`TaskContext`] bundles the task's shared runtime record with the timing
//! configuration, so a body can dwell, take its queue receiver and spawn its
//! loop without reaching for globals.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{
    config::Config,
    core::dwell,
    error::TaskError,
    tasks::{id::TaskId, runtime::TaskRuntimeState},
};

/// Per-task handle given to [`TaskBody::init`](crate::TaskBody::init).
#[derive(Clone, Debug)]
pub struct TaskContext {
    state: Arc<TaskRuntimeState>,
    cfg: Arc<Config>,
}

impl TaskContext {
    pub(crate) fn new(state: Arc<TaskRuntimeState>, cfg: Arc<Config>) -> Self {
        Self { state, cfg }
    }

    pub fn id(&self) -> TaskId {
        self.state.id()
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn state(&self) -> &Arc<TaskRuntimeState> {
        &self.state
    }

    /// Takes the consumer side of the task's queue (once).
    pub fn take_receiver(&self) -> Option<mpsc::Receiver<Vec<u8>>> {
        self.state.queue().take_receiver()
    }

    /// Acquires the run handle, then spawns `f` on the runtime.
    ///
    /// The handle is held before this returns and released when the future
    /// completes, so the task reads as running from the moment `start` returns.
    pub fn spawn_loop<F, Fut>(&self, f: F) -> Result<JoinHandle<()>, TaskError>
    where
        F: FnOnce(TaskContext) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let guard = self
            .state
            .run_handle()
            .try_enter()
            .ok_or(TaskError::AlreadyRunning)?;
        let fut = f(self.clone());
        Ok(tokio::spawn(async move {
            let _guard = guard;
            fut.await;
        }))
    }

    /// Cooperative sleep for this task's dwell time; see [`dwell::dwell`].
    pub async fn dwell<P>(&self, can_continue: P)
    where
        P: Fn() -> bool,
    {
        dwell::dwell(&self.state, &self.cfg, can_continue).await;
    }
}
