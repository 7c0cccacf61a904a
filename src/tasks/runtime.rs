//! # Per-task runtime record.
//!
//! [`TaskRuntimeState`] is built once from a [`TaskSpec`](crate::TaskSpec) when the
//! registry is assembled, and shared (`Arc`) between the orchestrator and the task body.
//!
//! ## Writers
//! - `initialized`: the orchestrator only, false → true once, never cleared.
//! - `run_handle`: the task body's loop (through [`RunGuard`](crate::RunGuard)).
//! - everything else is fixed at registration.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{id::TaskId, queue::MessageQueue, run_handle::RunHandle};

/// Callback invoked by the orchestrator right before a task is started.
pub type OnEnter = Arc<dyn Fn() + Send + Sync>;

/// Mutable runtime record of one registered task.
pub struct TaskRuntimeState {
    id: TaskId,
    name: Cow<'static, str>,
    dwell_seconds: i32,
    initialized: AtomicBool,
    explicit_stop: bool,
    run_handle: RunHandle,
    queue: MessageQueue,
    on_enter: Option<OnEnter>,
}

impl TaskRuntimeState {
    pub(crate) fn new(
        id: TaskId,
        name: Cow<'static, str>,
        dwell_seconds: i32,
        explicit_stop: bool,
        queue: MessageQueue,
        on_enter: Option<OnEnter>,
    ) -> Self {
        Self {
            id,
            name,
            dwell_seconds,
            initialized: AtomicBool::new(false),
            explicit_stop,
            run_handle: RunHandle::new(),
            queue,
            on_enter,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loop sleep hint in seconds; `-1` means the task manages its own timing.
    pub fn dwell_seconds(&self) -> i32 {
        self.dwell_seconds
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Excluded from `wait_for_all_to_stop`; must be stopped individually.
    pub fn explicit_stop(&self) -> bool {
        self.explicit_stop
    }

    pub fn run_handle(&self) -> &RunHandle {
        &self.run_handle
    }

    pub fn is_running(&self) -> bool {
        self.run_handle.is_running()
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    pub(crate) fn on_enter(&self) -> Option<&OnEnter> {
        self.on_enter.as_ref()
    }

    pub(crate) fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
    }
}

impl fmt::Debug for TaskRuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRuntimeState")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("dwell_seconds", &self.dwell_seconds)
            .field("initialized", &self.is_initialized())
            .field("explicit_stop", &self.explicit_stop)
            .field("running", &self.is_running())
            .field("on_enter", &self.on_enter.is_some())
            .finish()
    }
}
