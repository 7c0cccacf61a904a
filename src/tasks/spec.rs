//! # Task declaration.
//!
//! Defines [`TaskSpec`], the registration-time description of one task:
//! display name, dwell hint, stop behaviour, queue dimensions and the
//! optional `on_enter` callback.
//!
//! A spec can be created:
//! - **Explicitly** with [`TaskSpec::new`] (generic defaults)
//! - **From the device table** with [`TaskSpec::standard`]
//!
//! ## Example
//! ```rust
//! use cellvisor::{TaskId, TaskSpec};
//!
//! let spec = TaskSpec::standard(TaskId::NetworkRegistration);
//! assert!(spec.is_explicit_stop());
//! assert_eq!(spec.dwell_seconds(), 30);
//!
//! let scan = TaskSpec::new(TaskId::CellScan).with_dwell(-1).with_queue(2, 32);
//! assert_eq!(scan.queue_capacity(), 2);
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use super::{
    id::TaskId,
    queue::MessageQueue,
    runtime::{OnEnter, TaskRuntimeState},
};

/// Registration-time description of a task.
#[derive(Clone)]
pub struct TaskSpec {
    id: TaskId,
    name: Cow<'static, str>,
    dwell_seconds: i32,
    explicit_stop: bool,
    auto_start: bool,
    queue_capacity: usize,
    message_size: usize,
    on_enter: Option<OnEnter>,
}

impl TaskSpec {
    /// Default dwell between loop iterations.
    pub const DEFAULT_DWELL_SECONDS: i32 = 30;
    /// Default queue depth.
    pub const DEFAULT_QUEUE_CAPACITY: usize = 4;
    /// Default queue element size in bytes.
    pub const DEFAULT_MESSAGE_SIZE: usize = 128;

    /// Creates a spec with generic defaults: id name, 30s dwell, bulk-stoppable,
    /// started by the caller.
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            name: Cow::Borrowed(id.name()),
            dwell_seconds: Self::DEFAULT_DWELL_SECONDS,
            explicit_stop: false,
            auto_start: false,
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
            message_size: Self::DEFAULT_MESSAGE_SIZE,
            on_enter: None,
        }
    }

    /// Returns the device's standard declaration for `id`.
    ///
    /// - network registration is stopped explicitly (it deregisters after the others exit);
    /// - cell scan and indicator manage their own timing (`dwell = -1`);
    /// - the indicator has a single-slot queue and is started with the auto-start batch.
    ///
    /// `on_enter` callbacks need a channel driver;
    /// [`indicator::standard_spec`](crate::indicator::standard_spec) attaches them.
    pub fn standard(id: TaskId) -> Self {
        let spec = Self::new(id);
        match id {
            TaskId::NetworkRegistration => spec.with_explicit_stop(true),
            TaskId::CellScan => spec.with_dwell(-1),
            TaskId::Indicator => spec.with_dwell(-1).with_queue(1, 16).with_auto_start(true),
            TaskId::MessageBus | TaskId::SignalQuality | TaskId::Location | TaskId::Sensor => {
                spec
            }
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_dwell(mut self, seconds: i32) -> Self {
        self.dwell_seconds = seconds;
        self
    }

    pub fn with_explicit_stop(mut self, explicit: bool) -> Self {
        self.explicit_stop = explicit;
        self
    }

    pub fn with_auto_start(mut self, auto: bool) -> Self {
        self.auto_start = auto;
        self
    }

    /// Sets queue depth and element size.
    pub fn with_queue(mut self, capacity: usize, message_size: usize) -> Self {
        self.queue_capacity = capacity;
        self.message_size = message_size;
        self
    }

    /// Sets the callback run right before the task is started.
    pub fn with_on_enter<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(f));
        self
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dwell_seconds(&self) -> i32 {
        self.dwell_seconds
    }

    pub fn is_explicit_stop(&self) -> bool {
        self.explicit_stop
    }

    pub fn is_auto_start(&self) -> bool {
        self.auto_start
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn message_size(&self) -> usize {
        self.message_size
    }

    pub(crate) fn into_state(self) -> TaskRuntimeState {
        TaskRuntimeState::new(
            self.id,
            self.name,
            self.dwell_seconds,
            self.explicit_stop,
            MessageQueue::new(self.queue_capacity, self.message_size),
            self.on_enter,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_matches_device_layout() {
        let explicit: Vec<TaskId> = TaskId::ALL
            .into_iter()
            .filter(|id| TaskSpec::standard(*id).is_explicit_stop())
            .collect();
        assert_eq!(explicit, vec![TaskId::NetworkRegistration]);

        assert_eq!(TaskSpec::standard(TaskId::CellScan).dwell_seconds(), -1);
        assert_eq!(TaskSpec::standard(TaskId::Indicator).dwell_seconds(), -1);
        assert_eq!(TaskSpec::standard(TaskId::Sensor).dwell_seconds(), 30);
        assert!(TaskSpec::standard(TaskId::Indicator).is_auto_start());
        assert_eq!(TaskSpec::standard(TaskId::Indicator).queue_capacity(), 1);
    }

    #[test]
    fn into_state_carries_declaration() {
        let state = TaskSpec::new(TaskId::Location)
            .with_name("Gnss")
            .with_dwell(5)
            .with_explicit_stop(true)
            .with_queue(3, 8)
            .with_on_enter(|| {})
            .into_state();

        assert_eq!(state.id(), TaskId::Location);
        assert_eq!(state.name(), "Gnss");
        assert_eq!(state.dwell_seconds(), 5);
        assert!(state.explicit_stop());
        assert!(!state.is_initialized());
        assert!(!state.is_running());
        assert_eq!(state.queue().capacity(), 3);
        assert_eq!(state.queue().message_size(), 8);
        assert!(state.on_enter().is_some());
    }
}
