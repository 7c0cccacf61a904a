//! # Task registry - fixed table of task runners.
//!
//! The registry pairs every [`TaskRuntimeState`] with the [`TaskBody`] that
//! implements it. It is assembled once by [`RegistryBuilder`] and never changes
//! afterwards: no dynamic registration, no removal.
//!
//! ## Rules
//! - Declaration order is the order of bulk init and finalize.
//! - One runner per [`TaskId`]; a duplicate fails `build()`.
//! - Lookups of an unregistered id return [`OrchestratorError::NotFound`].
//! - Each runner serializes its own lifecycle calls through `lifecycle`.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    error::OrchestratorError,
    tasks::{TaskBody, TaskId, TaskRuntimeState, TaskSpec},
};

/// One registry entry: runtime state + lifecycle implementation.
pub struct TaskRunner {
    state: Arc<TaskRuntimeState>,
    body: Arc<dyn TaskBody>,
    auto_start: bool,
    lifecycle: Mutex<()>,
}

impl TaskRunner {
    pub fn id(&self) -> TaskId {
        self.state.id()
    }

    pub fn state(&self) -> &Arc<TaskRuntimeState> {
        &self.state
    }

    pub fn body(&self) -> &Arc<dyn TaskBody> {
        &self.body
    }

    /// Started by `start_auto_tasks` rather than by an explicit `run`.
    pub fn is_auto_start(&self) -> bool {
        self.auto_start
    }

    /// Serializes lifecycle calls on this runner.
    pub(crate) async fn lock_lifecycle(&self) -> MutexGuard<'_, ()> {
        self.lifecycle.lock().await
    }
}

/// Fixed, ordered table of task runners.
pub struct TaskRegistry {
    runners: Vec<TaskRunner>,
}

impl TaskRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Looks up the runner for `id`.
    pub fn get(&self, id: TaskId) -> Result<&TaskRunner, OrchestratorError> {
        self.runners
            .iter()
            .find(|r| r.id() == id)
            .ok_or(OrchestratorError::NotFound { id })
    }

    /// Runners in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskRunner> {
        self.runners.iter()
    }

    /// Registered ids in declaration order.
    pub fn ids(&self) -> Vec<TaskId> {
        self.runners.iter().map(TaskRunner::id).collect()
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}

/// Assembles a [`TaskRegistry`] in declaration order.
#[derive(Default)]
pub struct RegistryBuilder {
    runners: Vec<TaskRunner>,
    duplicate: Option<TaskId>,
}

impl RegistryBuilder {
    /// Appends a task. Order of calls is the declaration order.
    pub fn task(mut self, spec: TaskSpec, body: Arc<dyn TaskBody>) -> Self {
        let id = spec.id();
        if self.runners.iter().any(|r| r.id() == id) {
            self.duplicate.get_or_insert(id);
            return self;
        }
        let auto_start = spec.is_auto_start();
        self.runners.push(TaskRunner {
            state: Arc::new(spec.into_state()),
            body,
            auto_start,
            lifecycle: Mutex::new(()),
        });
        self
    }

    /// Finishes the table.
    pub fn build(self) -> Result<TaskRegistry, OrchestratorError> {
        if let Some(id) = self.duplicate {
            return Err(OrchestratorError::DuplicateTask { id });
        }
        Ok(TaskRegistry {
            runners: self.runners,
        })
    }
}
