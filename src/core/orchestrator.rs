//! # Orchestrator: ordered lifecycle of the registered tasks.
//!
//! The [`Orchestrator`] owns the [`TaskRegistry`], the timing [`Config`], the
//! shared [`ShutdownFlag`] and the lifecycle event [`Bus`]. It never runs task
//! loops itself; task bodies spawn their loops in `start` and hold their
//! [`RunHandle`](crate::RunHandle) while the loop executes.
//!
//! ## Lifecycle
//! ```text
//! boot:      init_all()                  declaration order, fail-fast, no rollback
//!            start_auto_tasks()          run() for every auto-start entry
//!            run(id, wait_for)           on_enter → start → optional wait predicate
//!
//! teardown:  stop_and_wait(explicit)     stop → poll run handle until released
//!            wait_for_all_to_stop()      poll every non-explicit task until one clean pass
//!            finalize_all()              declaration order, fail-fast
//! ```
//!
//! ## Shutdown flag
//! Once raised, `run()` refuses with [`OrchestratorError::Cancelled`]. Running
//! tasks are unaffected; they are stopped explicitly.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use cellvisor::{Config, Orchestrator, ShutdownFlag, TaskRegistry};
//!
//! # async fn demo() -> Result<(), cellvisor::OrchestratorError> {
//! let registry = TaskRegistry::builder().build()?;
//! let orch = Orchestrator::new(Config::default(), registry, ShutdownFlag::new());
//!
//! orch.init_all().await?;
//! orch.start_auto_tasks().await?;
//! // ... device runs ...
//! orch.request_shutdown();
//! orch.wait_for_all_to_stop().await;
//! orch.finalize_all().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::{self, Instant};
use tracing::{debug, error, info};

use crate::{
    config::Config,
    core::{
        dwell,
        registry::{TaskRegistry, TaskRunner},
        shutdown::ShutdownFlag,
    },
    error::OrchestratorError,
    events::{Bus, Event, EventKind},
    tasks::{QueueError, TaskContext, TaskId, TaskParams, TaskRuntimeState},
};

/// Predicate polled by [`Orchestrator::run`] after a task is started.
pub type WaitFor<'a> = &'a (dyn Fn() -> bool + Send + Sync);

/// Outcome of a non-failing [`Orchestrator::send_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Message is on the task's queue.
    Queued,
    /// Queue was full (or its consumer is gone); the message was discarded.
    Dropped,
}

/// Drives the lifecycle of every task in the registry.
pub struct Orchestrator {
    cfg: Arc<Config>,
    registry: TaskRegistry,
    shutdown: ShutdownFlag,
    bus: Bus,
}

impl Orchestrator {
    /// Creates an orchestrator over a fixed registry.
    pub fn new(cfg: Config, registry: TaskRegistry, shutdown: ShutdownFlag) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg: Arc::new(cfg),
            registry,
            shutdown,
            bus,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn shutdown_flag(&self) -> &ShutdownFlag {
        &self.shutdown
    }

    /// Subscribes to lifecycle events published from now on.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runtime state of a registered task.
    pub fn state(&self, id: TaskId) -> Result<&Arc<TaskRuntimeState>, OrchestratorError> {
        self.lookup(id).map(TaskRunner::state)
    }

    /// Raises the shutdown flag; later `run()` calls are refused.
    pub fn request_shutdown(&self) {
        if !self.shutdown.is_triggered() {
            info!("shutdown requested");
            self.shutdown.trigger();
            self.bus.publish(Event::new(EventKind::ShutdownRequested));
        }
    }

    /// Initialises every task in declaration order.
    ///
    /// Stops at the first failure and returns it; tasks initialised before the
    /// failure stay initialised.
    pub async fn init_all(&self) -> Result<(), OrchestratorError> {
        for runner in self.registry.iter() {
            self.init_runner(runner).await?;
        }
        Ok(())
    }

    /// Initialises one task. A no-op if it is already initialised.
    pub async fn init_one(&self, id: TaskId) -> Result<(), OrchestratorError> {
        let runner = self.lookup(id)?;
        self.init_runner(runner).await
    }

    /// Starts a task with default parameters; see [`Orchestrator::run_with`].
    pub async fn run(
        &self,
        id: TaskId,
        wait_for: Option<WaitFor<'_>>,
    ) -> Result<(), OrchestratorError> {
        self.run_with(id, TaskParams::default(), wait_for).await
    }

    /// Starts a task: `on_enter`, then `start(params)`.
    ///
    /// If `wait_for` is given, polls it every `wait_step` until it returns true,
    /// failing with [`OrchestratorError::WaitFailed`] after `wait_timeout`.
    pub async fn run_with(
        &self,
        id: TaskId,
        params: TaskParams,
        wait_for: Option<WaitFor<'_>>,
    ) -> Result<(), OrchestratorError> {
        if self.shutdown.is_triggered() {
            debug!(task = %id, "shutdown in progress, not running task");
            return Err(OrchestratorError::Cancelled { id });
        }

        let runner = self.lookup(id)?;
        let state = runner.state();
        {
            let _lifecycle = runner.lock_lifecycle().await;

            if let Some(on_enter) = state.on_enter() {
                (**on_enter)();
            }
            self.bus
                .publish(Event::new(EventKind::TaskStarting).with_task(id));

            if let Err(source) = runner.body().start(params).await {
                error!(task = %state.name(), code = source.code(), error = %source, "failed to start task");
                return Err(self.failed(OrchestratorError::StartFailed { id, source }));
            }
            self.bus
                .publish(Event::new(EventKind::TaskStarted).with_task(id));
        }

        match wait_for {
            Some(predicate) => self.wait_until(id, predicate).await,
            None => Ok(()),
        }
    }

    /// Runs every auto-start task in declaration order, stopping at the first failure.
    pub async fn start_auto_tasks(&self) -> Result<(), OrchestratorError> {
        let auto: Vec<TaskId> = self
            .registry
            .iter()
            .filter(|r| r.is_auto_start())
            .map(TaskRunner::id)
            .collect();
        for id in auto {
            self.run(id, None).await?;
        }
        Ok(())
    }

    /// Stops one task and waits for its loop to release the run handle.
    pub async fn stop_and_wait(&self, id: TaskId) -> Result<(), OrchestratorError> {
        self.stop_and_wait_with(id, TaskParams::default()).await
    }

    /// Like [`Orchestrator::stop_and_wait`], forwarding `params` to the body's `stop`.
    pub async fn stop_and_wait_with(
        &self,
        id: TaskId,
        params: TaskParams,
    ) -> Result<(), OrchestratorError> {
        let runner = self.lookup(id)?;
        self.request_stop(runner, params).await?;
        self.wait_for_task_to_stop(runner).await;
        Ok(())
    }

    /// Returns once every non-explicit-stop task is seen stopped in the same pass.
    ///
    /// Sleeps `all_stop_poll_interval` after each pass. A task that never
    /// releases its run handle keeps this waiting indefinitely.
    pub async fn wait_for_all_to_stop(&self) {
        info!("waiting for tasks to stop, this can take some time if modem commands have to time out");
        loop {
            let mut still_waiting = false;
            for runner in self.registry.iter() {
                let state = runner.state();
                if state.explicit_stop() {
                    continue;
                }
                if state.is_running() {
                    debug!(task = %state.name(), "still waiting for task to finish");
                    still_waiting = true;
                }
            }

            time::sleep(self.cfg.all_stop_poll_interval()).await;
            if !still_waiting {
                break;
            }
        }
        info!("all tasks have now finished");
        self.bus.publish(Event::new(EventKind::AllStopped));
    }

    /// Finalises every task in declaration order, stopping at the first failure.
    pub async fn finalize_all(&self) -> Result<(), OrchestratorError> {
        info!("finalizing all tasks");
        for runner in self.registry.iter() {
            self.finalize_runner(runner).await?;
        }
        Ok(())
    }

    /// Cooperative sleep for `state`'s dwell time; see [`dwell::dwell`].
    pub async fn dwell<P>(&self, state: &TaskRuntimeState, can_continue: P) -> u64
    where
        P: Fn() -> bool,
    {
        dwell::dwell(state, &self.cfg, can_continue).await
    }

    /// Puts a message on a task's queue without waiting.
    ///
    /// A full queue is expected backpressure: the message is dropped, logged at
    /// debug level and reported as [`Delivery::Dropped`].
    pub fn send_message(
        &self,
        id: TaskId,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Delivery, OrchestratorError> {
        let runner = self.lookup(id)?;
        let state = runner.state();

        if !state.is_initialized() {
            error!(task = %state.name(), "task is not initialised, not queueing message");
            return Err(OrchestratorError::NotInitialized { id });
        }

        match state.queue().try_send(payload.into()) {
            Ok(()) => Ok(Delivery::Queued),
            Err(QueueError::Full) => {
                debug!(task = %state.name(), "task queue full, message dropped");
                self.publish_dropped(id, "full");
                Ok(Delivery::Dropped)
            }
            Err(QueueError::Closed) => {
                debug!(task = %state.name(), "task queue closed, message dropped");
                self.publish_dropped(id, "closed");
                Ok(Delivery::Dropped)
            }
            Err(QueueError::TooLarge { size, max }) => {
                error!(task = %state.name(), size, max, "message larger than queue element");
                Err(OrchestratorError::InvalidMessage { id, size, max })
            }
        }
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    fn lookup(&self, id: TaskId) -> Result<&TaskRunner, OrchestratorError> {
        self.registry.get(id).inspect_err(|_| {
            error!(task = %id, "failed to find task");
        })
    }

    async fn init_runner(&self, runner: &TaskRunner) -> Result<(), OrchestratorError> {
        let _lifecycle = runner.lock_lifecycle().await;
        let state = runner.state();
        let id = state.id();

        if state.is_initialized() {
            debug!(task = %state.name(), "task has already been initialised");
            return Ok(());
        }

        let ctx = TaskContext::new(Arc::clone(state), Arc::clone(&self.cfg));
        if let Err(source) = runner.body().init(ctx).await {
            error!(task = %state.name(), code = source.code(), error = %source, "failed to initialise task");
            return Err(self.failed(OrchestratorError::InitFailed { id, source }));
        }

        state.mark_initialized();
        self.bus
            .publish(Event::new(EventKind::TaskInitialized).with_task(id));
        Ok(())
    }

    async fn request_stop(
        &self,
        runner: &TaskRunner,
        params: TaskParams,
    ) -> Result<(), OrchestratorError> {
        let _lifecycle = runner.lock_lifecycle().await;
        let state = runner.state();
        let id = state.id();

        if !runner.body().has_stop() {
            debug!(task = %state.name(), "task does not have a stop function");
            return Ok(());
        }

        self.bus
            .publish(Event::new(EventKind::StopRequested).with_task(id));
        if let Err(source) = runner.body().stop(params).await {
            error!(task = %state.name(), code = source.code(), error = %source, "stopping task failed");
            return Err(self.failed(OrchestratorError::StopFailed { id, source }));
        }
        Ok(())
    }

    async fn wait_for_task_to_stop(&self, runner: &TaskRunner) {
        let state = runner.state();
        while state.is_running() {
            info!(task = %state.name(), "waiting for task to stop");
            time::sleep(self.cfg.stop_poll_interval()).await;
        }
        self.bus
            .publish(Event::new(EventKind::TaskStopped).with_task(state.id()));
    }

    async fn finalize_runner(&self, runner: &TaskRunner) -> Result<(), OrchestratorError> {
        let _lifecycle = runner.lock_lifecycle().await;
        let state = runner.state();
        let id = state.id();

        if let Err(source) = runner.body().finalize().await {
            error!(task = %state.name(), code = source.code(), error = %source, "failed to finalize task");
            return Err(self.failed(OrchestratorError::FinalizeFailed { id, source }));
        }
        self.bus
            .publish(Event::new(EventKind::TaskFinalized).with_task(id));
        Ok(())
    }

    async fn wait_until(&self, id: TaskId, predicate: WaitFor<'_>) -> Result<(), OrchestratorError> {
        let started = time::Instant::now();
        loop {
            if predicate() {
                return Ok(());
            }
            let waited = started.elapsed();
            if waited >= self.cfg.wait_timeout {
                error!(task = %id, waited_ms = waited.as_millis() as u64, "gave up waiting for task");
                return Err(self.failed(OrchestratorError::WaitFailed {
                    id,
                    waited_ms: waited.as_millis() as u64,
                }));
            }
            time::sleep(self.cfg.wait_step()).await;
        }
    }

    fn publish_dropped(&self, id: TaskId, reason: &'static str) {
        self.bus.publish(
            Event::new(EventKind::MessageDropped)
                .with_task(id)
                .with_error(reason),
        );
    }

    /// Publishes `LifecycleFailed` for `err` and hands it back.
    fn failed(&self, err: OrchestratorError) -> OrchestratorError {
        self.bus.publish(Event::failure(&err));
        err
    }
}
