//! Indicator task body.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::{
    app_state::AppState,
    error::TaskError,
    tasks::{TaskBody, TaskContext, TaskId, TaskParams, TaskSpec},
};

use super::{
    channel::{RED, SharedDriver},
    machine::IndicatorStateMachine,
};

type Receiver = mpsc::Receiver<Vec<u8>>;

/// Runs an [`IndicatorStateMachine`] against the shared [`AppState`].
///
/// Queue messages are drained each tick and carry no commands yet.
pub struct IndicatorTask {
    machine: Arc<Mutex<IndicatorStateMachine>>,
    app_state: AppState,
    ctx: Mutex<Option<TaskContext>>,
    rx: Arc<Mutex<Option<Receiver>>>,
    stop: Mutex<Option<CancellationToken>>,
}

impl IndicatorTask {
    pub fn new(machine: IndicatorStateMachine, app_state: AppState) -> Self {
        Self {
            machine: Arc::new(Mutex::new(machine)),
            app_state,
            ctx: Mutex::new(None),
            rx: Arc::new(Mutex::new(None)),
            stop: Mutex::new(None),
        }
    }
}

/// `on_enter` callback switching channel `index` on.
pub fn channel_on_enter(driver: SharedDriver, index: usize) -> impl Fn() + Send + Sync + 'static {
    move || {
        driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_channel(index, true);
    }
}

/// [`TaskSpec::standard`] plus the device's `on_enter` wiring: network
/// registration and the indicator light the red channel when they start.
pub fn standard_spec(id: TaskId, driver: &SharedDriver) -> TaskSpec {
    let spec = TaskSpec::standard(id);
    match id {
        TaskId::NetworkRegistration | TaskId::Indicator => {
            spec.with_on_enter(channel_on_enter(Arc::clone(driver), RED))
        }
        _ => spec,
    }
}

#[async_trait]
impl TaskBody for IndicatorTask {
    async fn init(&self, ctx: TaskContext) -> Result<(), TaskError> {
        info!(task = %ctx.name(), "initializing task");
        *self.rx.lock().unwrap_or_else(PoisonError::into_inner) = ctx.take_receiver();
        *self.ctx.lock().unwrap_or_else(PoisonError::into_inner) = Some(ctx);
        Ok(())
    }

    async fn start(&self, _params: TaskParams) -> Result<(), TaskError> {
        let ctx = self
            .ctx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(TaskError::NoContext)?;

        let token = CancellationToken::new();
        let machine = Arc::clone(&self.machine);
        let rx_slot = Arc::clone(&self.rx);
        let app_state = self.app_state.clone();
        let stop = token.clone();

        let tick_ms = machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick_ms();

        ctx.spawn_loop(move |ctx| async move {
            let mut rx = rx_slot.lock().unwrap_or_else(PoisonError::into_inner).take();
            let mut ticker = time::interval(Duration::from_millis(u64::from(tick_ms.max(1))));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if let Some(rx) = rx.as_mut() {
                    while let Ok(msg) = rx.try_recv() {
                        trace!(task = %ctx.name(), len = msg.len(), "indicator message ignored");
                    }
                }
                let status = app_state.get();
                machine
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .step(status);
            }

            *rx_slot.lock().unwrap_or_else(PoisonError::into_inner) = rx;
            debug!(task = %ctx.name(), "indicator loop exited");
        })?;

        *self.stop.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    async fn stop(&self, _params: TaskParams) -> Result<(), TaskError> {
        if let Some(token) = self.stop.lock().unwrap_or_else(PoisonError::into_inner).take() {
            token.cancel();
        }
        Ok(())
    }

    async fn finalize(&self) -> Result<(), TaskError> {
        self.machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .all_off();
        Ok(())
    }
}
