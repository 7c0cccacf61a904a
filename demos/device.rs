//! Simulated device: registration, sensor and indicator tasks under the orchestrator.
//!
//! Runs until Ctrl-C (or 20 simulated seconds), then shuts down in order:
//! bulk-stoppable tasks first, then network registration, then finalize.
//!
//! ```bash
//! cargo run --example device
//! RUST_LOG=debug cargo run --example device
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use cellvisor::indicator::{
    ChannelDriver, IndicatorStateMachine, IndicatorTask, SharedDriver, StatusToIndicatorMapping,
    standard_spec,
};
use cellvisor::observe::{LoggerConfig, logger_init, spawn_event_logger};
use cellvisor::{
    AppState, AppStatus, Config, Orchestrator, ShutdownFlag, TaskBody, TaskContext, TaskError,
    TaskId, TaskParams, TaskRegistry, TaskSpec,
};

/// Prints channel changes instead of driving GPIOs.
#[derive(Default)]
struct ConsoleLeds {
    state: [bool; 3],
}

impl ChannelDriver for ConsoleLeds {
    fn set_channel(&mut self, index: usize, on: bool) {
        if self.state[index] != on {
            self.state[index] = on;
            let name = ["red", "green", "blue"][index];
            tracing::trace!(led = name, on, "led changed");
        }
    }
}

/// Loop body shared by the demo tasks: runs `step` once per dwell until stopped.
struct LoopTask {
    ctx: Mutex<Option<TaskContext>>,
    stop: Mutex<Option<CancellationToken>>,
    step: Arc<dyn Fn(&TaskContext) + Send + Sync>,
}

impl LoopTask {
    fn new(step: impl Fn(&TaskContext) + Send + Sync + 'static) -> Self {
        Self {
            ctx: Mutex::new(None),
            stop: Mutex::new(None),
            step: Arc::new(step),
        }
    }
}

#[async_trait]
impl TaskBody for LoopTask {
    async fn init(&self, ctx: TaskContext) -> Result<(), TaskError> {
        info!(task = %ctx.name(), "initializing task");
        *self.ctx.lock().unwrap() = Some(ctx);
        Ok(())
    }

    async fn start(&self, _params: TaskParams) -> Result<(), TaskError> {
        let ctx = self.ctx.lock().unwrap().clone().ok_or(TaskError::NoContext)?;
        let token = CancellationToken::new();
        let stop = token.clone();
        let step = Arc::clone(&self.step);

        ctx.spawn_loop(move |ctx| async move {
            while !stop.is_cancelled() {
                step(&ctx);
                ctx.dwell(|| !stop.is_cancelled()).await;
            }
            info!(task = %ctx.name(), "task loop exited");
        })?;

        *self.stop.lock().unwrap() = Some(token);
        Ok(())
    }

    async fn stop(&self, _params: TaskParams) -> Result<(), TaskError> {
        if let Some(token) = self.stop.lock().unwrap().take() {
            token.cancel();
        }
        Ok(())
    }

    async fn finalize(&self) -> Result<(), TaskError> {
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logger_init(&LoggerConfig::default())?;

    let app_state = AppState::new(AppStatus::InitDevice);
    let leds: SharedDriver = Arc::new(Mutex::new(ConsoleLeds::default()));
    let registered = Arc::new(AtomicBool::new(false));

    let registration = {
        let app_state = app_state.clone();
        let registered = Arc::clone(&registered);
        LoopTask::new(move |ctx| {
            if !registered.swap(true, Ordering::SeqCst) {
                info!(task = %ctx.name(), "registered on the network");
                app_state.set(AppStatus::Registered);
            }
        })
    };
    let sensor = LoopTask::new(|ctx| info!(task = %ctx.name(), "sampling sensor"));
    let indicator = IndicatorTask::new(
        IndicatorStateMachine::new(StatusToIndicatorMapping::standard(), Arc::clone(&leds), 50),
        app_state.clone(),
    );

    let registry = TaskRegistry::builder()
        .task(standard_spec(TaskId::Indicator, &leds), Arc::new(indicator))
        .task(
            standard_spec(TaskId::NetworkRegistration, &leds).with_dwell(1),
            Arc::new(registration),
        )
        .task(TaskSpec::standard(TaskId::Sensor).with_dwell(5), Arc::new(sensor))
        .build()?;

    let shutdown = ShutdownFlag::new();
    shutdown.trigger_on_signal();

    let orch = Orchestrator::new(Config::default(), registry, shutdown.clone());
    let events = spawn_event_logger(orch.events());

    orch.init_all().await?;
    orch.start_auto_tasks().await?;

    app_state.set(AppStatus::Registering);
    let is_registered = || registered.load(Ordering::SeqCst);
    orch.run(TaskId::NetworkRegistration, Some(&is_registered)).await?;
    orch.run(TaskId::Sensor, None).await?;

    tokio::select! {
        _ = shutdown.triggered() => {}
        _ = tokio::time::sleep(Duration::from_secs(20)) => {}
    }

    orch.request_shutdown();
    app_state.set(AppStatus::Shutdown);

    orch.stop_and_wait(TaskId::Sensor).await?;
    orch.stop_and_wait(TaskId::Indicator).await?;
    orch.wait_for_all_to_stop().await;
    orch.stop_and_wait(TaskId::NetworkRegistration).await?;
    orch.finalize_all().await?;

    events.abort();
    Ok(())
}
