//! # cellvisor
//!
//! **cellvisor** is the task-orchestration core of a cellular IoT endpoint.
//!
//! It manages a fixed set of cooperating background tasks (network
//! registration, cell scan, message bus, signal quality, indicator, location,
//! sensor) through a uniform lifecycle, coordinates their startup and shutdown
//! ordering, delivers messages to them, and drives a three-channel status
//! indicator from a single global application status.
//!
//! ## Architecture
//! ```text
//!   TaskSpec + TaskBody ──► RegistryBuilder ──► TaskRegistry (fixed, ordered)
//!                                                     │
//!                                                     ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ Orchestrator                                                         │
//! │  init_all / init_one      declaration order, fail-fast, idempotent   │
//! │  run(id, wait_for)        on_enter → start → optional predicate      │
//! │  stop_and_wait(id)        stop → poll run handle                     │
//! │  wait_for_all_to_stop     poll non-explicit-stop tasks               │
//! │  finalize_all             declaration order, fail-fast               │
//! │  send_message(id, bytes)  bounded, non-blocking, drop when full      │
//! └──────────┬─────────────────────────────────────┬─────────────────────┘
//!            │ Bus (broadcast Event)               │ TaskContext
//!            ▼                                     ▼
//!      observers / logs                 task loops (spawn_loop + RunGuard)
//!                                                  │
//!                      AppState (watch) ──► IndicatorTask ──► ChannelDriver
//! ```
//!
//! ## Features
//! | Area             | Description                                          | Key types                                  |
//! |------------------|------------------------------------------------------|--------------------------------------------|
//! | **Tasks**        | Closed task set, lifecycle trait, declarations        | [`TaskId`], [`TaskBody`], [`TaskSpec`]     |
//! | **Orchestration**| Ordered lifecycle, polling shutdown, messages         | [`Orchestrator`], [`TaskRegistry`]         |
//! | **Indicator**    | Duty-cycle channels with priority arbitration         | [`indicator::IndicatorStateMachine`]       |
//! | **Modem**        | Idempotent radio configuration                        | [`modem::configure_radio`]                 |
//! | **Events**       | Lifecycle events on a broadcast bus                   | [`Event`], [`EventKind`]                   |
//! | **Errors**       | Typed errors with stable signed codes                 | [`OrchestratorError`], [`TaskError`]       |
//! | **Observe**      | `tracing` subscriber setup, event logging             | [`observe::LoggerConfig`]                  |
//!
//! ## Optional features
//! - `journald`: enables the journald logger format on Linux.

mod app_state;
mod config;
mod core;
mod error;
mod events;
mod tasks;

pub mod indicator;
pub mod modem;
pub mod observe;

// ---- Public re-exports ----

pub use app_state::{AppState, AppStatus};
pub use config::Config;
pub use crate::core::{
    Delivery, Orchestrator, RegistryBuilder, ShutdownFlag, TaskRegistry, TaskRunner, WaitFor,
    wait_for_shutdown_signal,
};
pub use error::{OrchestratorError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use tasks::{
    MessageQueue, OnEnter, QueueError, RunGuard, RunHandle, TaskBody, TaskContext, TaskId,
    TaskParams, TaskRuntimeState, TaskSpec,
};
