//! # Logging and event observation.
//!
//! - [`logger_init`] installs the global `tracing` subscriber described by a [`LoggerConfig`];
//! - [`log_event`] / [`spawn_event_logger`] mirror orchestrator [`Event`](crate::Event)s into the log.

mod config;
mod error;
mod format;
mod log;
mod view;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;
pub use view::{log_event, message_for, spawn_event_logger};

/// Installs the global subscriber. Fails if one is already installed.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::install(cfg)
}
