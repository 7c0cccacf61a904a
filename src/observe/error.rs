use thiserror::Error;
use tracing_subscriber::filter::ParseError;

/// Failure to set up the global `tracing` subscriber.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoggerError {
    /// Unknown `LoggerFormat` name.
    #[error("unknown log format {0:?} (expected text, json or journald)")]
    InvalidFormat(String),

    /// The configured level is not a valid `EnvFilter` directive.
    #[error("invalid log filter {directive:?}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },

    /// Built without the `journald` feature, or not on Linux.
    #[error("journald output needs the `journald` feature on Linux")]
    JournaldNotSupported,

    /// The journald socket could not be opened.
    #[error("cannot connect to journald: {0}")]
    JournaldUnavailable(String),

    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("failed to install tracing subscriber: {0}")]
    InitializationFailed(String),
}
