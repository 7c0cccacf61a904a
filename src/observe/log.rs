use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, time::OffsetTime},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::{SubscriberInitExt, TryInitError},
};

use super::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Builds the filter and the output layer for `cfg.format` and installs them globally.
pub(super) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let registry = tracing_subscriber::registry().with(build_filter(cfg)?);
    match cfg.format {
        LoggerFormat::Text => registry.with(text_layer(cfg)).try_init().map_err(not_installed),
        LoggerFormat::Json => registry.with(json_layer(cfg)).try_init().map_err(not_installed),
        LoggerFormat::Journald => install_journald(registry),
    }
}

fn build_filter(cfg: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let env = cfg
        .env_override
        .then(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
        .flatten();
    filter_from(env.as_deref(), &cfg.level)
}

/// `env` wins when it holds a valid directive; a blank or broken one falls back to `level`.
fn filter_from(env: Option<&str>, level: &str) -> Result<EnvFilter, LoggerError> {
    if let Some(directives) = env.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(level).map_err(|source| LoggerError::InvalidFilter {
        directive: level.to_string(),
        source,
    })
}

fn text_layer<S>(cfg: &LoggerConfig) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_timer(local_rfc3339())
}

fn json_layer<S>(cfg: &LoggerConfig) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_timer(local_rfc3339())
}

/// RFC 3339 timestamps in the local offset, or UTC when it cannot be determined.
fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn not_installed(e: TryInitError) -> LoggerError {
    let msg = e.to_string();
    if msg.contains("already") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(msg)
    }
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn install_journald<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync + 'static,
{
    let journald =
        tracing_journald::layer().map_err(|e| LoggerError::JournaldUnavailable(e.to_string()))?;
    subscriber.with(journald).try_init().map_err(not_installed)
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn install_journald<S>(_subscriber: S) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
