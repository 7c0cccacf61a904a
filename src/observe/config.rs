use std::io::IsTerminal;

use super::format::LoggerFormat;

/// Logger settings.
///
/// The filter comes from `RUST_LOG` when it is set to a valid directive and
/// `env_override` is on; otherwise from `level`.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `cellvisor=debug,warn`.
    pub level: String,
    /// Let `RUST_LOG` take precedence over `level`.
    pub env_override: bool,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    pub const DEFAULT_LEVEL: &'static str = "info";

    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Ignores `RUST_LOG`; only `level` applies.
    pub fn without_env_override(mut self) -> Self {
        self.env_override = false;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: Self::DEFAULT_LEVEL.to_string(),
            env_override: true,
            with_targets: true,
            use_color: std::io::stdout().is_terminal(),
        }
    }
}
