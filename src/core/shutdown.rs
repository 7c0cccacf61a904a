//! # Process-wide shutdown flag.
//!
//! [`ShutdownFlag`] is raised once by the application driver (or by an OS signal)
//! and read by the orchestrator before starting tasks.
//!
//! ## Rules
//! - Raising the flag does **not** stop running tasks; each must be stopped explicitly.
//! - The flag never resets.
//!
//! ## Signals
//! **Unix platforms:** `SIGINT`, `SIGTERM`, `SIGQUIT`.
//! **Other platforms:** `Ctrl-C` via [`tokio::signal::ctrl_c`].

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Shared, one-way shutdown flag.
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag {
    token: CancellationToken,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the flag is raised.
    pub async fn triggered(&self) {
        self.token.cancelled().await;
    }

    /// Spawns a listener that raises the flag on the first termination signal.
    pub fn trigger_on_signal(&self) -> tokio::task::JoinHandle<()> {
        let flag = self.clone();
        tokio::spawn(async move {
            match wait_for_shutdown_signal().await {
                Ok(()) => {
                    info!("termination signal received, shutting down");
                    flag.trigger();
                }
                Err(e) => warn!(error = %e, "failed to install signal handlers"),
            }
        })
    }
}

/// Waits for a termination signal.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_is_visible_to_clones() {
        let flag = ShutdownFlag::new();
        let reader = flag.clone();
        assert!(!reader.is_triggered());

        flag.trigger();
        assert!(reader.is_triggered());
        reader.triggered().await;
    }
}
