//! # Global application status.
//!
//! [`AppState`] holds the device's current [`AppStatus`]. State-owning logic
//! writes it; the indicator and any other interested task read it. Handles are
//! cheap to clone and are passed explicitly to whoever needs them.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Discrete status of the whole device, as shown on the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppStatus {
    /// Indicator is under manual control; all channels dark.
    #[default]
    Manual,
    InitDevice,
    Registering,
    BrokerConnecting,
    CellScan,
    SendSignalQuality,
    RegistrationUnknown,
    Registered,
    Error,
    Shutdown,
    BrokerConnected,
    BrokerDisconnected,
    StartSignalQuality,
}

impl AppStatus {
    /// Every status, in table order.
    pub const ALL: [AppStatus; 13] = [
        AppStatus::Manual,
        AppStatus::InitDevice,
        AppStatus::Registering,
        AppStatus::BrokerConnecting,
        AppStatus::CellScan,
        AppStatus::SendSignalQuality,
        AppStatus::RegistrationUnknown,
        AppStatus::Registered,
        AppStatus::Error,
        AppStatus::Shutdown,
        AppStatus::BrokerConnected,
        AppStatus::BrokerDisconnected,
        AppStatus::StartSignalQuality,
    ];

    /// Stable snake_case label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            AppStatus::Manual => "manual",
            AppStatus::InitDevice => "init_device",
            AppStatus::Registering => "registering",
            AppStatus::BrokerConnecting => "broker_connecting",
            AppStatus::CellScan => "cell_scan",
            AppStatus::SendSignalQuality => "send_signal_quality",
            AppStatus::RegistrationUnknown => "registration_unknown",
            AppStatus::Registered => "registered",
            AppStatus::Error => "error",
            AppStatus::Shutdown => "shutdown",
            AppStatus::BrokerConnected => "broker_connected",
            AppStatus::BrokerDisconnected => "broker_disconnected",
            AppStatus::StartSignalQuality => "start_signal_quality",
        }
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Shared handle to the current [`AppStatus`].
#[derive(Clone, Debug)]
pub struct AppState {
    tx: Arc<watch::Sender<AppStatus>>,
}

impl AppState {
    pub fn new(initial: AppStatus) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replaces the current status, returning the previous one.
    pub fn set(&self, status: AppStatus) -> AppStatus {
        self.tx.send_replace(status)
    }

    pub fn get(&self) -> AppStatus {
        *self.tx.borrow()
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<AppStatus> {
        self.tx.subscribe()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppStatus::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_visible_through_clones() {
        let state = AppState::new(AppStatus::InitDevice);
        let reader = state.clone();

        assert_eq!(state.set(AppStatus::Registered), AppStatus::InitDevice);
        assert_eq!(reader.get(), AppStatus::Registered);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let state = AppState::default();
        let mut rx = state.subscribe();

        state.set(AppStatus::Error);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AppStatus::Error);
    }
}
