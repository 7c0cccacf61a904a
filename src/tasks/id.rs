use std::fmt;

/// Identity of a registered task.
///
/// The set is closed: every task the device runs has a variant here, and the
/// registry holds at most one runner per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    /// Looks after the cellular registration process.
    NetworkRegistration,
    /// Queries the available cells and publishes the results.
    CellScan,
    /// Message-bus (broker) connection, publishing and downlink handling.
    MessageBus,
    /// Measures signal quality and other network parameters.
    SignalQuality,
    /// Drives the status indicator from the application state.
    Indicator,
    /// Periodically fetches the device location.
    Location,
    /// Samples the on-board sensors.
    Sensor,
}

impl TaskId {
    /// Every task id in standard declaration order.
    pub const ALL: [TaskId; 7] = [
        TaskId::NetworkRegistration,
        TaskId::CellScan,
        TaskId::MessageBus,
        TaskId::SignalQuality,
        TaskId::Indicator,
        TaskId::Location,
        TaskId::Sensor,
    ];

    /// Display name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            TaskId::NetworkRegistration => "Registration",
            TaskId::CellScan => "CellScan",
            TaskId::MessageBus => "MessageBus",
            TaskId::SignalQuality => "SignalQuality",
            TaskId::Indicator => "Indicator",
            TaskId::Location => "Location",
            TaskId::Sensor => "Sensor",
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
