//! Status → channel pattern table.

use crate::app_state::AppStatus;

use super::channel::{BLUE, CHANNEL_COUNT, GREEN, IndicatorChannel, RED};

/// Patterns for every channel, indexed by channel.
pub type ChannelSet = [IndicatorChannel; CHANNEL_COUNT];

/// Ordered lookup table from [`AppStatus`] to channel patterns.
///
/// Each entry owns its own timers, so a pattern resumes where it left off when
/// its status comes back.
#[derive(Debug, Clone, Default)]
pub struct StatusToIndicatorMapping {
    entries: Vec<(AppStatus, ChannelSet)>,
}

impl StatusToIndicatorMapping {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. The first entry for a status wins on lookup.
    pub fn with(mut self, status: AppStatus, channels: ChannelSet) -> Self {
        self.entries.push((status, channels));
        self
    }

    /// The device's standard table; every status is mapped.
    pub fn standard() -> Self {
        use IndicatorChannel as C;

        Self::new()
            .with(AppStatus::Manual, [C::off(RED), C::off(GREEN), C::off(BLUE)])
            .with(AppStatus::InitDevice, [C::fast_pulse(RED), C::off(GREEN), C::off(BLUE)])
            .with(AppStatus::Registering, [C::off(RED), C::off(GREEN), C::blink(BLUE)])
            .with(AppStatus::BrokerConnecting, [C::off(RED), C::pulse(GREEN), C::off(BLUE)])
            .with(AppStatus::CellScan, [C::off(RED), C::pulse(GREEN), C::on(BLUE)])
            .with(AppStatus::SendSignalQuality, [C::flash(RED), C::flash(GREEN), C::off(BLUE)])
            .with(AppStatus::RegistrationUnknown, [C::off(RED), C::off(GREEN), C::flash(BLUE)])
            .with(AppStatus::Registered, [C::off(RED), C::off(GREEN), C::on(BLUE)])
            .with(AppStatus::Error, [C::on(RED).with_priority(), C::off(GREEN), C::off(BLUE)])
            .with(AppStatus::Shutdown, [C::on(RED), C::on(GREEN), C::on(BLUE)])
            .with(AppStatus::BrokerConnected, [C::off(RED), C::on(GREEN), C::off(BLUE)])
            .with(AppStatus::BrokerDisconnected, [C::off(RED), C::flash(GREEN), C::off(BLUE)])
            .with(AppStatus::StartSignalQuality, [C::on(RED), C::on(GREEN), C::off(BLUE)])
    }

    pub fn lookup(&self, status: AppStatus) -> Option<&ChannelSet> {
        self.entries
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, set)| set)
    }

    pub(crate) fn lookup_mut(&mut self, status: AppStatus) -> Option<&mut ChannelSet> {
        self.entries
            .iter_mut()
            .find(|(s, _)| *s == status)
            .map(|(_, set)| set)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_every_status() {
        let table = StatusToIndicatorMapping::standard();
        assert_eq!(table.len(), AppStatus::ALL.len());
        for status in AppStatus::ALL {
            let set = table.lookup(status).expect("status mapped");
            for (i, ch) in set.iter().enumerate() {
                assert_eq!(ch.index(), i, "{status} channel order");
            }
        }
    }

    #[test]
    fn only_error_red_has_priority() {
        let table = StatusToIndicatorMapping::standard();
        let mut flagged = Vec::new();
        for status in AppStatus::ALL {
            for ch in table.lookup(status).unwrap() {
                if ch.is_priority() {
                    flagged.push((status, ch.index()));
                }
            }
        }
        assert_eq!(flagged, vec![(AppStatus::Error, RED)]);
    }

    #[test]
    fn first_entry_wins() {
        use IndicatorChannel as C;

        let table = StatusToIndicatorMapping::new()
            .with(AppStatus::Registered, [C::on(RED), C::off(GREEN), C::off(BLUE)])
            .with(AppStatus::Registered, [C::off(RED), C::off(GREEN), C::off(BLUE)]);
        let set = table.lookup(AppStatus::Registered).unwrap();
        assert_eq!(set[RED].duty_ms(), set[RED].period_ms());
        assert!(table.lookup(AppStatus::Error).is_none());
    }
}
