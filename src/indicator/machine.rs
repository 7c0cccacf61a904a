//! # Indicator state machine.
//!
//! One [`step`](IndicatorStateMachine::step) per tick:
//!
//! ```text
//! status ──► lookup ──► none? warn, skip (outputs keep prior state)
//!              │
//!              ▼
//!        advance every channel (timer += tick, wrap, recompute on)
//!              │
//!              ▼
//!        lowest-index priority channel on? ──► it alone on, others off
//!              │ no
//!              ▼
//!        every channel to its own state
//! ```
//!
//! All writes of one tick happen while the driver lock is held, so a reader of
//! the physical outputs never observes a half-applied tick.

use std::sync::PoisonError;

use tracing::{trace, warn};

use crate::app_state::AppStatus;

use super::{
    channel::{CHANNEL_COUNT, SharedDriver},
    mapping::{ChannelSet, StatusToIndicatorMapping},
};

/// Physical outputs applied by one tick, indexed by [`IndicatorChannel::index`](super::IndicatorChannel::index).
pub type Outputs = [bool; CHANNEL_COUNT];

/// Drives the indicator channels from the current [`AppStatus`].
pub struct IndicatorStateMachine {
    mapping: StatusToIndicatorMapping,
    driver: SharedDriver,
    tick_ms: u32,
}

impl IndicatorStateMachine {
    pub fn new(mapping: StatusToIndicatorMapping, driver: SharedDriver, tick_ms: u32) -> Self {
        Self {
            mapping,
            driver,
            tick_ms,
        }
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    pub fn mapping(&self) -> &StatusToIndicatorMapping {
        &self.mapping
    }

    /// Runs one tick for `status`.
    ///
    /// Returns the outputs written, or `None` if `status` has no mapping.
    pub fn step(&mut self, status: AppStatus) -> Option<Outputs> {
        let Some(channels) = self.mapping.lookup_mut(status) else {
            warn!(status = %status, "no indicator setting for application status");
            return None;
        };

        for ch in channels.iter_mut() {
            ch.advance(self.tick_ms);
        }
        let outputs = arbitrate(channels);

        let mut driver = self.driver.lock().unwrap_or_else(PoisonError::into_inner);
        for index in channels.iter().map(|ch| ch.index()).filter(|i| *i < CHANNEL_COUNT) {
            driver.set_channel(index, outputs[index]);
        }
        drop(driver);

        trace!(status = %status, ?outputs, "indicator tick");
        Some(outputs)
    }

    /// Switches every channel off.
    pub fn all_off(&self) {
        let mut driver = self.driver.lock().unwrap_or_else(PoisonError::into_inner);
        for index in 0..CHANNEL_COUNT {
            driver.set_channel(index, false);
        }
    }
}

/// Picks the outputs for one tick: the lowest-index lit priority channel
/// overrides all others. Channels outside `0..CHANNEL_COUNT` are ignored.
fn arbitrate(channels: &ChannelSet) -> Outputs {
    let wired = || channels.iter().filter(|ch| ch.index() < CHANNEL_COUNT);
    let winner = wired()
        .filter(|ch| ch.is_priority() && ch.is_on())
        .map(|ch| ch.index())
        .min();

    let mut outputs = [false; CHANNEL_COUNT];
    for ch in wired() {
        outputs[ch.index()] = match winner {
            Some(w) => ch.index() == w,
            None => ch.is_on(),
        };
    }
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::channel::{BLUE, ChannelDriver, GREEN, IndicatorChannel, RED};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        state: Outputs,
        writes: usize,
    }

    impl ChannelDriver for Recorder {
        fn set_channel(&mut self, index: usize, on: bool) {
            self.state[index] = on;
            self.writes += 1;
        }
    }

    fn machine(mapping: StatusToIndicatorMapping) -> (IndicatorStateMachine, Arc<Mutex<Recorder>>) {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let driver: SharedDriver = recorder.clone();
        (IndicatorStateMachine::new(mapping, driver, 50), recorder)
    }

    #[test]
    fn priority_channel_overrides_others_in_any_position() {
        use IndicatorChannel as C;

        let first = StatusToIndicatorMapping::new().with(
            AppStatus::Error,
            [C::on(RED).with_priority(), C::on(GREEN), C::off(BLUE)],
        );
        let (mut m, rec) = machine(first);
        assert_eq!(m.step(AppStatus::Error), Some([true, false, false]));
        assert_eq!(rec.lock().unwrap().state, [true, false, false]);

        let last = StatusToIndicatorMapping::new().with(
            AppStatus::Error,
            [C::on(RED), C::off(GREEN), C::on(BLUE).with_priority()],
        );
        let (mut m, rec) = machine(last);
        assert_eq!(m.step(AppStatus::Error), Some([false, false, true]));
        assert_eq!(rec.lock().unwrap().state, [false, false, true]);
    }

    #[test]
    fn outputs_follow_channel_index_not_position() {
        use IndicatorChannel as C;

        let shuffled = StatusToIndicatorMapping::new().with(
            AppStatus::Error,
            [C::on(BLUE), C::off(RED), C::on(GREEN)],
        );
        let (mut m, rec) = machine(shuffled);
        assert_eq!(m.step(AppStatus::Error), Some([false, true, true]));
        assert_eq!(rec.lock().unwrap().state, [false, true, true]);

        let both = StatusToIndicatorMapping::new().with(
            AppStatus::Error,
            [C::on(BLUE).with_priority(), C::off(RED), C::on(GREEN).with_priority()],
        );
        let (mut m, rec) = machine(both);
        assert_eq!(m.step(AppStatus::Error), Some([false, true, false]));
        assert_eq!(rec.lock().unwrap().state, [false, true, false]);
    }

    #[test]
    fn dark_priority_channel_does_not_override() {
        use IndicatorChannel as C;

        let table = StatusToIndicatorMapping::new().with(
            AppStatus::Shutdown,
            [C::off(RED).with_priority(), C::on(GREEN), C::on(BLUE)],
        );
        let (mut m, _) = machine(table);
        assert_eq!(m.step(AppStatus::Shutdown), Some([false, true, true]));
    }

    #[test]
    fn missing_mapping_skips_tick() {
        let (mut m, rec) = machine(StatusToIndicatorMapping::standard());
        m.step(AppStatus::Registered);
        let before = rec.lock().unwrap().writes;

        let (mut empty, rec_empty) = machine(StatusToIndicatorMapping::new());
        assert_eq!(empty.step(AppStatus::Registered), None);
        assert_eq!(rec_empty.lock().unwrap().writes, 0);

        assert_eq!(before, CHANNEL_COUNT);
        assert_eq!(rec.lock().unwrap().state, [false, false, true]);
    }

    #[test]
    fn timers_persist_per_status() {
        let (mut m, _) = machine(StatusToIndicatorMapping::standard());
        for _ in 0..4 {
            m.step(AppStatus::Registering);
        }
        m.step(AppStatus::Registered);

        let blue = m.mapping().lookup(AppStatus::Registering).unwrap()[BLUE];
        assert_eq!(blue.timer_ms(), 200);
    }

    #[test]
    fn blink_follows_duty_cycle() {
        let (mut m, _) = machine(StatusToIndicatorMapping::standard());
        let blue: Vec<bool> = (0..20)
            .map(|_| m.step(AppStatus::Registering).unwrap()[BLUE])
            .collect();
        let lit = blue.iter().filter(|on| **on).count();
        assert_eq!(lit, 10);
        assert!(!blue[9] && blue[19]);
    }

    #[test]
    fn all_off_clears_outputs() {
        let (mut m, rec) = machine(StatusToIndicatorMapping::standard());
        m.step(AppStatus::Shutdown);
        assert_eq!(rec.lock().unwrap().state, [true, true, true]);
        m.all_off();
        assert_eq!(rec.lock().unwrap().state, [false, false, false]);
    }
}
