//! # Indicator channels.
//!
//! An [`IndicatorChannel`] is one physical on/off output driven by a
//! duty-cycle timer:
//!
//! ```text
//! timer:  0 ──────── duty ─────────────── period → wraps to 0
//! on:     ██████████ ░░░░░░░░░░░░░░░░░░░░           (inverted: swapped)
//! ```
//!
//! The physical side is a [`ChannelDriver`], shared behind a mutex so that one
//! tick's writes are applied as a unit.

use std::sync::{Arc, Mutex};

/// Index of the red channel.
pub const RED: usize = 0;
/// Index of the green channel.
pub const GREEN: usize = 1;
/// Index of the blue channel.
pub const BLUE: usize = 2;
/// Number of channels on the device.
pub const CHANNEL_COUNT: usize = 3;

/// Low-level output driver. Writes are assumed to always succeed.
pub trait ChannelDriver: Send {
    fn set_channel(&mut self, index: usize, on: bool);
}

/// Driver shared between the indicator loop and `on_enter` callbacks.
pub type SharedDriver = Arc<Mutex<dyn ChannelDriver>>;

/// Duty-cycle state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorChannel {
    index: usize,
    period_ms: u32,
    duty_ms: u32,
    invert: bool,
    priority: bool,
    timer_ms: u32,
    on: bool,
}

impl IndicatorChannel {
    const STEADY_PERIOD_MS: u32 = 1000;

    /// Channel lit for `duty_ms` of every `period_ms`.
    pub fn new(index: usize, period_ms: u32, duty_ms: u32) -> Self {
        Self {
            index,
            period_ms,
            duty_ms,
            invert: false,
            priority: false,
            timer_ms: 0,
            on: false,
        }
    }

    pub fn off(index: usize) -> Self {
        Self::new(index, Self::STEADY_PERIOD_MS, 0)
    }

    pub fn on(index: usize) -> Self {
        Self::new(index, Self::STEADY_PERIOD_MS, Self::STEADY_PERIOD_MS)
    }

    /// Even on/off, once a second.
    pub fn blink(index: usize) -> Self {
        Self::new(index, 1000, 500)
    }

    /// Short pulse every two seconds.
    pub fn pulse(index: usize) -> Self {
        Self::new(index, 2000, 250)
    }

    pub fn fast_pulse(index: usize) -> Self {
        Self::new(index, 500, 100)
    }

    /// Brief flash every three seconds.
    pub fn flash(index: usize) -> Self {
        Self::new(index, 3000, 100)
    }

    /// Swaps the lit and dark phases.
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// While lit, this channel overrides every other channel.
    pub fn with_priority(mut self) -> Self {
        self.priority = true;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn duty_ms(&self) -> u32 {
        self.duty_ms
    }

    pub fn is_priority(&self) -> bool {
        self.priority
    }

    pub fn timer_ms(&self) -> u32 {
        self.timer_ms
    }

    /// State computed by the last [`advance`](Self::advance).
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Advances the timer by one tick, wraps it at the period and recomputes `on`.
    pub fn advance(&mut self, tick_ms: u32) -> bool {
        self.timer_ms = self.timer_ms.saturating_add(tick_ms);
        if self.timer_ms >= self.period_ms {
            self.timer_ms = 0;
        }
        self.on = (self.timer_ms < self.duty_ms) != self.invert;
        self.on
    }
}
