//! # Orchestrator configuration.
//!
//! Provides [`Config`], the timing knobs used by the orchestrator's polling
//! loops and by the dwell primitive handed to task bodies.
//!
//! ## Sentinel values
//! - any interval of `0s` is clamped to 1ms (a zero sleep would turn polling into busy-waiting)
//! - `bus_capacity = 0` → clamped to 1 by the bus

use std::time::Duration;

/// Global configuration for the orchestrator.
///
/// ## Field semantics
/// - `stop_poll_interval`: sleep between run-handle polls in `stop_and_wait`
/// - `all_stop_poll_interval`: sleep after each pass of `wait_for_all_to_stop`
/// - `dwell_step`: increment used by `dwell`; `dwell_seconds` is converted to a number of steps
/// - `wait_step` / `wait_timeout`: polling of the optional `run` wait predicate
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug)]
pub struct Config {
    /// Sleep between polls while waiting for one task to release its run handle.
    pub stop_poll_interval: Duration,

    /// Sleep after each pass over the registry in `wait_for_all_to_stop`.
    pub all_stop_poll_interval: Duration,

    /// Increment of the cooperative dwell sleep.
    pub dwell_step: Duration,

    /// Sleep between evaluations of a `run` wait predicate.
    pub wait_step: Duration,

    /// Maximum time a `run` wait predicate may take to become true.
    pub wait_timeout: Duration,

    /// Capacity of the lifecycle event bus.
    pub bus_capacity: usize,
}

impl Config {
    /// Number of dwell steps in one second (at least 1).
    #[inline]
    pub fn dwell_steps_per_second(&self) -> i64 {
        let step = self.dwell_step().as_millis().max(1);
        (1000 / step).max(1) as i64
    }

    /// Returns `dwell_step` clamped to a minimum of 1ms.
    #[inline]
    pub fn dwell_step(&self) -> Duration {
        clamp_interval(self.dwell_step)
    }

    /// Returns `stop_poll_interval` clamped to a minimum of 1ms.
    #[inline]
    pub fn stop_poll_interval(&self) -> Duration {
        clamp_interval(self.stop_poll_interval)
    }

    /// Returns `all_stop_poll_interval` clamped to a minimum of 1ms.
    #[inline]
    pub fn all_stop_poll_interval(&self) -> Duration {
        clamp_interval(self.all_stop_poll_interval)
    }

    /// Returns `wait_step` clamped to a minimum of 1ms.
    #[inline]
    pub fn wait_step(&self) -> Duration {
        clamp_interval(self.wait_step)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `stop_poll_interval = 2s`
    /// - `all_stop_poll_interval = 100ms`
    /// - `dwell_step = 100ms` (ten steps per dwell second)
    /// - `wait_step = 100ms`, `wait_timeout = 60s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            stop_poll_interval: Duration::from_secs(2),
            all_stop_poll_interval: Duration::from_millis(100),
            dwell_step: Duration::from_millis(100),
            wait_step: Duration::from_millis(100),
            wait_timeout: Duration::from_secs(60),
            bus_capacity: 1024,
        }
    }
}

fn clamp_interval(d: Duration) -> Duration {
    d.max(Duration::from_millis(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dwell_is_ten_steps_per_second() {
        assert_eq!(Config::default().dwell_steps_per_second(), 10);
    }

    #[test]
    fn zero_intervals_are_clamped() {
        let cfg = Config {
            dwell_step: Duration::ZERO,
            all_stop_poll_interval: Duration::ZERO,
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.dwell_step(), Duration::from_millis(1));
        assert_eq!(cfg.all_stop_poll_interval(), Duration::from_millis(1));
        assert_eq!(cfg.dwell_steps_per_second(), 1000);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
