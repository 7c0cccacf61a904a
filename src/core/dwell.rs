//! # Cooperative dwell.
//!
//! Task loops sleep between iterations through [`dwell`], which keeps them
//! responsive to their own stop condition without busy-waiting.
//!
//! ```text
//! yield_now()                         (always: give other tasks a turn)
//! count = dwell_seconds × steps_per_second
//! do {
//!     sleep(dwell_step)
//!     i += 1
//! } while can_continue() && i < count  (at least one step, even for dwell = -1)
//! ```
//!
//! The predicate is supplied by the task. The shutdown flag is not consulted.

use tokio::time;
use tracing::trace;

use crate::{config::Config, tasks::TaskRuntimeState};

/// Sleeps for the task's dwell time in `cfg.dwell_step` increments,
/// returning early the first time `can_continue` is false.
///
/// Returns the number of increments slept.
pub async fn dwell<P>(state: &TaskRuntimeState, cfg: &Config, can_continue: P) -> u64
where
    P: Fn() -> bool,
{
    tokio::task::yield_now().await;

    trace!(task = %state.name(), seconds = state.dwell_seconds(), "dwelling");

    let step = cfg.dwell_step();
    let count = i64::from(state.dwell_seconds()) * cfg.dwell_steps_per_second();
    let mut slept: i64 = 0;
    loop {
        time::sleep(step).await;
        slept += 1;
        if !can_continue() || slept >= count {
            break;
        }
    }
    slept as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{TaskId, TaskSpec};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn state(dwell: i32) -> TaskRuntimeState {
        TaskSpec::new(TaskId::Sensor).with_dwell(dwell).into_state()
    }

    #[tokio::test(start_paused = true)]
    async fn full_dwell_sleeps_ten_steps_per_second() {
        let cfg = Config::default();
        let started = Instant::now();
        let steps = dwell(&state(2), &cfg, || true).await;
        assert_eq!(steps, 20);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn returns_on_first_false_predicate() {
        let cfg = Config::default();
        let calls = AtomicU32::new(0);
        let steps = dwell(&state(30), &cfg, || calls.fetch_add(1, Ordering::SeqCst) < 2).await;
        assert_eq!(steps, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn self_timed_task_still_sleeps_one_step() {
        let cfg = Config::default();
        let started = Instant::now();
        assert_eq!(dwell(&state(-1), &cfg, || true).await, 1);
        assert!(started.elapsed() >= cfg.dwell_step);
    }
}
