//! # Status indicator.
//!
//! Maps the global [`AppStatus`](crate::AppStatus) to blinking/pulsing patterns
//! on three channels (red, green, blue):
//! - [`IndicatorChannel`] - one duty-cycle timer
//! - [`StatusToIndicatorMapping`] - status → channel patterns
//! - [`IndicatorStateMachine`] - per-tick advance, priority arbitration and apply
//! - [`IndicatorTask`] - task body running the machine on a fixed tick

mod channel;
mod machine;
mod mapping;
mod task;

pub use channel::{
    BLUE, CHANNEL_COUNT, ChannelDriver, GREEN, IndicatorChannel, RED, SharedDriver,
};
pub use machine::{IndicatorStateMachine, Outputs};
pub use mapping::{ChannelSet, StatusToIndicatorMapping};
pub use task::{IndicatorTask, channel_on_enter, standard_spec};
