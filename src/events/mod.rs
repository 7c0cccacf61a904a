//! Orchestrator events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: `Orchestrator` (lifecycle calls, bulk waits, message drops).
//! - **Consumers**: anything holding a receiver from [`Orchestrator::events`](crate::Orchestrator::events).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
