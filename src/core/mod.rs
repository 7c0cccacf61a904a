//! Runtime core: registry, orchestration and shutdown.
//!
//! The public entry point is [`Orchestrator`], which drives the ordered
//! lifecycle of the tasks held in a [`TaskRegistry`].
//!
//! Internal modules:
//! - [`registry`]: fixed, ordered table of task runners;
//! - [`orchestrator`]: init/run/stop/wait/finalize and message delivery;
//! - [`dwell`]: cooperative sleep used by task loops;
//! - [`shutdown`]: one-way shutdown flag and OS signal handling.

pub(crate) mod dwell;
mod orchestrator;
mod registry;
mod shutdown;

pub use orchestrator::{Delivery, Orchestrator, WaitFor};
pub use registry::{RegistryBuilder, TaskRegistry, TaskRunner};
pub use shutdown::{ShutdownFlag, wait_for_shutdown_signal};
