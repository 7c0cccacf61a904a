//! Event → log line mapping.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::events::{Event, EventKind};

/// Human-readable message for an event kind.
#[inline]
pub fn message_for(kind: EventKind) -> &'static str {
    match kind {
        // lifecycle
        EventKind::TaskInitialized => "task initialized",
        EventKind::TaskStarting => "task is starting",
        EventKind::TaskStarted => "task loop started",
        EventKind::StopRequested => "stop requested",
        EventKind::TaskStopped => "task loop stopped",
        EventKind::TaskFinalized => "task finalized",
        EventKind::LifecycleFailed => "lifecycle call failed",

        // shutdown
        EventKind::ShutdownRequested => "shutdown requested",
        EventKind::AllStopped => "all bulk-stoppable tasks stopped",

        // delivery
        EventKind::MessageDropped => "message dropped",
    }
}

/// Writes one event to the log at a severity matching its kind.
pub fn log_event(e: &Event) {
    let msg = message_for(e.kind);
    let task = e.task.map(|t| t.name()).unwrap_or("unknown");
    let reason = e.error.as_deref().unwrap_or("unknown");

    match e.kind {
        EventKind::TaskInitialized | EventKind::TaskFinalized => debug!(task, seq = e.seq, "{msg}"),
        EventKind::TaskStarting | EventKind::TaskStarted => info!(task, seq = e.seq, "{msg}"),
        EventKind::StopRequested | EventKind::TaskStopped => debug!(task, seq = e.seq, "{msg}"),
        EventKind::LifecycleFailed => error!(
            task,
            reason,
            code = e.code.unwrap_or(0),
            seq = e.seq,
            "{msg}"
        ),
        EventKind::ShutdownRequested | EventKind::AllStopped => info!(seq = e.seq, "{msg}"),
        EventKind::MessageDropped => trace!(task, reason, seq = e.seq, "{msg}"),
    }
}

/// Spawns a listener that logs every event received on `rx` until the bus closes.
pub fn spawn_event_logger(mut rx: broadcast::Receiver<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => log_event(&ev),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event logger lagged behind the bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;
    use crate::tasks::TaskId;

    #[tokio::test]
    async fn logger_exits_when_bus_closes() {
        let bus = Bus::new(8);
        let handle = spawn_event_logger(bus.subscribe());

        bus.publish(Event::new(EventKind::TaskStarting).with_task(TaskId::Sensor));
        drop(bus);

        handle.await.unwrap();
    }

    #[test]
    fn every_kind_has_a_message() {
        for kind in [
            EventKind::TaskInitialized,
            EventKind::TaskStarting,
            EventKind::TaskStarted,
            EventKind::StopRequested,
            EventKind::TaskStopped,
            EventKind::TaskFinalized,
            EventKind::LifecycleFailed,
            EventKind::ShutdownRequested,
            EventKind::AllStopped,
            EventKind::MessageDropped,
        ] {
            assert!(!message_for(kind).is_empty());
        }
    }
}
