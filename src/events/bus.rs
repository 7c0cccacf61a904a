//! # Lifecycle event bus.
//!
//! [`Bus`] fans orchestrator [`Event`]s out to any number of observers over
//! [`tokio::sync::broadcast`].
//!
//! Publishing never waits. Events published while nobody listens are gone;
//! an observer that falls behind the ring buffer receives `Lagged(n)` and
//! resumes at the oldest retained event.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast sender for orchestrator events. Clones share one channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Bus retaining up to `capacity` events (at least 1) for slow observers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `ev` to every current observer and returns how many there were.
    pub fn publish(&self, ev: Event) -> usize {
        self.tx.send(ev).unwrap_or(0)
    }

    /// Observer of events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn publish_without_observers_is_dropped() {
        let bus = Bus::new(0);
        assert_eq!(bus.observer_count(), 0);
        assert_eq!(bus.publish(Event::new(EventKind::AllStopped)), 0);
    }

    #[tokio::test]
    async fn every_observer_receives_the_event() {
        let bus = Bus::new(4);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(Event::new(EventKind::ShutdownRequested)), 2);
        assert_eq!(a.recv().await.unwrap().kind, EventKind::ShutdownRequested);
        assert_eq!(b.recv().await.unwrap().kind, EventKind::ShutdownRequested);
    }
}
