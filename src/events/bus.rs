//! # Run events on a broadcast channel.
//!
//! Every step of a run is published here: the coordinator reports channel
//! setup, launches and cleanup; the reaper reports each collected child; the
//! supervisor reports timeouts, control requests and completion; the
//! subscriber set reports its own overflows and panics.
//!
//! ```text
//!   Coordinator ──┐
//!   Reaper      ──┤
//!   Supervisor  ──┼──► Bus ──► coordinator listener ──► SubscriberSet ──► LogWriter
//!   SubscriberSet ┘
//! ```
//!
//! `publish` never waits, which is what lets the reaper publish from its
//! wakeup without stalling the next drain. A listener that falls behind loses
//! the oldest events.

use tokio::sync::broadcast;

use super::event::Event;

/// Sender side shared by every part of the run. Clones publish to the same listeners.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Bus holding up to `capacity` undelivered events, at least one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes `ev`; dropped when nobody is listening yet.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn publish_without_receivers_does_not_block() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::RunStarted));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::RunFinished));
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::RunFinished);
    }
}
