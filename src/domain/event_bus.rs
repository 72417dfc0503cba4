//! Broadcast channel for tracker events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Trackers publish
//! a [`TrackerEvent`] for every applied change and WebSocket connections
//! subscribe to receive filtered events.
//!
//! Volume is dominated by [`TrackerEvent::ClockTicked`]: every mounted
//! tracker publishes one per clock tick, session and temperature events only
//! once per poll. The capacity (`EVENT_BUS_CAPACITY`) must cover
//! `trackers x ticks` between two reads of the slowest subscriber; a reader
//! that falls further behind gets `RecvError::Lagged` and resumes at the
//! oldest retained event.

use tokio::sync::broadcast;

use super::TrackerEvent;

/// Broadcast bus for [`TrackerEvent`]s.
///
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TrackerEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    ///
    /// A zero capacity (e.g. a misconfigured `EVENT_BUS_CAPACITY=0`) is
    /// raised to 1 instead of panicking inside tokio.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: TrackerEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BrewId;
    use chrono::Utc;

    fn make_event(brew_id: &str) -> TrackerEvent {
        TrackerEvent::TrackerMounted {
            brew_id: BrewId::new(brew_id),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(make_event("1")), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_same_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.publish(make_event("7")), 2);

        let Ok(e1) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(e2) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(e1.brew_id().as_str(), "7");
        assert_eq!(e1.brew_id(), e2.brew_id());
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(16);
        let rx = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);
        drop(rx);
        assert_eq!(bus.receiver_count(), 0);
    }

    #[tokio::test]
    async fn clock_tick_burst_lags_slow_reader() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        let start = Utc::now();
        for secs in 0..10 {
            let _ = bus.publish(TrackerEvent::ClockTicked {
                brew_id: BrewId::new("1"),
                now: start + chrono::TimeDelta::seconds(secs),
            });
        }

        let Err(broadcast::error::RecvError::Lagged(missed)) = rx.recv().await else {
            panic!("reader should lag");
        };
        assert_eq!(missed, 6);
        let Ok(TrackerEvent::ClockTicked { now, .. }) = rx.recv().await else {
            panic!("oldest retained tick expected");
        };
        assert_eq!(now, start + chrono::TimeDelta::seconds(6));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.publish(make_event("1")), 1);
    }
}
