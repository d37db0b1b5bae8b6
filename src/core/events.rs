//! Lifecycle notifications emitted by the queue.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Named lifecycle events a queue can notify listeners about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueEvent {
    /// `start()` was called.
    Start,
    /// `pause()` was called.
    Pause,
    /// A worker pulled the last pending entry.
    Empty,
    /// The last active worker exited while the queue was running.
    Done,
}

impl QueueEvent {
    /// Every event, in declaration order.
    pub const ALL: [Self; 4] = [Self::Start, Self::Pause, Self::Empty, Self::Done];

    /// Lowercase event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Empty => "empty",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for QueueEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token returned by listener registration, used to detach the listener.
pub type ListenerId = u64;

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Listener registry keyed by event.
#[derive(Default)]
pub(crate) struct EventBus {
    listeners: RwLock<HashMap<QueueEvent, Vec<(ListenerId, Listener)>>>,
    next_listener_id: AtomicU64,
}

impl EventBus {
    pub(crate) fn subscribe(&self, event: QueueEvent, listener: Listener) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .entry(event)
            .or_default()
            .push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&self, event: QueueEvent, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let Some(registered) = listeners.get_mut(&event) else {
            return false;
        };
        let before = registered.len();
        registered.retain(|(listener_id, _)| *listener_id != id);
        registered.len() != before
    }

    pub(crate) fn listener_count(&self, event: QueueEvent) -> usize {
        self.listeners.read().get(&event).map_or(0, Vec::len)
    }

    /// Fire every listener for `event` in registration order.
    ///
    /// Must be called without holding the queue's state lock: listeners are
    /// allowed to call back into the queue.
    pub(crate) fn emit(&self, event: QueueEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .read()
            .get(&event)
            .map(|registered| registered.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        tracing::trace!(event = %event, listeners = snapshot.len(), "emitting queue event");

        for listener in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                tracing::warn!(event = %event, "queue event listener panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn counter(bus: &EventBus, event: QueueEvent) -> (Arc<AtomicUsize>, ListenerId) {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        let id = bus.subscribe(
            event,
            Arc::new(move || {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (hits, id)
    }

    #[test]
    fn test_emit_reaches_only_matching_listeners() {
        let bus = EventBus::default();
        let (starts, _) = counter(&bus, QueueEvent::Start);
        let (pauses, _) = counter(&bus, QueueEvent::Pause);

        bus.emit(QueueEvent::Start);
        bus.emit(QueueEvent::Start);

        assert_eq!(starts.load(Ordering::SeqCst), 2);
        assert_eq!(pauses.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_same_event_multiple_listeners_in_order() {
        let bus = EventBus::default();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            bus.subscribe(QueueEvent::Empty, Arc::new(move || order.lock().push(tag)));
        }
        bus.emit(QueueEvent::Empty);
        assert_eq!(*order.lock(), vec!["first", "second"]);
        assert_eq!(bus.listener_count(QueueEvent::Empty), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::default();
        let (hits, id) = counter(&bus, QueueEvent::Done);

        assert!(bus.unsubscribe(QueueEvent::Done, id));
        assert!(!bus.unsubscribe(QueueEvent::Done, id));
        assert!(!bus.unsubscribe(QueueEvent::Start, id));

        bus.emit(QueueEvent::Done);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_others() {
        let bus = EventBus::default();
        bus.subscribe(QueueEvent::Pause, Arc::new(|| panic!("listener bug")));
        let (hits, _) = counter(&bus, QueueEvent::Pause);

        bus.emit(QueueEvent::Pause);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_names() {
        let names: Vec<String> = QueueEvent::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["start", "pause", "empty", "done"]);
        assert_eq!(
            serde_json::to_string(&QueueEvent::Done).unwrap(),
            "\"done\""
        );
    }
}
