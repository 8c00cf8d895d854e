//! Storage lifecycle events and the synchronous subscriber registry.
//!
//! Every pipeline carries one [`EventBus`]. Layers announce what they do
//! on it (a write was requested, a value reached the backend, a retry is
//! scheduled) and subscribers observe those announcements without being
//! wired into the chain itself.
//!
//! Dispatch is synchronous: callbacks run in registration order, on the
//! task that emits the event, before the emitting operation continues.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The event names a pipeline can announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A write was requested, before any coalescing or deferral.
    Write,
    /// A value was actually handed to the wrapped layer.
    Save,
    /// A value was fetched.
    Get,
    /// A value was removed.
    Remove,
    /// A pending write was forced out by an explicit flush.
    Flush,
    /// A failed write attempt is about to be retried.
    Retry,
    /// A write failed terminally.
    Error,
}

/// A lifecycle notification together with its payload.
#[derive(Debug, Clone, Serialize)]
pub enum StorageEvent {
    /// A write was requested on the pipeline. Fires even when the write
    /// is later coalesced away or dropped by the throttle floor.
    Write { key: String, value: String },
    /// A value was delivered to the wrapped layer.
    Save { key: String, value: String },
    /// A value was fetched; `value` carries the possibly-absent result.
    Get { key: String, value: Option<String> },
    /// A value was removed.
    Remove { key: String },
    /// A pending coalesced write was forced out.
    Flush,
    /// Write attempt `attempt` failed with `error`; the next attempt
    /// starts after `delay`.
    Retry {
        key: String,
        attempt: u32,
        error: String,
        delay: Duration,
    },
    /// A write failed after exhausting its attempt budget.
    Error { key: String, error: String },
}

impl StorageEvent {
    /// The registry name this event is dispatched under.
    pub fn kind(&self) -> EventKind {
        match self {
            StorageEvent::Write { .. } => EventKind::Write,
            StorageEvent::Save { .. } => EventKind::Save,
            StorageEvent::Get { .. } => EventKind::Get,
            StorageEvent::Remove { .. } => EventKind::Remove,
            StorageEvent::Flush => EventKind::Flush,
            StorageEvent::Retry { .. } => EventKind::Retry,
            StorageEvent::Error { .. } => EventKind::Error,
        }
    }
}

/// A subscriber callback. Must not block; it runs inline on the task
/// that emits the event.
pub type EventCallback = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

/// Publish/subscribe registry keyed by [`EventKind`].
///
/// Cloning the bus shares the registry, which is how every layer of one
/// pipeline announces to the same set of subscribers. Emitting an event
/// nobody listens to is a no-op.
///
/// # Example
///
/// ```
/// use debouncekv::events::{EventBus, EventKind, StorageEvent};
/// use std::sync::Arc;
///
/// let bus = EventBus::new();
/// bus.on(EventKind::Save, Arc::new(|event: &StorageEvent| {
///     println!("saved: {:?}", event);
/// }));
/// assert_eq!(bus.listener_count(EventKind::Save), 1);
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Mutex<HashMap<EventKind, Vec<EventCallback>>>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one event kind.
    ///
    /// Callbacks for the same kind run in the order they were registered.
    pub fn on(&self, kind: EventKind, callback: EventCallback) {
        self.listeners.lock().entry(kind).or_default().push(callback);
    }

    /// Invokes every callback registered for the event's kind, in
    /// registration order.
    ///
    /// The registry lock is released before callbacks run, so a callback
    /// may register further listeners or emit follow-up events.
    pub fn emit(&self, event: &StorageEvent) {
        let callbacks: Vec<EventCallback> = {
            let listeners = self.listeners.lock();
            match listeners.get(&event.kind()) {
                Some(callbacks) => callbacks.clone(),
                None => return,
            }
        };
        for callback in callbacks {
            (*callback)(event);
        }
    }

    /// Number of callbacks currently registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .get(&kind)
            .map(|callbacks| callbacks.len())
            .unwrap_or(0)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock();
        let total: usize = listeners.values().map(|callbacks| callbacks.len()).sum();
        f.debug_struct("EventBus")
            .field("kinds", &listeners.len())
            .field("listeners", &total)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as SyncMutex;

    #[test]
    fn test_emit_invokes_registered_callback() {
        let bus = EventBus::new();
        let seen = Arc::new(SyncMutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        bus.on(
            EventKind::Save,
            Arc::new(move |event: &StorageEvent| {
                if let StorageEvent::Save { key, value } = event {
                    sink.lock().push((key.clone(), value.clone()));
                }
            }),
        );

        bus.emit(&StorageEvent::Save {
            key: "k".to_string(),
            value: "v".to_string(),
        });

        assert_eq!(seen.lock().as_slice(), &[("k".to_string(), "v".to_string())]);
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(SyncMutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let sink = Arc::clone(&order);
            bus.on(
                EventKind::Flush,
                Arc::new(move |_: &StorageEvent| sink.lock().push(label)),
            );
        }

        bus.emit(&StorageEvent::Flush);
        assert_eq!(order.lock().as_slice(), &["first", "second", "third"]);
    }

    #[test]
    fn test_kinds_are_isolated() {
        let bus = EventBus::new();
        let count = Arc::new(SyncMutex::new(0usize));

        let sink = Arc::clone(&count);
        bus.on(
            EventKind::Remove,
            Arc::new(move |_: &StorageEvent| *sink.lock() += 1),
        );

        bus.emit(&StorageEvent::Flush);
        bus.emit(&StorageEvent::Write {
            key: "k".to_string(),
            value: "v".to_string(),
        });
        assert_eq!(*count.lock(), 0);

        bus.emit(&StorageEvent::Remove { key: "k".to_string() });
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&StorageEvent::Flush);
        assert_eq!(bus.listener_count(EventKind::Flush), 0);
    }

    #[test]
    fn test_clone_shares_registry() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let count = Arc::new(SyncMutex::new(0usize));

        let sink = Arc::clone(&count);
        clone.on(
            EventKind::Save,
            Arc::new(move |_: &StorageEvent| *sink.lock() += 1),
        );

        bus.emit(&StorageEvent::Save {
            key: "k".to_string(),
            value: "v".to_string(),
        });
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_callback_may_register_more_listeners() {
        let bus = EventBus::new();
        let inner_bus = bus.clone();

        bus.on(
            EventKind::Write,
            Arc::new(move |_: &StorageEvent| {
                inner_bus.on(EventKind::Save, Arc::new(|_: &StorageEvent| {}));
            }),
        );

        bus.emit(&StorageEvent::Write {
            key: "k".to_string(),
            value: "v".to_string(),
        });
        assert_eq!(bus.listener_count(EventKind::Save), 1);
    }

    #[test]
    fn test_event_kind_mapping() {
        let event = StorageEvent::Retry {
            key: "k".to_string(),
            attempt: 1,
            error: "boom".to_string(),
            delay: Duration::from_millis(100),
        };
        assert_eq!(event.kind(), EventKind::Retry);

        let event = StorageEvent::Get {
            key: "k".to_string(),
            value: None,
        };
        assert_eq!(event.kind(), EventKind::Get);
    }
}
