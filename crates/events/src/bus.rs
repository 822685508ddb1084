//! In-process topic-keyed event bus.
//!
//! [`EventBus`] is the central publish/subscribe hub. It is designed to
//! be shared via `Arc<EventBus>` across the application.
//!
//! Dispatch is deliberately synchronous and unbuffered: `publish`
//! invokes every handler registered for the topic, in registration
//! order, on the caller's thread. A handler that needs to perform I/O
//! must hand off internally (see the API crate's broadcast bridge) so it
//! cannot stall publishers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use liftguard_core::types::Timestamp;
use serde::Serialize;

use crate::topic::Topic;

/// Error type handlers may return; failures are logged and isolated.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Handler signature: borrow the event, report success or failure.
type Handler = dyn Fn(&BusEvent) -> Result<(), HandlerError> + Send + Sync;

// ---------------------------------------------------------------------------
// BusEvent
// ---------------------------------------------------------------------------

/// The envelope handed to every subscriber of a topic.
#[derive(Debug, Clone, Serialize)]
pub struct BusEvent {
    pub topic: Topic,
    /// Free-form JSON payload; by convention the serialized domain
    /// record named by the topic.
    pub payload: serde_json::Value,
    /// When the event was published (UTC).
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Token identifying one subscription, returned by
/// [`EventBus::subscribe`] and consumed by [`EventBus::unsubscribe`].
///
/// Closures are not comparable, so subscriptions are addressed by token
/// rather than by handler identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: u64,
    handler: Arc<Handler>,
}

/// In-process topic-keyed publish/subscribe hub.
///
/// # Usage
///
/// ```rust
/// use liftguard_events::{EventBus, Topic};
///
/// let bus = EventBus::new();
/// let id = bus.subscribe(Topic::AlertCreated, |event| {
///     println!("alert: {}", event.payload);
///     Ok(())
/// });
/// bus.publish(Topic::AlertCreated, serde_json::json!({"id": 1}));
/// bus.unsubscribe(Topic::AlertCreated, id);
/// ```
pub struct EventBus {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<Topic, Vec<Subscription>>>,
}

impl EventBus {
    /// Create a new bus with no subscriptions.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handler for a topic.
    ///
    /// Handlers for the same topic run in registration order on every
    /// publish.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&BusEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let subscription = Subscription {
            id,
            handler: Arc::new(handler),
        };
        self.subscribers
            .write()
            .expect("event bus lock poisoned")
            .entry(topic)
            .or_default()
            .push(subscription);
        tracing::debug!(topic = %topic, id, "Subscribed to event topic");
        SubscriptionId(id)
    }

    /// Remove a subscription. Returns `false` if it was not registered
    /// for that topic (already removed, or never existed).
    pub fn unsubscribe(&self, topic: Topic, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().expect("event bus lock poisoned");
        let Some(entries) = subscribers.get_mut(&topic) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|s| s.id != id.0);
        let removed = entries.len() < before;
        if removed {
            tracing::debug!(topic = %topic, id = id.0, "Unsubscribed from event topic");
        }
        removed
    }

    /// Publish a payload to all handlers currently registered for the
    /// topic.
    ///
    /// Handlers run synchronously, in registration order. A failing
    /// handler is logged and skipped; the remaining handlers for this
    /// publish still run. Publishing to a topic with no subscribers is a
    /// no-op.
    pub fn publish(&self, topic: Topic, payload: serde_json::Value) {
        // Snapshot the handler list so dispatch happens without holding
        // the lock; subscriptions added mid-publish see the next event.
        let handlers: Vec<Arc<Handler>> = {
            let subscribers = self.subscribers.read().expect("event bus lock poisoned");
            match subscribers.get(&topic) {
                Some(entries) => entries.iter().map(|s| Arc::clone(&s.handler)).collect(),
                None => return,
            }
        };

        let event = BusEvent {
            topic,
            payload,
            timestamp: Utc::now(),
        };

        for handler in handlers {
            if let Err(e) = handler(&event) {
                tracing::error!(topic = %topic, error = %e, "Event handler failed");
            }
        }
    }

    /// Number of handlers currently registered for a topic.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers
            .read()
            .expect("event bus lock poisoned")
            .get(&topic)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    #[test]
    fn handler_receives_published_payload() {
        let bus = EventBus::new();
        let received: Arc<Mutex<Vec<serde_json::Value>>> = Arc::default();

        let sink = Arc::clone(&received);
        bus.subscribe(Topic::AlertCreated, move |event| {
            sink.lock().unwrap().push(event.payload.clone());
            Ok(())
        });

        bus.publish(Topic::AlertCreated, json!({"id": 7}));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["id"], 7);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::default();

        for name in ["first", "second", "third"] {
            let sink = Arc::clone(&order);
            bus.subscribe(Topic::TelemetryReceived, move |_| {
                sink.lock().unwrap().push(name);
                Ok(())
            });
        }

        bus.publish(Topic::TelemetryReceived, json!({}));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn failing_handler_does_not_stop_the_rest() {
        let bus = EventBus::new();
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::default();

        let sink = Arc::clone(&order);
        bus.subscribe(Topic::AlertCreated, move |_| {
            sink.lock().unwrap().push("failing");
            Err("deliberate failure".into())
        });
        let sink = Arc::clone(&order);
        bus.subscribe(Topic::AlertCreated, move |_| {
            sink.lock().unwrap().push("surviving");
            Ok(())
        });

        bus.publish(Topic::AlertCreated, json!({}));
        assert_eq!(*order.lock().unwrap(), vec!["failing", "surviving"]);
    }

    #[test]
    fn publish_with_no_subscribers_is_a_noop() {
        let bus = EventBus::new();
        // Must not panic or block.
        bus.publish(Topic::AlertResolved, json!({"id": 1}));
    }

    #[test]
    fn topics_are_isolated() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0usize));

        let sink = Arc::clone(&count);
        bus.subscribe(Topic::AlertCreated, move |_| {
            *sink.lock().unwrap() += 1;
            Ok(())
        });

        bus.publish(Topic::TelemetryReceived, json!({}));
        assert_eq!(*count.lock().unwrap(), 0);

        bus.publish(Topic::AlertCreated, json!({}));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn unsubscribed_handler_no_longer_runs() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0usize));

        let sink = Arc::clone(&count);
        let id = bus.subscribe(Topic::AlertCreated, move |_| {
            *sink.lock().unwrap() += 1;
            Ok(())
        });

        bus.publish(Topic::AlertCreated, json!({}));
        assert!(bus.unsubscribe(Topic::AlertCreated, id));
        bus.publish(Topic::AlertCreated, json!({}));

        assert_eq!(*count.lock().unwrap(), 1);
        // Second removal reports nothing left to remove.
        assert!(!bus.unsubscribe(Topic::AlertCreated, id));
    }

    #[test]
    fn unsubscribe_on_wrong_topic_is_a_noop() {
        let bus = EventBus::new();
        let id = bus.subscribe(Topic::AlertCreated, |_| Ok(()));

        assert!(!bus.unsubscribe(Topic::TelemetryReceived, id));
        assert_eq!(bus.subscriber_count(Topic::AlertCreated), 1);
    }
}
