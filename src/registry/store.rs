//! Subscriber registry implementation
//!
//! The central set of connected observers and the fan-out path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, RwLock};

use crate::error::ConfigError;
use crate::frame::ServerMessage;
use crate::stats::{RegistryCounters, RegistryStats};

use super::entry::{Subscriber, SubscriberId};
use super::payload::Payload;

/// Default per-subscriber queue depth
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Set of connected subscribers
///
/// Thread-safe via `RwLock`. Fan-out takes the write lock so that evictions
/// happen in the same pass; it never awaits a subscriber while holding it.
pub struct SubscriberRegistry {
    /// Map of subscriber ID to its queue
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,

    next_id: AtomicU64,

    /// Depth of each subscriber's queue
    queue_capacity: usize,

    counters: RegistryCounters,
}

impl SubscriberRegistry {
    /// Create a registry with the default queue depth
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            counters: RegistryCounters::default(),
        }
    }

    /// Create a registry with a custom queue depth
    pub fn with_queue_capacity(queue_capacity: usize) -> Result<Self, ConfigError> {
        if queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity(queue_capacity));
        }

        Ok(Self {
            queue_capacity,
            ..Self::new()
        })
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Add a subscriber and queue `greeting` for it alone
    ///
    /// Returns the new ID and the receiving end of its queue.
    pub async fn join(&self, greeting: &ServerMessage) -> (SubscriberId, mpsc::Receiver<Payload>) {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let mut subscriber = Subscriber::new(tx);

        match Payload::encode(greeting) {
            Ok(payload) => {
                // A fresh queue always has room for one payload.
                let _ = subscriber.deliver(payload);
            }
            Err(e) => {
                tracing::warn!(subscriber = %id, error = %e, "Failed to encode greeting");
            }
        }

        let mut subscribers = self.subscribers.write().await;
        subscribers.insert(id, subscriber);
        self.counters.joined.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            subscriber = %id,
            subscribers = subscribers.len(),
            "Subscriber joined"
        );

        (id, rx)
    }

    /// Remove a subscriber
    ///
    /// Returns false if it was not registered (already left or evicted).
    pub async fn leave(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write().await;

        match subscribers.remove(&id) {
            Some(sub) => {
                self.counters.left.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    subscriber = %id,
                    delivered = sub.delivered,
                    connected_ms = sub.connected_for().as_millis() as u64,
                    subscribers = subscribers.len(),
                    "Subscriber left"
                );
                true
            }
            None => false,
        }
    }

    /// Deliver a message to every subscriber
    ///
    /// The message is serialized once. Subscribers whose queue is closed or
    /// full are evicted in the same pass. Returns the number of subscribers
    /// that accepted the payload.
    pub async fn broadcast(&self, message: &ServerMessage) -> usize {
        if self.subscribers.read().await.is_empty() {
            return 0;
        }

        let payload = match Payload::encode(message) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(kind = message.kind(), error = %e, "Failed to encode message");
                return 0;
            }
        };

        let mut subscribers = self.subscribers.write().await;
        let mut delivered = 0;

        subscribers.retain(|id, sub| match sub.deliver(payload.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(e) => {
                self.counters.evicted.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    subscriber = %id,
                    error = %e,
                    delivered = sub.delivered,
                    connected_ms = sub.connected_for().as_millis() as u64,
                    "Subscriber evicted"
                );
                false
            }
        });

        self.counters.broadcasts.fetch_add(1, Ordering::Relaxed);
        self.counters
            .deliveries
            .fetch_add(delivered as u64, Ordering::Relaxed);

        delivered
    }

    /// Number of current subscribers
    pub async fn len(&self) -> usize {
        self.subscribers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subscribers.read().await.is_empty()
    }

    pub async fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.read().await.contains_key(&id)
    }

    /// Snapshot of registry counters
    pub async fn stats(&self) -> RegistryStats {
        self.counters.snapshot(self.len().await)
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn greeting() -> ServerMessage {
        ServerMessage::greeting("synthetic", vec!["synthetic".into()])
    }

    async fn recv_json(rx: &mut mpsc::Receiver<Payload>) -> serde_json::Value {
        rx.recv().await.unwrap().to_json().unwrap()
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let registry = SubscriberRegistry::new();

        assert_eq!(registry.broadcast(&ServerMessage::switched("weather")).await, 0);

        let stats = registry.stats().await;
        assert_eq!(stats.broadcasts, 0);
        assert_eq!(stats.subscribers, 0);
    }

    #[tokio::test]
    async fn test_join_sends_greeting_to_joiner_only() {
        let registry = SubscriberRegistry::new();

        let (_a, mut rx_a) = registry.join(&greeting()).await;
        let (_b, mut rx_b) = registry.join(&greeting()).await;

        assert_eq!(recv_json(&mut rx_a).await["message"], "connected");
        assert_eq!(recv_json(&mut rx_b).await["message"], "connected");
        assert_err!(rx_a.try_recv());
        assert_err!(rx_b.try_recv());
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_everyone_in_order() {
        let registry = SubscriberRegistry::new();
        let (_a, mut rx_a) = registry.join(&greeting()).await;
        let (_b, mut rx_b) = registry.join(&greeting()).await;
        rx_a.recv().await;
        rx_b.recv().await;

        for name in ["weather", "stocks", "synthetic"] {
            assert_eq!(registry.broadcast(&ServerMessage::switched(name)).await, 2);
        }

        for rx in [&mut rx_a, &mut rx_b] {
            for name in ["weather", "stocks", "synthetic"] {
                assert_eq!(recv_json(rx).await["source"], name);
            }
        }
    }

    #[tokio::test]
    async fn test_failed_subscriber_is_evicted() {
        let registry = SubscriberRegistry::new();
        let (good, mut rx_good) = registry.join(&greeting()).await;
        let (bad, rx_bad) = registry.join(&greeting()).await;
        drop(rx_bad);

        assert_eq!(registry.broadcast(&ServerMessage::switched("weather")).await, 1);
        assert!(registry.contains(good).await);
        assert!(!registry.contains(bad).await);

        // Later broadcasts do not try the evicted subscriber again.
        assert_eq!(registry.broadcast(&ServerMessage::switched("stocks")).await, 1);
        let stats = registry.stats().await;
        assert_eq!(stats.evicted, 1);
        assert_eq!(stats.deliveries, 2);

        rx_good.recv().await;
        assert_eq!(recv_json(&mut rx_good).await["source"], "weather");
        assert_eq!(recv_json(&mut rx_good).await["source"], "stocks");
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_evicted() {
        let registry = assert_ok!(SubscriberRegistry::with_queue_capacity(2));
        let (id, mut rx) = registry.join(&greeting()).await;

        // Greeting + one broadcast fill the queue.
        assert_eq!(registry.broadcast(&ServerMessage::switched("weather")).await, 1);
        assert_eq!(registry.broadcast(&ServerMessage::switched("stocks")).await, 0);
        assert!(!registry.contains(id).await);

        // What was queued before eviction is still readable, then the queue ends.
        assert_eq!(recv_json(&mut rx).await["message"], "connected");
        assert_eq!(recv_json(&mut rx).await["source"], "weather");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_leave_is_idempotent() {
        let registry = SubscriberRegistry::new();
        let (id, _rx) = registry.join(&greeting()).await;

        assert!(registry.leave(id).await);
        assert!(!registry.leave(id).await);
        assert!(!registry.leave(SubscriberId(999)).await);
        assert!(registry.is_empty().await);

        let stats = registry.stats().await;
        assert_eq!(stats.joined, 1);
        assert_eq!(stats.left, 1);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let registry = SubscriberRegistry::new();
        let (a, _rx_a) = registry.join(&greeting()).await;
        let (b, _rx_b) = registry.join(&greeting()).await;
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "sub-1");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            SubscriberRegistry::with_queue_capacity(0),
            Err(ConfigError::InvalidQueueCapacity(0))
        ));
    }
}
