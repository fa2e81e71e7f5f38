//! # Event Publisher
//!
//! The ingestion engine publishes through `EventPublisher`; the in-memory bus
//! fans each event out to every live subscription over a tokio broadcast
//! channel.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::events::{EventFilter, ShipmentEvent};
use crate::subscriber::{EventSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Outbound port for shipment notifications.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand an event to every current subscriber.
    ///
    /// Never fails. Returns how many subscriptions the event reached; zero
    /// means nobody was watching and the event is gone.
    async fn publish(&self, event: ShipmentEvent) -> usize;
}

/// Counters for the bus as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Events handed to `publish`.
    pub published: u64,
    /// Events published while nobody was subscribed.
    pub unobserved: u64,
    /// Live subscriptions.
    pub subscribers: usize,
}

/// Broadcast-backed bus shared by the engine and every observer.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<ShipmentEvent>,
    capacity: usize,
    published: AtomicU64,
    unobserved: AtomicU64,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// `capacity` is how far a subscriber may fall behind before it starts
    /// missing events. Zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            capacity,
            published: AtomicU64::new(0),
            unobserved: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn stats(&self) -> BusStats {
        BusStats {
            published: self.published.load(Ordering::Relaxed),
            unobserved: self.unobserved.load(Ordering::Relaxed),
            subscribers: self.sender.receiver_count(),
        }
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(
            topics = ?filter.topics,
            shipments = filter.shipments.len(),
            "Observer subscribed"
        );
        Subscription::new(self.sender.subscribe(), filter)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: ShipmentEvent) -> usize {
        let topic = event.topic();
        let shipment_id = event.shipment_id();
        self.published.fetch_add(1, Ordering::Relaxed);

        // `send` only errors when there are no receivers.
        let reached = self.sender.send(event).unwrap_or_else(|_| {
            self.unobserved.fetch_add(1, Ordering::Relaxed);
            0
        });
        trace!(?topic, %shipment_id, reached, "Event published");
        reached
    }
}
