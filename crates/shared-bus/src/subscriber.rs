//! # Event Subscriber
//!
//! A `Subscription` is one observer's view of the bus: a broadcast receiver
//! plus the filter it applies. Observers that fall more than the channel
//! capacity behind lose the oldest events; the loss is counted, not fatal.

use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::warn;

use crate::events::{EventFilter, ShipmentEvent};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("Event bus closed")]
    Closed,
}

/// Inbound port for observers.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// Dropping the subscription unsubscribes it.
pub struct Subscription {
    receiver: broadcast::Receiver<ShipmentEvent>,
    filter: EventFilter,
    missed: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<ShipmentEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            missed: 0,
        }
    }

    /// Wait for the next matching event. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<ShipmentEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => self.note_missed(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next buffered matching event, without waiting.
    pub fn try_recv(&mut self) -> Result<Option<ShipmentEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => self.note_missed(skipped),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    /// Events lost to lag since subscribing, matching or not.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.missed
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    fn note_missed(&mut self, skipped: u64) {
        self.missed += skipped;
        warn!(skipped, total = self.missed, "Observer fell behind, events lost");
    }
}
