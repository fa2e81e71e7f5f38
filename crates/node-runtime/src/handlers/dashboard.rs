//! # Dashboard Feed
//!
//! Subscribes to every shipment event and writes a structured log line per
//! event, standing in for the admin dashboard's live view.

use shared_bus::{EventFilter, EventSubscriber, ShipmentEvent, Subscription};
use shiptrack_telemetry::log_event;
use tracing::instrument;

pub struct DashboardFeed {
    subscription: Subscription,
    seen: u64,
}

impl DashboardFeed {
    pub fn new<B: EventSubscriber>(bus: &B) -> Self {
        Self {
            subscription: bus.subscribe(EventFilter::all()),
            seen: 0,
        }
    }

    /// Follow the bus until it closes. Returns the number of events seen.
    #[instrument(skip(self), name = "dashboard_feed")]
    pub async fn run(mut self) -> u64 {
        log_event!(info, "dashboard", "Dashboard feed started");

        while let Some(event) = self.subscription.recv().await {
            self.seen += 1;
            Self::render(&event);
        }

        log_event!(
            info,
            "dashboard",
            "Dashboard feed stopped",
            events = self.seen,
            missed = self.subscription.missed()
        );
        self.seen
    }

    fn render(event: &ShipmentEvent) {
        match event {
            ShipmentEvent::ShipmentCreated {
                shipment_id,
                title,
                total_checkpoints,
                ..
            } => {
                log_event!(
                    info,
                    "dashboard",
                    "Shipment created",
                    shipment_id = %shipment_id,
                    title = %title,
                    checkpoints = *total_checkpoints
                );
            }
            ShipmentEvent::CheckpointScanned {
                shipment_id,
                checkpoint_id,
                resolution_mode,
                advanced,
                view,
                ..
            } => {
                log_event!(
                    info,
                    "dashboard",
                    "Checkpoint scanned",
                    shipment_id = %shipment_id,
                    checkpoint_id = %checkpoint_id,
                    mode = %resolution_mode,
                    advanced = *advanced,
                    progress = view.progress,
                    status = %view.status
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_bus::{EventPublisher, InMemoryEventBus};
    use shared_types::ShipmentId;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_feed_counts_until_bus_closes() {
        let bus = Arc::new(InMemoryEventBus::new());
        let feed = DashboardFeed::new(bus.as_ref());
        let task = tokio::spawn(feed.run());

        for _ in 0..3 {
            bus.publish(ShipmentEvent::ShipmentCreated {
                shipment_id: ShipmentId::new(),
                title: "Rice to Dubai".into(),
                total_checkpoints: 2,
                created_at: Utc::now(),
            })
            .await;
        }
        drop(bus);

        assert_eq!(task.await.unwrap(), 3);
    }
}
