//! # Dashboard Feed
//!
//! A dashboard subscribed to one shipment sees that shipment's creation and
//! every scan, in commit order, and nothing about other shipments.

#[cfg(test)]
mod tests {
    use shared_bus::{EventFilter, EventSubscriber, ShipmentEvent};
    use st_01_scan_ingestion::{DeviceCapability, IngestionConfig, ScanIngestionApi, ScanRequest};

    use crate::integration::fixtures::{service, spec};

    #[tokio::test]
    async fn test_filtered_feed_tracks_one_shipment() {
        let (service, bus) = service(IngestionConfig::default());
        let watched = service.create_shipment(spec(2, 24)).await.unwrap();
        let other = service.create_shipment(spec(2, 24)).await.unwrap();
        let mut feed = bus.subscribe(EventFilter::shipment(watched.id));

        for shipment in [&other, &watched] {
            for checkpoint in shipment.checkpoints() {
                service
                    .submit_scan(ScanRequest::new(
                        shipment.id,
                        checkpoint.id,
                        "driver-3",
                        DeviceCapability::Unsupported,
                    ))
                    .await
                    .unwrap();
            }
        }

        let mut progress = Vec::new();
        while let Ok(Some(event)) = feed.try_recv() {
            assert_eq!(event.shipment_id(), watched.id);
            if let ShipmentEvent::CheckpointScanned { view, advanced, .. } = event {
                assert!(advanced);
                progress.push(view.progress);
            }
        }
        assert_eq!(progress, vec![50, 100]);
    }

    #[tokio::test]
    async fn test_rejected_scan_publishes_nothing() {
        let (service, bus) = service(IngestionConfig::default());
        let shipment = service.create_shipment(spec(1, 24)).await.unwrap();
        let mut feed = bus.subscribe(EventFilter::all());

        let other = service.create_shipment(spec(1, 24)).await.unwrap();
        let result = service
            .submit_scan(ScanRequest::new(
                shipment.id,
                other.checkpoints()[0].id,
                "driver-3",
                DeviceCapability::Unsupported,
            ))
            .await;
        assert!(result.is_err());

        match feed.try_recv() {
            Ok(Some(ShipmentEvent::ShipmentCreated { shipment_id, .. })) => {
                assert_eq!(shipment_id, other.id)
            }
            unexpected => panic!("unexpected {:?}", unexpected),
        }
        assert!(matches!(feed.try_recv(), Ok(None)));
    }
}
