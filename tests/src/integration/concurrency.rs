//! # Concurrent Scans
//!
//! Many actors scanning the same shipment at once on a multi-threaded
//! runtime. No update may be lost and a checkpoint completes exactly once.
//! A slow location fix holds no lock, so it delays nobody else, and a scan
//! abandoned while acquiring leaves no record.

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use shared_types::{Coordinate, ShipmentStatus};
    use st_01_scan_ingestion::{
        DelayedPositionSource, DeviceCapability, FixedPositionSource, IngestionConfig,
        ScanIngestionApi, ScanRequest,
    };

    use crate::integration::fixtures::{service, spec};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_scans_on_distinct_checkpoints() {
        const N: usize = 24;
        let (service, _) = service(IngestionConfig::default());
        let shipment = service.create_shipment(spec(N, 48)).await.unwrap();

        let handles: Vec<_> = shipment
            .checkpoints()
            .iter()
            .enumerate()
            .map(|(i, checkpoint)| {
                let service = service.clone();
                let request = ScanRequest::new(
                    shipment.id,
                    checkpoint.id,
                    format!("actor-{}", i),
                    DeviceCapability::live(DelayedPositionSource::new(
                        FixedPositionSource::new(Coordinate::new(10.0 + i as f64 * 0.01, 20.0)),
                        Duration::from_millis((i % 5) as u64),
                    )),
                );
                tokio::spawn(async move { service.submit_scan(request).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().unwrap().advanced());
        }

        let view = service.get_view(shipment.id).await.unwrap();
        assert_eq!(view.completed_checkpoints, N);
        assert_eq!(view.progress, 100);
        assert_eq!(view.status, ShipmentStatus::Delivered);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_duplicate_scans_advance_once() {
        let (service, _) = service(IngestionConfig::default());
        let shipment = service.create_shipment(spec(2, 48)).await.unwrap();
        let checkpoint_id = shipment.checkpoints()[0].id;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                let request = ScanRequest::new(
                    shipment.id,
                    checkpoint_id,
                    format!("actor-{}", i),
                    DeviceCapability::Unsupported,
                );
                tokio::spawn(async move { service.submit_scan(request).await })
            })
            .collect();

        let mut advanced = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().advanced() {
                advanced += 1;
            }
        }
        assert_eq!(advanced, 1);

        let snapshot = service.get_shipment(shipment.id).await.unwrap();
        assert_eq!(snapshot.checkpoints()[0].history().len(), 16);
        assert_eq!(snapshot.completed_checkpoints(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shipments_do_not_block_each_other() {
        let (service, _) = service(IngestionConfig::default());
        let mut shipments = Vec::new();
        for _ in 0..6 {
            shipments.push(service.create_shipment(spec(3, 48)).await.unwrap());
        }

        let handles: Vec<_> = shipments
            .iter()
            .flat_map(|s| s.checkpoints().iter().map(move |c| (s.id, c.id)))
            .map(|(shipment_id, checkpoint_id)| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .submit_scan(ScanRequest::new(
                            shipment_id,
                            checkpoint_id,
                            "driver-9",
                            DeviceCapability::Unsupported,
                        ))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let summary = service.fleet_summary().await;
        assert_eq!(summary.total, 6);
        assert_eq!(summary.delivered, 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_slow_fix_neither_blocks_nor_leaves_trace_when_abandoned() {
        let (service, _) = service(IngestionConfig::default());
        let shipment = service.create_shipment(spec(2, 48)).await.unwrap();
        let slow_checkpoint = shipment.checkpoints()[0].id;

        let slow = {
            let service = service.clone();
            let request = ScanRequest::new(
                shipment.id,
                slow_checkpoint,
                "driver-slow",
                DeviceCapability::live(DelayedPositionSource::new(
                    FixedPositionSource::new(Coordinate::new(1.0, 2.0)),
                    Duration::from_secs(2),
                )),
            );
            tokio::spawn(async move { service.submit_scan(request).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let started = Instant::now();
        let receipt = tokio::time::timeout(
            Duration::from_millis(500),
            service.submit_scan(ScanRequest::new(
                shipment.id,
                shipment.checkpoints()[1].id,
                "driver-fast",
                DeviceCapability::Unsupported,
            )),
        )
        .await
        .expect("scan waited on a slow location fix")
        .unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(receipt.view.completed_checkpoints, 1);

        slow.abort();
        assert!(slow.await.unwrap_err().is_cancelled());

        let snapshot = service.get_shipment(shipment.id).await.unwrap();
        let checkpoint = snapshot.checkpoint(&slow_checkpoint).unwrap();
        assert!(checkpoint.history().is_empty());
        assert_eq!(snapshot.completed_checkpoints(), 1);
    }
}
