//! # Scan Flows
//!
//! A field actor's path through the public API: print codes, scan a code,
//! resolve it, submit the scan, read the view back.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use shared_types::{Coordinate, ResolutionMode, ShipmentStatus};
    use st_01_scan_ingestion::{
        DeviceCapability, FixedPositionSource, IngestionConfig, IngestionError, OrderingPolicy,
        PositionError, PositionSource, ScanDisposition, ScanIngestionApi, ScanRequest,
    };

    use crate::integration::fixtures::{service, spec};

    /// Counts acquisition attempts and always fails.
    #[derive(Default)]
    struct CountingSource {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl PositionSource for CountingSource {
        async fn acquire(&self) -> Result<Coordinate, PositionError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(PositionError::Unavailable("no satellites".into()))
        }
    }

    #[tokio::test]
    async fn test_scan_by_code_to_delivery() {
        let (service, _) = service(IngestionConfig::default());
        let shipment = service.create_shipment(spec(4, 24)).await.unwrap();
        let codes = service.checkpoint_codes(shipment.id).await.unwrap();

        let mut progress = Vec::new();
        for code in &codes {
            let target = service.resolve_scan_code(&code.code).await.unwrap();
            let receipt = service
                .submit_scan(ScanRequest::for_target(
                    target,
                    "driver-44",
                    DeviceCapability::live(FixedPositionSource::new(Coordinate::new(53.55, 9.99))),
                ))
                .await
                .unwrap();
            progress.push(receipt.view.progress);
        }

        assert_eq!(progress, vec![25, 50, 75, 100]);
        let view = service.get_view(shipment.id).await.unwrap();
        assert_eq!(view.status, ShipmentStatus::Delivered);
        assert_eq!(view.current_location, Some(Coordinate::new(53.55, 9.99)));
    }

    #[tokio::test]
    async fn test_idempotent_rescan() {
        let (service, _) = service(IngestionConfig::default());
        let shipment = service.create_shipment(spec(3, 24)).await.unwrap();
        let checkpoint_id = shipment.checkpoints()[1].id;

        let mut last = None;
        for _ in 0..5 {
            let receipt = service
                .submit_scan(ScanRequest::new(
                    shipment.id,
                    checkpoint_id,
                    "mariner-2",
                    DeviceCapability::Unsupported,
                ))
                .await
                .unwrap();
            last = Some(receipt);
        }

        let last = last.unwrap();
        assert_eq!(last.view.completed_checkpoints, 1);
        assert_eq!(last.view.progress, 33);
        assert_eq!(last.record.disposition, ScanDisposition::Repeat);

        let snapshot = service.get_shipment(shipment.id).await.unwrap();
        assert_eq!(snapshot.checkpoints()[1].history().len(), 5);
    }

    #[tokio::test]
    async fn test_single_acquisition_attempt_per_scan() {
        let (service, _) = service(IngestionConfig::default());
        let shipment = service.create_shipment(spec(2, 24)).await.unwrap();
        let source = Arc::new(CountingSource::default());

        let receipt = service
            .submit_scan(ScanRequest::new(
                shipment.id,
                shipment.checkpoints()[0].id,
                "driver-1",
                DeviceCapability::Live(source.clone()),
            ))
            .await
            .unwrap();

        assert_eq!(source.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(receipt.record.event.resolution_mode, ResolutionMode::FallbackError);
        assert!(receipt.advanced());
    }

    #[tokio::test]
    async fn test_disabled_fallback_still_completes() {
        let mut config = IngestionConfig::default();
        config.location.fallback_enabled = false;
        let (service, _) = service(config);
        let shipment = service.create_shipment(spec(1, 24)).await.unwrap();

        let receipt = service
            .submit_scan(ScanRequest::new(
                shipment.id,
                shipment.checkpoints()[0].id,
                "driver-1",
                DeviceCapability::Unsupported,
            ))
            .await
            .unwrap();

        assert_eq!(receipt.record.event.coordinate, None);
        assert_eq!(receipt.view.status, ShipmentStatus::Delivered);
        assert_eq!(receipt.view.current_location, None);
        assert!(receipt.view.last_update.is_some());
    }

    #[tokio::test]
    async fn test_sequential_policy_from_overrides() {
        let mut config = IngestionConfig::default();
        config
            .apply_overrides(|key| (key == "ST_ORDERING_POLICY").then(|| "sequential".to_string()))
            .unwrap();
        assert_eq!(config.ordering_policy, OrderingPolicy::Sequential);

        let (service, _) = service(config);
        let shipment = service.create_shipment(spec(3, 24)).await.unwrap();
        let receipt = service
            .submit_scan(ScanRequest::new(
                shipment.id,
                shipment.checkpoints()[1].id,
                "driver-1",
                DeviceCapability::Unsupported,
            ))
            .await
            .unwrap();

        assert_eq!(
            receipt.record.disposition,
            ScanDisposition::Informational { blocked_by: 0 }
        );
        assert_eq!(receipt.view.completed_checkpoints, 0);
    }

    #[tokio::test]
    async fn test_resolve_rejects_foreign_and_garbage_codes() {
        let (service, _) = service(IngestionConfig::default());
        service.create_shipment(spec(1, 24)).await.unwrap();

        for code in ["", "https://x/scan/123", "https://x/scan/7d4c3b6e-8a2f-4c1d-9e5b-0f6a7b8c9d0e"] {
            let err = service.resolve_scan_code(code).await.unwrap_err();
            assert!(
                matches!(err, IngestionError::InvalidScanCode { .. }),
                "code {:?} gave {:?}",
                code,
                err
            );
        }
    }
}
