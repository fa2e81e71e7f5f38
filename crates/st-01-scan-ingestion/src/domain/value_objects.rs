//! Values returned by the ingestion API.

use serde::{Deserialize, Serialize};

use super::entities::ScanRecord;
use shared_types::{CheckpointId, ShipmentId, ShipmentStatus, ShipmentView};

/// Result of an accepted scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReceipt {
    /// View recomputed inside the same locked section that applied the scan.
    pub view: ShipmentView,
    /// The event as recorded, with its disposition.
    pub record: ScanRecord,
}

impl ScanReceipt {
    /// Whether this scan moved a checkpoint to completed.
    #[must_use]
    pub fn advanced(&self) -> bool {
        self.record.disposition.advances()
    }
}

/// A checkpoint located by its scan code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTarget {
    pub shipment_id: ShipmentId,
    pub checkpoint_id: CheckpointId,
}

/// Printable code for one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointCode {
    pub checkpoint_id: CheckpointId,
    pub position: usize,
    pub name: String,
    pub code: String,
}

/// Shipment counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total: usize,
    pub pending: usize,
    pub in_transit: usize,
    pub delivered: usize,
    pub delayed: usize,
}

impl FleetSummary {
    pub fn add(&mut self, status: ShipmentStatus) {
        self.total += 1;
        match status {
            ShipmentStatus::Pending => self.pending += 1,
            ShipmentStatus::InTransit => self.in_transit += 1,
            ShipmentStatus::Delivered => self.delivered += 1,
            ShipmentStatus::Delayed => self.delayed += 1,
        }
    }

    #[must_use]
    pub fn count(&self, status: ShipmentStatus) -> usize {
        match status {
            ShipmentStatus::Pending => self.pending,
            ShipmentStatus::InTransit => self.in_transit,
            ShipmentStatus::Delivered => self.delivered,
            ShipmentStatus::Delayed => self.delayed,
        }
    }
}

impl FromIterator<ShipmentStatus> for FleetSummary {
    fn from_iter<I: IntoIterator<Item = ShipmentStatus>>(iter: I) -> Self {
        let mut summary = Self::default();
        for status in iter {
            summary.add(status);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_summary_counts() {
        let summary: FleetSummary = [
            ShipmentStatus::Pending,
            ShipmentStatus::Delayed,
            ShipmentStatus::Delayed,
            ShipmentStatus::Delivered,
        ]
        .into_iter()
        .collect();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(ShipmentStatus::Delayed), 2);
        assert_eq!(summary.count(ShipmentStatus::InTransit), 0);
        let sum: usize = ShipmentStatus::ALL.iter().map(|s| summary.count(*s)).sum();
        assert_eq!(sum, summary.total);
    }
}
