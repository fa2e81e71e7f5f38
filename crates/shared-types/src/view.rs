//! # Shipment Read Model
//!
//! `ShipmentView` is what dashboards, tracking displays and scanning clients
//! see. It is always derived from checkpoint state and never stored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::{Coordinate, ShipmentId};
use crate::Timestamp;

/// Public shipment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Pending,
    #[serde(rename = "In Transit")]
    InTransit,
    Delivered,
    Delayed,
}

impl ShipmentStatus {
    /// All statuses in display order.
    pub const ALL: [ShipmentStatus; 4] = [
        ShipmentStatus::Pending,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Delayed,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
            Self::Delayed => "Delayed",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived view of one shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentView {
    pub shipment_id: ShipmentId,
    pub title: String,
    /// Completion percentage, 0..=100.
    pub progress: u8,
    pub completed_checkpoints: usize,
    pub total_checkpoints: usize,
    pub status: ShipmentStatus,
    /// Location of the most recently scanned checkpoint. A scan without a
    /// coordinate keeps the location already recorded for its checkpoint.
    pub current_location: Option<Coordinate>,
    /// Most recent scan across all checkpoints; `None` if never scanned.
    pub last_update: Option<Timestamp>,
    pub estimated_delivery: Timestamp,
}

impl ShipmentView {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.status == ShipmentStatus::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names_match_display() {
        for status in ShipmentStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let view = ShipmentView {
            shipment_id: ShipmentId::new(),
            title: "Electronics to Mumbai".into(),
            progress: 25,
            completed_checkpoints: 1,
            total_checkpoints: 4,
            status: ShipmentStatus::InTransit,
            current_location: Some(Coordinate::new(28.6139, 77.2090)),
            last_update: None,
            estimated_delivery: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["completedCheckpoints"], 1);
        assert_eq!(json["status"], "In Transit");
        assert!(json["lastUpdate"].is_null());
        assert!(!view.is_delivered());
    }
}
