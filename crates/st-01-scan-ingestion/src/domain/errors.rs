//! Ingestion error types.
//!
//! Every variant is a caller mistake or a stale reference. None is retried by
//! the engine and none leaves partial state behind.

use shared_types::{CheckpointId, ShipmentId};
use thiserror::Error;

/// Scan ingestion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    /// No shipment with this identifier exists
    #[error("Shipment not found: {0}")]
    ShipmentNotFound(ShipmentId),

    /// The checkpoint is not part of the given shipment's sequence
    #[error("Checkpoint {checkpoint_id} not found in shipment {shipment_id}")]
    CheckpointNotFound {
        shipment_id: ShipmentId,
        checkpoint_id: CheckpointId,
    },

    /// The creation request is incomplete
    #[error("Invalid shipment spec: {reason}")]
    InvalidSpec { reason: String },

    /// A scanned code could not be mapped to a checkpoint
    #[error("Invalid scan code {code:?}: {reason}")]
    InvalidScanCode { code: String, reason: String },

    /// A shipment with this identifier is already stored
    #[error("Shipment already exists: {0}")]
    DuplicateShipment(ShipmentId),
}

impl IngestionError {
    pub(crate) fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_code(code: &str, reason: impl Into<String>) -> Self {
        Self::InvalidScanCode {
            code: code.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for transports and client messaging.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ShipmentNotFound(_) => "SHIPMENT_NOT_FOUND",
            Self::CheckpointNotFound { .. } => "CHECKPOINT_NOT_FOUND",
            Self::InvalidSpec { .. } => "INVALID_SPEC",
            Self::InvalidScanCode { .. } => "INVALID_SCAN_CODE",
            Self::DuplicateShipment(_) => "DUPLICATE_SHIPMENT",
        }
    }
}

/// Result type for ingestion operations
pub type IngestionResult<T> = Result<T, IngestionError>;
