//! Scan validation.
//!
//! The validator is side-effect free. It receives the shipment snapshot the
//! aggregate store holds under its lock and returns a disposition the store
//! then applies.

use serde::{Deserialize, Serialize};

use super::entities::Shipment;
use super::errors::{IngestionError, IngestionResult};
use shared_types::{ActorId, CheckpointId, ShipmentId};

/// Whether checkpoints must be completed in sequence order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// A checkpoint may only complete once every earlier one has.
    Sequential,
    /// Any checkpoint may complete at any time.
    #[default]
    Unordered,
}

impl std::str::FromStr for OrderingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "unordered" => Ok(Self::Unordered),
            other => Err(format!("unknown ordering policy: {:?}", other)),
        }
    }
}

/// How an accepted scan affects its checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScanDisposition {
    /// Pending checkpoint becomes completed.
    Advance,
    /// Checkpoint was already completed; history only.
    Repeat,
    /// Sequential policy blocked completion.
    Informational {
        /// Position of the first incomplete predecessor.
        #[serde(rename = "blockedBy")]
        blocked_by: usize,
    },
}

impl ScanDisposition {
    #[must_use]
    pub fn advances(&self) -> bool {
        matches!(self, Self::Advance)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Repeat => "repeat",
            Self::Informational { .. } => "informational",
        }
    }
}

/// Checks a scan request against a shipment snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanValidator {
    policy: OrderingPolicy,
}

impl ScanValidator {
    pub fn new(policy: OrderingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    /// Validate a scan, short-circuiting on the first failed check.
    ///
    /// `snapshot` is `None` when no shipment is stored under `shipment_id`.
    /// The actor is not checked; authorization happens outside the engine.
    pub fn validate(
        &self,
        snapshot: Option<&Shipment>,
        shipment_id: ShipmentId,
        checkpoint_id: CheckpointId,
        _actor_id: &ActorId,
    ) -> IngestionResult<ScanDisposition> {
        let shipment = match snapshot {
            Some(s) if s.id == shipment_id => s,
            _ => return Err(IngestionError::ShipmentNotFound(shipment_id)),
        };

        let checkpoint = shipment.checkpoint(&checkpoint_id).ok_or(
            IngestionError::CheckpointNotFound {
                shipment_id,
                checkpoint_id,
            },
        )?;

        if checkpoint.is_completed() {
            return Ok(ScanDisposition::Repeat);
        }

        if self.policy == OrderingPolicy::Sequential {
            let blocker = shipment.checkpoints()[..checkpoint.position]
                .iter()
                .find(|cp| !cp.is_completed());
            if let Some(blocker) = blocker {
                return Ok(ScanDisposition::Informational {
                    blocked_by: blocker.position,
                });
            }
        }

        Ok(ScanDisposition::Advance)
    }
}
