//! Shipment aggregate entities.
//!
//! A `Shipment` owns its `Checkpoint`s. The sequence is fixed when the
//! shipment is created; afterwards the only mutation is
//! `Checkpoint::record()`, reached through the aggregate store.

use serde::{Deserialize, Serialize};

use super::errors::{IngestionError, IngestionResult};
use super::validator::ScanDisposition;
use shared_types::{
    ActorId, CheckpointId, CheckpointState, Coordinate, ResolutionMode, ShipmentId, Timestamp,
};

// =============================================================================
// CREATION SPECS
// =============================================================================

/// One checkpoint in a creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CheckpointSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Shipment creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentSpec {
    pub title: String,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub description: Option<String>,
    pub estimated_delivery: Timestamp,
    pub checkpoints: Vec<CheckpointSpec>,
}

// =============================================================================
// SCAN EVENTS
// =============================================================================

/// One scan attempt as submitted by a field actor.
///
/// Built by the coordinator before the shipment lock is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub checkpoint_id: CheckpointId,
    pub actor_id: ActorId,
    /// Submission timestamp.
    pub scanned_at: Timestamp,
    /// `None` when location resolution failed and no fallback is configured.
    pub coordinate: Option<Coordinate>,
    pub resolution_mode: ResolutionMode,
}

/// A `ScanEvent` as stored in checkpoint history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    #[serde(flatten)]
    pub event: ScanEvent,
    /// What the validator decided when this scan was applied.
    pub disposition: ScanDisposition,
}

// =============================================================================
// CHECKPOINT
// =============================================================================

/// A named stop along a shipment's route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub name: String,
    pub description: String,
    /// 0-based position in the shipment sequence.
    pub position: usize,
    state: CheckpointState,
    last_scan_at: Option<Timestamp>,
    last_location: Option<Coordinate>,
    history: Vec<ScanRecord>,
}

impl Checkpoint {
    fn new(position: usize, spec: CheckpointSpec) -> Self {
        Self {
            id: CheckpointId::new(),
            name: spec.name.trim().to_string(),
            description: spec.description.trim().to_string(),
            position,
            state: CheckpointState::Pending,
            last_scan_at: None,
            last_location: None,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> CheckpointState {
        self.state
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    #[must_use]
    pub fn last_scan_at(&self) -> Option<Timestamp> {
        self.last_scan_at
    }

    #[must_use]
    pub fn last_location(&self) -> Option<Coordinate> {
        self.last_location
    }

    /// Every scan ever applied to this checkpoint, in apply order.
    #[must_use]
    pub fn history(&self) -> &[ScanRecord] {
        &self.history
    }

    /// Append a scan to history and update derived fields.
    ///
    /// Only `Advance` changes completion state. The last-scan fields move
    /// forward in time only: an event that arrives late (older timestamp than
    /// the latest one seen) is kept in history but does not rewind them. A
    /// scan without a coordinate keeps the last known location.
    pub(crate) fn record(&mut self, event: ScanEvent, disposition: ScanDisposition) -> ScanRecord {
        if disposition == ScanDisposition::Advance {
            self.state = CheckpointState::Completed;
        }

        let is_newest = self
            .last_scan_at
            .map_or(true, |latest| event.scanned_at >= latest);
        if is_newest {
            self.last_scan_at = Some(event.scanned_at);
            if let Some(coordinate) = event.coordinate {
                self.last_location = Some(coordinate);
            }
        }

        let record = ScanRecord { event, disposition };
        self.history.push(record.clone());
        record
    }
}

// =============================================================================
// SHIPMENT
// =============================================================================

/// A multi-leg cargo shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: ShipmentId,
    pub title: String,
    pub origin: String,
    pub destination: String,
    pub description: Option<String>,
    pub estimated_delivery: Timestamp,
    pub created_at: Timestamp,
    checkpoints: Vec<Checkpoint>,
}

impl Shipment {
    /// Validate a creation request and build the shipment.
    ///
    /// Checkpoint positions follow submission order. Fails with
    /// `InvalidSpec` if title, origin, destination or the checkpoint list is
    /// empty, or if any checkpoint name is empty (whitespace counts as empty).
    pub fn create(spec: ShipmentSpec, now: Timestamp) -> IngestionResult<Self> {
        let title = required(&spec.title, "title")?;
        let origin = required(&spec.origin, "origin")?;
        let destination = required(&spec.destination, "destination")?;

        if spec.checkpoints.is_empty() {
            return Err(IngestionError::invalid_spec(
                "at least one checkpoint is required",
            ));
        }
        if let Some(position) = spec
            .checkpoints
            .iter()
            .position(|cp| cp.name.trim().is_empty())
        {
            return Err(IngestionError::invalid_spec(format!(
                "checkpoint at position {} has an empty name",
                position
            )));
        }

        let description = spec
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let checkpoints = spec
            .checkpoints
            .into_iter()
            .enumerate()
            .map(|(position, cp)| Checkpoint::new(position, cp))
            .collect();

        Ok(Self {
            id: ShipmentId::new(),
            title,
            origin,
            destination,
            description,
            estimated_delivery: spec.estimated_delivery,
            created_at: now,
            checkpoints,
        })
    }

    /// The checkpoint sequence in position order.
    #[must_use]
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    #[must_use]
    pub fn checkpoint(&self, id: &CheckpointId) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|cp| &cp.id == id)
    }

    pub(crate) fn checkpoint_mut(&mut self, id: &CheckpointId) -> Option<&mut Checkpoint> {
        self.checkpoints.iter_mut().find(|cp| &cp.id == id)
    }

    #[must_use]
    pub fn total_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    #[must_use]
    pub fn completed_checkpoints(&self) -> usize {
        self.checkpoints.iter().filter(|cp| cp.is_completed()).count()
    }

    /// Total scans recorded across all checkpoints.
    #[must_use]
    pub fn scan_count(&self) -> usize {
        self.checkpoints.iter().map(|cp| cp.history.len()).sum()
    }
}

fn required(value: &str, field: &str) -> IngestionResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::invalid_spec(format!("{} is empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{Duration, Utc};

    pub fn spec_with(checkpoints: usize, eta_offset_hours: i64) -> ShipmentSpec {
        ShipmentSpec {
            title: "Electronics to Mumbai".into(),
            origin: "Delhi".into(),
            destination: "Mumbai".into(),
            description: None,
            estimated_delivery: Utc::now() + Duration::hours(eta_offset_hours),
            checkpoints: (0..checkpoints)
                .map(|i| CheckpointSpec::new(format!("Stop {}", i + 1), ""))
                .collect(),
        }
    }

    pub fn event_for(checkpoint: &Checkpoint, at: Timestamp) -> ScanEvent {
        ScanEvent {
            checkpoint_id: checkpoint.id,
            actor_id: ActorId::new("driver-7"),
            scanned_at: at,
            coordinate: Some(Coordinate::new(19.0760, 72.8777)),
            resolution_mode: ResolutionMode::Gps,
        }
    }
}
