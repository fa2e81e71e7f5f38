//! Progress and status derivation.
//!
//! Pure functions over a shipment snapshot. Nothing here is cached; every
//! read and every applied scan derives a fresh view.

use super::entities::{Checkpoint, Shipment};
use shared_types::{ShipmentStatus, ShipmentView, Timestamp};

/// Completion percentage, rounded half up. Returns 0 for an empty sequence.
#[must_use]
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    // round(100c/t) with halves up, in integers: floor((200c + t) / 2t)
    let percent = (200 * completed + total) / (2 * total);
    percent.min(100) as u8
}

/// Status precedence: Delivered, then Delayed, then Pending, then In Transit.
#[must_use]
pub fn derive_status(
    completed: usize,
    total: usize,
    estimated_delivery: Timestamp,
    now: Timestamp,
) -> ShipmentStatus {
    if completed == total {
        ShipmentStatus::Delivered
    } else if now > estimated_delivery {
        ShipmentStatus::Delayed
    } else if completed == 0 {
        ShipmentStatus::Pending
    } else {
        ShipmentStatus::InTransit
    }
}

/// Derive the public view of a shipment at `now`.
#[must_use]
pub fn derive(shipment: &Shipment, now: Timestamp) -> ShipmentView {
    let total = shipment.total_checkpoints();
    let completed = shipment.completed_checkpoints();
    let latest = latest_scanned(shipment.checkpoints());

    ShipmentView {
        shipment_id: shipment.id,
        title: shipment.title.clone(),
        progress: progress_percent(completed, total),
        completed_checkpoints: completed,
        total_checkpoints: total,
        status: derive_status(completed, total, shipment.estimated_delivery, now),
        current_location: latest.and_then(Checkpoint::last_location),
        last_update: latest.and_then(Checkpoint::last_scan_at),
        estimated_delivery: shipment.estimated_delivery,
    }
}

/// Checkpoint with the most recent scan; ties go to the later position.
fn latest_scanned(checkpoints: &[Checkpoint]) -> Option<&Checkpoint> {
    checkpoints
        .iter()
        .filter_map(|cp| cp.last_scan_at().map(|at| (at, cp.position, cp)))
        .max_by_key(|(at, position, _)| (*at, *position))
        .map(|(_, _, cp)| cp)
}
