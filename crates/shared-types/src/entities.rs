//! # Core Identifiers and Value Types
//!
//! ## Clusters
//!
//! - **Identity**: `ShipmentId`, `CheckpointId`, `ActorId`
//! - **Location**: `Coordinate`, `ResolutionMode`
//! - **Progress**: `CheckpointState`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::IdParseError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Unique identifier of a shipment, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(pub Uuid);

/// Globally unique identifier of a checkpoint.
///
/// Unique across all shipments, so a scanned code resolves to exactly one
/// shipment without carrying the shipment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointId(pub Uuid);

macro_rules! uuid_id {
    ($name:ident, $label:literal) => {
        impl $name {
            /// Generates a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| IdParseError {
                        kind: $label,
                        value: s.to_string(),
                    })
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(ShipmentId, "shipment");
uuid_id!(CheckpointId, "checkpoint");

/// Identifier of the field actor (mariner, driver) submitting a scan.
///
/// Issued by the external authentication layer; the engine treats it as an
/// opaque label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// =============================================================================
// CLUSTER B: LOCATION
// =============================================================================

/// A WGS-84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both components are finite and inside the WGS-84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// How the coordinate attached to a scan was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    /// Measured by the device's live positioning.
    Gps,
    /// Positioning is supported but acquisition failed or timed out.
    FallbackError,
    /// The device has no positioning capability.
    FallbackUnsupported,
}

impl ResolutionMode {
    /// Returns true for either fallback mode.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Gps)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gps => "gps",
            Self::FallbackError => "fallback-error",
            Self::FallbackUnsupported => "fallback-unsupported",
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER C: PROGRESS
// =============================================================================

/// Binary completion state of a checkpoint.
///
/// Transitions are monotonic: `Pending → Completed`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointState {
    #[default]
    Pending,
    Completed,
}

impl CheckpointState {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
