//! Client device descriptions.
//!
//! A scanning client reports what its device could do at scan time. The
//! runtime turns that report into a `DeviceCapability` the engine resolves
//! exactly as it would a real positioning API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::Coordinate;
use st_01_scan_ingestion::{
    DelayedPositionSource, DeviceCapability, FailingPositionSource, FixedPositionSource,
    PositionError,
};

/// Device report carried by a scan request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeviceSpec {
    /// No positioning API.
    #[default]
    Unsupported,
    /// Positioning API present. Either a fix or an error is reported.
    #[serde(rename_all = "camelCase")]
    Live {
        #[serde(default)]
        fix: Option<Coordinate>,
        /// `denied`, `timeout` or a free-text failure.
        #[serde(default)]
        error: Option<String>,
        /// Simulated acquisition latency.
        #[serde(default)]
        delay_ms: Option<u64>,
    },
}

impl DeviceSpec {
    pub fn into_capability(self) -> DeviceCapability {
        let (fix, error, delay_ms) = match self {
            Self::Unsupported => return DeviceCapability::Unsupported,
            Self::Live {
                fix,
                error,
                delay_ms,
            } => (fix, error, delay_ms),
        };

        match (fix, error, delay_ms) {
            (Some(fix), None, None) => DeviceCapability::live(FixedPositionSource::new(fix)),
            (Some(fix), None, Some(ms)) => DeviceCapability::live(DelayedPositionSource::new(
                FixedPositionSource::new(fix),
                Duration::from_millis(ms),
            )),
            (_, error, delay_ms) => {
                let failing = FailingPositionSource::new(position_error(error.as_deref()));
                match delay_ms {
                    Some(ms) => DeviceCapability::live(DelayedPositionSource::new(
                        failing,
                        Duration::from_millis(ms),
                    )),
                    None => DeviceCapability::live(failing),
                }
            }
        }
    }
}

fn position_error(reported: Option<&str>) -> PositionError {
    match reported.map(str::trim) {
        Some("denied") => PositionError::PermissionDenied,
        Some("timeout") => PositionError::Timeout { after_ms: 0 },
        Some(other) if !other.is_empty() => PositionError::Unavailable(other.to_string()),
        _ => PositionError::Unavailable("no fix reported".to_string()),
    }
}
