//! Location resolution with graceful degradation.
//!
//! | Device | Outcome | Mode |
//! |--------|---------|------|
//! | live, fix within timeout | measured coordinate | `gps` |
//! | live, error / timeout / out-of-range fix | fallback | `fallback-error` |
//! | no positioning | fallback, no wait | `fallback-unsupported` |
//!
//! One acquisition attempt per scan. Never an error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LocationConfig;
use crate::domain::{Coordinate, ResolutionMode};
use crate::ports::outbound::{PositionError, PositionSource};

/// What the submitting device can do.
#[derive(Clone)]
pub enum DeviceCapability {
    Unsupported,
    Live(Arc<dyn PositionSource>),
}

impl DeviceCapability {
    pub fn live<P: PositionSource + 'static>(source: P) -> Self {
        Self::Live(Arc::new(source))
    }
}

impl fmt::Debug for DeviceCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => f.write_str("Unsupported"),
            Self::Live(_) => f.write_str("Live(..)"),
        }
    }
}

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Option<Coordinate>,
    pub mode: ResolutionMode,
    /// Set when a live acquisition failed.
    pub failure: Option<PositionError>,
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    fallback: Option<Coordinate>,
    timeout: Duration,
}

impl LocationResolver {
    pub fn new(fallback: Option<Coordinate>, timeout: Duration) -> Self {
        Self { fallback, timeout }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        Self::new(config.fallback_coordinate(), config.acquisition_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn resolve(&self, device: &DeviceCapability) -> ResolvedLocation {
        let source = match device {
            DeviceCapability::Unsupported => {
                return self.degraded(ResolutionMode::FallbackUnsupported, None);
            }
            DeviceCapability::Live(source) => source,
        };

        let attempt = tokio::time::timeout(self.timeout, source.acquire()).await;
        let failure = match attempt {
            Ok(Ok(coordinate)) if coordinate.is_valid() => {
                return ResolvedLocation {
                    coordinate: Some(coordinate),
                    mode: ResolutionMode::Gps,
                    failure: None,
                };
            }
            Ok(Ok(coordinate)) => PositionError::InvalidFix(coordinate),
            Ok(Err(e)) => e,
            Err(_) => PositionError::Timeout {
                after_ms: self.timeout.as_millis() as u64,
            },
        };

        self.degraded(ResolutionMode::FallbackError, Some(failure))
    }

    fn degraded(&self, mode: ResolutionMode, failure: Option<PositionError>) -> ResolvedLocation {
        ResolvedLocation {
            coordinate: self.fallback,
            mode,
            failure,
        }
    }
}
