//! Position sources for devices whose fix is known up front.
//!
//! Transports that receive a fix (or an error) from the client use these to
//! present it to the resolver as a live source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Coordinate;
use crate::ports::outbound::{PositionError, PositionSource};

/// Always yields the same fix.
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    fix: Coordinate,
}

impl FixedPositionSource {
    pub fn new(fix: Coordinate) -> Self {
        Self { fix }
    }
}

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn acquire(&self) -> Result<Coordinate, PositionError> {
        Ok(self.fix)
    }
}

/// Always fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingPositionSource {
    error: PositionError,
}

impl FailingPositionSource {
    pub fn new(error: PositionError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl PositionSource for FailingPositionSource {
    async fn acquire(&self) -> Result<Coordinate, PositionError> {
        Err(self.error.clone())
    }
}

/// Wraps another source and delays it, for slow receivers.
#[derive(Clone)]
pub struct DelayedPositionSource {
    inner: Arc<dyn PositionSource>,
    delay: Duration,
}

impl DelayedPositionSource {
    pub fn new<P: PositionSource + 'static>(inner: P, delay: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            delay,
        }
    }
}

#[async_trait]
impl PositionSource for DelayedPositionSource {
    async fn acquire(&self) -> Result<Coordinate, PositionError> {
        tokio::time::sleep(self.delay).await;
        self.inner.acquire().await
    }
}
