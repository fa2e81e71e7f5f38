//! # Request Handler
//!
//! Parses a protocol line, calls the matching `ScanIngestionApi` operation
//! and renders the response line. Every line gets a response, including
//! lines that fail to parse.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use st_01_scan_ingestion::{InMemoryIngestionService, ScanIngestionApi, ScanRequest};

use crate::protocol::{Request, RequestEnvelope, RequestError, Response};

#[derive(Clone)]
pub struct RequestHandler {
    service: Arc<InMemoryIngestionService>,
}

impl RequestHandler {
    pub fn new(service: Arc<InMemoryIngestionService>) -> Self {
        Self { service }
    }

    /// Handle one raw input line.
    pub async fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<RequestEnvelope>(line) {
            Ok(envelope) => self.handle(envelope).await,
            Err(e) => {
                let id = recover_id(line);
                Response::failure(id, &RequestError::Malformed(e))
            }
        }
    }

    #[instrument(skip(self, envelope), fields(op = envelope.request.op()))]
    pub async fn handle(&self, envelope: RequestEnvelope) -> Response {
        let RequestEnvelope { id, request } = envelope;
        match self.dispatch(request).await {
            Ok(result) => Response::success(id, result),
            Err(e) => {
                debug!(code = e.code(), error = %e, "Request failed");
                Response::failure(id, &e)
            }
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Value, RequestError> {
        let service = &self.service;
        match request {
            Request::Create { spec } => to_value(service.create_shipment(spec).await?),
            Request::Scan {
                shipment_id,
                checkpoint_id,
                actor_id,
                device,
            } => {
                let request = ScanRequest::new(
                    shipment_id,
                    checkpoint_id,
                    actor_id,
                    device.into_capability(),
                );
                to_value(service.submit_scan(request).await?)
            }
            Request::View { shipment_id } => to_value(service.get_view(shipment_id).await?),
            Request::Shipment { shipment_id } => {
                to_value(service.get_shipment(shipment_id).await?)
            }
            Request::List => to_value(service.list_views().await),
            Request::Summary => to_value(service.fleet_summary().await),
            Request::Codes { shipment_id } => {
                to_value(service.checkpoint_codes(shipment_id).await?)
            }
            Request::Resolve { code } => to_value(service.resolve_scan_code(&code).await?),
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, RequestError> {
    Ok(serde_json::to_value(value)?)
}

/// Best-effort `id` extraction from a line that failed to parse as a request.
fn recover_id(line: &str) -> Option<Value> {
    serde_json::from_str::<Value>(line)
        .ok()
        .and_then(|v| v.get("id").cloned())
}
