//! # JSON-lines Protocol
//!
//! One request per input line, one response per output line. Responses may
//! come back out of order; clients correlate them with `id`.
//!
//! ```text
//! → {"id":1,"op":"create","spec":{"title":"..","origin":"..","destination":"..",
//!                                 "estimatedDelivery":"2025-06-02T09:00:00Z",
//!                                 "checkpoints":[{"name":"Port of Kochi"}]}}
//! ← {"id":1,"ok":true,"result":{...shipment...}}
//!
//! → {"id":2,"op":"scan","shipmentId":"..","checkpointId":"..","actorId":"mariner-1",
//!    "device":{"kind":"live","fix":{"lat":9.96,"lng":76.24}}}
//! ← {"id":2,"ok":true,"result":{"view":{...},"record":{...}}}
//!
//! ← {"id":3,"ok":false,"error":{"code":"CHECKPOINT_NOT_FOUND","message":".."}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_types::{CheckpointId, ShipmentId};
use st_01_scan_ingestion::{IngestionError, ShipmentSpec};

use crate::adapters::DeviceSpec;

/// A request line.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    /// Echoed back on the response.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub request: Request,
}

/// Operations understood by the runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    Create {
        spec: ShipmentSpec,
    },
    #[serde(rename_all = "camelCase")]
    Scan {
        shipment_id: ShipmentId,
        checkpoint_id: CheckpointId,
        actor_id: String,
        #[serde(default)]
        device: DeviceSpec,
    },
    #[serde(rename_all = "camelCase")]
    View { shipment_id: ShipmentId },
    #[serde(rename_all = "camelCase")]
    Shipment { shipment_id: ShipmentId },
    List,
    Summary,
    #[serde(rename_all = "camelCase")]
    Codes { shipment_id: ShipmentId },
    Resolve { code: String },
}

impl Request {
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Scan { .. } => "scan",
            Self::View { .. } => "view",
            Self::Shipment { .. } => "shipment",
            Self::List => "list",
            Self::Summary => "summary",
            Self::Codes { .. } => "codes",
            Self::Resolve { .. } => "resolve",
        }
    }
}

/// Why a request failed.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),
}

impl RequestError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "BAD_REQUEST",
            Self::Ingestion(e) => e.code(),
        }
    }
}

/// Error payload of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// A response line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: &RequestError) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorBody {
                code: error.code().to_string(),
                message: error.to_string(),
            }),
        }
    }

    /// Serialize as a single line.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"ok":false,"error":{{"code":"INTERNAL","message":{:?}}}}}"#,
                e.to_string()
            )
        })
    }
}
