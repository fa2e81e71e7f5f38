//! Scannable checkpoint codes.
//!
//! A code is the URI printed on the checkpoint label:
//! `{base_url}/scan/{checkpoint_id}`. Because checkpoint identifiers are
//! globally unique the code does not need the shipment identifier.

use super::errors::{IngestionError, IngestionResult};
use shared_types::CheckpointId;

const SCAN_PATH: &str = "/scan/";

/// Renders and parses checkpoint scan codes.
pub struct ScanCode;

impl ScanCode {
    /// Render the code for a checkpoint.
    #[must_use]
    pub fn render(base_url: &str, checkpoint_id: CheckpointId) -> String {
        format!(
            "{}{}{}",
            base_url.trim_end_matches('/'),
            SCAN_PATH,
            checkpoint_id
        )
    }

    /// Extract the checkpoint identifier from a scanned code.
    ///
    /// Accepts a full code with any host, a bare `/scan/{id}` path, or a bare
    /// identifier. Query strings, fragments and a trailing slash are ignored.
    pub fn parse(code: &str) -> IngestionResult<CheckpointId> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(IngestionError::invalid_code(code, "empty code"));
        }

        let candidate = match trimmed.rfind(SCAN_PATH) {
            Some(idx) => &trimmed[idx + SCAN_PATH.len()..],
            None if trimmed.contains('/') => {
                return Err(IngestionError::invalid_code(code, "missing /scan/ path"));
            }
            None => trimmed,
        };

        let candidate = candidate
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        candidate
            .parse::<CheckpointId>()
            .map_err(|e| IngestionError::invalid_code(code, e.to_string()))
    }
}
