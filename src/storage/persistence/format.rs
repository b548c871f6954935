//! On-disk snapshot encoding.
//!
//! A snapshot is a JSON document wrapping the records with a format version
//! and the time it was written:
//!
//! ```json
//! { "format_version": 1, "saved_at": "2024-05-01T12:00:00Z", "records": [] }
//! ```

use crate::models::Dataset;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current snapshot format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct SnapshotDocumentRef<'a> {
    format_version: u32,
    saved_at: DateTime<Utc>,
    records: &'a Dataset,
}

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    format_version: u32,
    #[allow(dead_code)]
    saved_at: Option<DateTime<Utc>>,
    records: Dataset,
}

/// Serializes a dataset into snapshot bytes.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if serialization fails.
pub fn encode_snapshot(dataset: &Dataset) -> Result<Vec<u8>> {
    let document = SnapshotDocumentRef {
        format_version: SNAPSHOT_FORMAT_VERSION,
        saved_at: Utc::now(),
        records: dataset,
    };
    serde_json::to_vec_pretty(&document).map_err(|e| Error::operation("encode_snapshot", e))
}

/// Deserializes snapshot bytes into a dataset.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the bytes are not a snapshot
/// document or carry an unsupported format version.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Dataset> {
    let document: SnapshotDocument =
        serde_json::from_slice(bytes).map_err(|e| Error::operation("decode_snapshot", e))?;

    if document.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(Error::operation(
            "decode_snapshot",
            format!(
                "unsupported snapshot format version {} (expected {SNAPSHOT_FORMAT_VERSION})",
                document.format_version
            ),
        ));
    }

    Ok(document.records)
}
