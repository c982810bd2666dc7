//! Wire types for the attendance tracker API.
//!
//! These match the JSON shapes served by the tracker backend: a snapshot is
//! `{ "timestamp": ..., "data": { "occupancy": ... } }` with any number of
//! extra fields, and the blob listing is `{ "blobs": [...] }`.

use serde::Deserialize;
use serde_json::Value;

/// One occupancy snapshot, current or historical.
///
/// The backend makes no guarantees beyond "a JSON object": `timestamp` and
/// `data.occupancy` are both optional, and anything else in the payload is
/// opaque. The full raw value is kept so the UI can show it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// ISO-8601 timestamp string, if the payload carried one.
    pub timestamp: Option<String>,
    /// Occupancy percentage from `data.occupancy`, if present.
    pub occupancy: Option<i64>,
    /// The complete payload as received.
    pub raw: Value,
}

impl Snapshot {
    /// Build a snapshot from a raw JSON payload.
    ///
    /// Never fails: missing or oddly-typed fields just come back as `None`.
    pub fn from_value(raw: Value) -> Self {
        let timestamp = raw.get("timestamp").and_then(Value::as_str).map(str::to_string);
        let occupancy = raw
            .get("data")
            .and_then(|d| d.get("occupancy"))
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)));

        Self {
            timestamp,
            occupancy,
            raw,
        }
    }

    /// The raw payload as indented JSON for the details area.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

/// Response shape of the blob-listing endpoint.
///
/// A missing or null `blobs` field is treated the same as an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlobList {
    #[serde(default)]
    pub blobs: Vec<String>,
}
