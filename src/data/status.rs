//! Occupancy bucketing and status data processing.
//!
//! This module transforms raw snapshots into the processed form the status
//! view renders, with the display bucket computed from configurable
//! thresholds.

use std::time::Instant;

use chrono::{DateTime, Local, NaiveDateTime};

use crate::source::Snapshot;

/// Occupancy cutoffs for bucket computation.
///
/// An occupancy at or below `available_max` is Available, at or below
/// `busy_max` is Busy, and anything above that is Full.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Highest occupancy still considered Available.
    pub available_max: i64,
    /// Highest occupancy still considered Busy.
    pub busy_max: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            available_max: 30,
            busy_max: 70,
        }
    }
}

/// Display bucket derived from an occupancy reading.
///
/// Exactly one bucket applies to any reading; a snapshot without an
/// occupancy value is Unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Available,
    Busy,
    Full,
    Unknown,
}

impl StatusBucket {
    /// Compute the bucket for an occupancy reading.
    pub fn from_occupancy(occupancy: Option<i64>, thresholds: &Thresholds) -> Self {
        match occupancy {
            None => StatusBucket::Unknown,
            Some(v) if v <= thresholds.available_max => StatusBucket::Available,
            Some(v) if v <= thresholds.busy_max => StatusBucket::Busy,
            Some(_) => StatusBucket::Full,
        }
    }

    /// Short name for tables and the status bar.
    pub fn name(&self) -> &'static str {
        match self {
            StatusBucket::Available => "AVAILABLE",
            StatusBucket::Busy => "BUSY",
            StatusBucket::Full => "FULL",
            StatusBucket::Unknown => "UNKNOWN",
        }
    }
}

/// A snapshot processed for display in the status view.
#[derive(Debug, Clone)]
pub struct StatusData {
    pub bucket: StatusBucket,
    pub occupancy: Option<i64>,
    /// Timestamp shown in the "last updated" line: the snapshot's own
    /// timestamp when present and parseable, the local clock otherwise.
    pub displayed_at: DateTime<Local>,
    /// Indented raw payload for the details area.
    pub pretty: String,
    /// When this data was received, for the "updated Xs ago" readout.
    pub fetched_at: Instant,
}

impl StatusData {
    /// Process a snapshot for display.
    pub fn from_snapshot(snapshot: &Snapshot, thresholds: &Thresholds) -> Self {
        Self {
            bucket: StatusBucket::from_occupancy(snapshot.occupancy, thresholds),
            occupancy: snapshot.occupancy,
            displayed_at: parse_timestamp(snapshot.timestamp.as_deref()),
            pretty: snapshot.pretty(),
            fetched_at: Instant::now(),
        }
    }

    /// Status line text, e.g. `Available (25% occupied)`.
    pub fn status_text(&self) -> String {
        match (self.bucket, self.occupancy) {
            (StatusBucket::Available, Some(v)) => format!("Available ({}% occupied)", v),
            (StatusBucket::Busy, Some(v)) => format!("Busy ({}% occupied)", v),
            (StatusBucket::Full, Some(v)) => format!("Full ({}% occupied)", v),
            _ => "Status Unknown".to_string(),
        }
    }

    /// The "last updated" line in local time.
    pub fn last_updated_text(&self) -> String {
        self.displayed_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Parse the snapshot timestamp, falling back to the current time.
///
/// The tracker writes naive ISO-8601 (`datetime.utcnow().isoformat()`), but
/// offset-carrying RFC 3339 is accepted too. Naive timestamps are taken as
/// UTC and converted to local time.
fn parse_timestamp(ts: Option<&str>) -> DateTime<Local> {
    ts.and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Local))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc().with_timezone(&Local))
            })
    })
    .unwrap_or_else(Local::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bucket(occupancy: Option<i64>) -> StatusBucket {
        StatusBucket::from_occupancy(occupancy, &Thresholds::default())
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket(Some(0)), StatusBucket::Available);
        assert_eq!(bucket(Some(30)), StatusBucket::Available);
        assert_eq!(bucket(Some(31)), StatusBucket::Busy);
        assert_eq!(bucket(Some(70)), StatusBucket::Busy);
        assert_eq!(bucket(Some(71)), StatusBucket::Full);
        assert_eq!(bucket(Some(100)), StatusBucket::Full);
        assert_eq!(bucket(None), StatusBucket::Unknown);
    }

    #[test]
    fn test_bucket_exclusive_over_range() {
        // Occupancy is not validated, so sweep well past the expected 0-100
        for v in -20..=150 {
            let b = bucket(Some(v));
            let expected = if v <= 30 {
                StatusBucket::Available
            } else if v <= 70 {
                StatusBucket::Busy
            } else {
                StatusBucket::Full
            };
            assert_eq!(b, expected, "occupancy {}", v);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            available_max: 10,
            busy_max: 50,
        };
        assert_eq!(
            StatusBucket::from_occupancy(Some(30), &thresholds),
            StatusBucket::Busy
        );
        assert_eq!(
            StatusBucket::from_occupancy(Some(51), &thresholds),
            StatusBucket::Full
        );
    }

    #[test]
    fn test_status_text() {
        let snapshot = Snapshot::from_value(json!({ "data": { "occupancy": 45 } }));
        let data = StatusData::from_snapshot(&snapshot, &Thresholds::default());
        assert_eq!(data.status_text(), "Busy (45% occupied)");

        let snapshot = Snapshot::from_value(json!({}));
        let data = StatusData::from_snapshot(&snapshot, &Thresholds::default());
        assert_eq!(data.status_text(), "Status Unknown");
    }

    #[test]
    fn test_parse_naive_timestamp() {
        let parsed = parse_timestamp(Some("2024-01-15T14:30:45.123456"));
        // Naive timestamps are UTC; compare in UTC to stay timezone-independent
        let utc = parsed.with_timezone(&chrono::Utc);
        assert_eq!(utc.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 14:30:45");
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let parsed = parse_timestamp(Some("2024-01-15T14:30:45Z"));
        let utc = parsed.with_timezone(&chrono::Utc);
        assert_eq!(utc.format("%H:%M:%S").to_string(), "14:30:45");
    }

    #[test]
    fn test_unparseable_timestamp_falls_back_to_now() {
        let before = Local::now();
        let parsed = parse_timestamp(Some("yesterday-ish"));
        let after = Local::now();
        assert!(parsed >= before && parsed <= after);

        let parsed = parse_timestamp(None);
        assert!(parsed >= before);
    }
}
