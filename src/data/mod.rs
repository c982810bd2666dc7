//! Data models and processing for occupancy snapshots.
//!
//! This module turns raw snapshots into display-ready data:
//!
//! - [`status`]: occupancy bucketing ([`StatusBucket`]) and the processed
//!   [`StatusData`] shown in the status view
//! - [`blob`]: snapshot identifier formatting and history list building
//! - [`trend`]: recent-occupancy tracking for the header sparkline

pub mod blob;
pub mod status;
pub mod trend;

pub use blob::{build_history, format_blob_name, HistoryEntry, HISTORY_LIMIT};
pub use status::{StatusBucket, StatusData, Thresholds};
pub use trend::Trend;
