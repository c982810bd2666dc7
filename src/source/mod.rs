//! Data source abstraction for fetching occupancy snapshots.
//!
//! This module provides a trait-based abstraction over the ways snapshot
//! data can be obtained: the tracker's HTTP API, or a local directory of
//! archived snapshot files.

mod file;
mod http;
mod snapshot;

pub use file::ArchiveSource;
pub use http::HttpSource;
pub use snapshot::{BlobList, Snapshot};

use std::fmt::Debug;

use thiserror::Error;

/// A fetch failure, carried back to the UI as visible state.
///
/// Every variant renders to a human-readable message; none of them are
/// retried or escalated past the operation that produced them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP error: status {0}")]
    Status(u16),
    /// The request never completed (connection refused, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),
    /// The body arrived but was not the JSON we expected.
    #[error("invalid response: {0}")]
    Decode(String),
}

/// A completed fetch, delivered asynchronously via [`DataSource::poll`].
///
/// `gen` on the refresh events is the generation token of the refresh cycle
/// that issued the request; the app drops events from superseded cycles.
#[derive(Debug, Clone)]
pub enum SourceEvent {
    /// Result of a latest-snapshot request.
    Latest {
        gen: u64,
        result: Result<Snapshot, SourceError>,
    },
    /// Result of a blob-listing request.
    History {
        gen: u64,
        result: Result<Vec<String>, SourceError>,
    },
    /// Result of a single historical snapshot request.
    Blob {
        name: String,
        result: Result<Snapshot, SourceError>,
    },
}

/// Trait for fetching occupancy data from various backends.
///
/// Requests are fire-and-forget; results come back through `poll()`, which
/// must be non-blocking so the UI loop stays responsive while a fetch is in
/// flight.
pub trait DataSource: Send + Debug {
    /// Request the latest snapshot.
    fn request_latest(&mut self, gen: u64);

    /// Request the list of stored snapshot identifiers.
    fn request_history(&mut self, gen: u64);

    /// Request one historical snapshot by identifier.
    fn request_blob(&mut self, name: &str);

    /// Poll for the next completed fetch, if any. Non-blocking.
    fn poll(&mut self) -> Option<SourceEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
