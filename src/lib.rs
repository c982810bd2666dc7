// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # poolwatch
//!
//! A diagnostic TUI and library for monitoring swimming-pool occupancy via
//! the attendance tracker API.
//!
//! The tracker backend scrapes the facility's occupancy, archives each
//! reading as a blob, and serves three endpoints: the latest snapshot, the
//! blob listing, and individual historical snapshots. poolwatch polls those
//! endpoints and displays the result in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(processing)   │(rendering)   │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── HttpSource | ArchiveSource                  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, the refresh cycle (latest snapshot
//!   first, history after it settles), the auto-refresh timer, and view
//!   navigation
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with an
//!   HTTP backend and a local archive-directory backend
//! - **[`data`]**: Processing - occupancy bucketing against thresholds,
//!   snapshot identifier formatting, and the occupancy trend for sparklines
//! - **[`ui`]**: Terminal rendering using ratatui - status indicator,
//!   history list, and theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the tracker API
//! poolwatch --url http://localhost:5000/api
//!
//! # Browse a local archive of scraped snapshots
//! poolwatch --dir ./archive
//! ```
//!
//! ### As a library with an archive source
//!
//! ```
//! use std::time::Duration;
//! use poolwatch::{App, ArchiveSource, Thresholds};
//!
//! let source = Box::new(ArchiveSource::new("./archive"));
//! let app = App::new(source, Thresholds::default(), Duration::from_secs(60));
//! ```
//!
//! ### As a library with the HTTP source
//!
//! ```no_run
//! use std::time::Duration;
//! use poolwatch::{App, HttpSource, Thresholds};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let source = rt.block_on(async {
//!     HttpSource::spawn("http://localhost:5000/api").unwrap()
//! });
//! let app = App::new(Box::new(source), Thresholds::default(), Duration::from_secs(60));
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, HistoryState, LatestState, View, Viewing};
pub use data::{
    build_history, format_blob_name, HistoryEntry, StatusBucket, StatusData, Thresholds, Trend,
};
pub use source::{ArchiveSource, BlobList, DataSource, HttpSource, Snapshot, SourceError, SourceEvent};
