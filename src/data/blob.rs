//! Snapshot identifier handling.
//!
//! Blob names are opaque tokens, but the scraper names them
//! `scraped_data_<YYYY-MM-DD>_<HH>-<MM>-<SS>.json`, so a readable timestamp
//! can usually be recovered for display.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of history entries shown (client-side slice).
pub const HISTORY_LIMIT: usize = 10;

static BLOB_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"scraped_data_(\d{4}-\d{2}-\d{2})_(\d{2})-(\d{2})-(\d{2})")
        .expect("blob name pattern is valid")
});

/// Format a blob name as a readable timestamp.
///
/// `scraped_data_2024-01-15_14-30-45.json` becomes `2024-01-15 14:30:45`.
/// Names that don't match the pattern pass through unchanged; this never
/// fails.
pub fn format_blob_name(name: &str) -> String {
    match BLOB_NAME.captures(name) {
        Some(caps) => format!("{} {}:{}:{}", &caps[1], &caps[2], &caps[3], &caps[4]),
        None => name.to_string(),
    }
}

/// One entry in the rendered history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The backend's identifier, used as the lookup key.
    pub name: String,
    /// Human-readable label derived from the name.
    pub label: String,
}

/// Build the display list from the backend's blob list.
///
/// The backend appends, so the last element is the most recent: the list is
/// reversed (newest first) and truncated to [`HISTORY_LIMIT`] entries.
pub fn build_history(blobs: &[String]) -> Vec<HistoryEntry> {
    blobs
        .iter()
        .rev()
        .take(HISTORY_LIMIT)
        .map(|name| HistoryEntry {
            name: name.clone(),
            label: format_blob_name(name),
        })
        .collect()
}
