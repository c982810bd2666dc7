//! Archive-directory data source.
//!
//! Browses a local directory of `scraped_data_*.json` files, as written by
//! the tracker's scraper when it archives snapshots to disk. Useful for
//! offline inspection of an archive without the API server running.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use super::{DataSource, Snapshot, SourceError, SourceEvent};

/// Only files with this prefix count as snapshots.
const SNAPSHOT_PREFIX: &str = "scraped_data_";

/// A data source that serves snapshots from a directory of archive files.
///
/// The directory listing plays the role of the blob list (names sort
/// chronologically, so the newest file is the last entry, matching the API's
/// append order), and the newest file is served as the latest snapshot.
///
/// Requests complete synchronously; results are queued and handed out
/// through `poll()` so the source behaves like any other [`DataSource`].
#[derive(Debug)]
pub struct ArchiveSource {
    dir: PathBuf,
    description: String,
    pending: VecDeque<SourceEvent>,
}

impl ArchiveSource {
    /// Create an archive source for the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("archive: {}", dir.display());
        Self {
            dir,
            description,
            pending: VecDeque::new(),
        }
    }

    /// Returns the directory being browsed.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List snapshot file names, sorted ascending (oldest first).
    fn list_names(&self) -> Result<Vec<String>, SourceError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| SourceError::Transport(e.to_string()))?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(".json"))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Read and parse one snapshot file.
    fn read_snapshot(&self, name: &str) -> Result<Snapshot, SourceError> {
        let content = fs::read_to_string(self.dir.join(name))
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| SourceError::Decode(e.to_string()))?;
        Ok(Snapshot::from_value(value))
    }
}

impl DataSource for ArchiveSource {
    fn request_latest(&mut self, gen: u64) {
        let result = self.list_names().and_then(|names| match names.last() {
            Some(newest) => self.read_snapshot(newest),
            None => Err(SourceError::Transport("archive is empty".to_string())),
        });
        self.pending.push_back(SourceEvent::Latest { gen, result });
    }

    fn request_history(&mut self, gen: u64) {
        let result = self.list_names();
        self.pending.push_back(SourceEvent::History { gen, result });
    }

    fn request_blob(&mut self, name: &str) {
        let result = self.read_snapshot(name);
        self.pending.push_back(SourceEvent::Blob {
            name: name.to_string(),
            result,
        });
    }

    fn poll(&mut self) -> Option<SourceEvent> {
        self.pending.pop_front()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_snapshot(dir: &Path, name: &str, occupancy: i64) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        write!(
            file,
            r#"{{"timestamp": "2024-01-15T14:30:45", "data": {{"occupancy": {}}}}}"#,
            occupancy
        )
        .unwrap();
    }

    #[test]
    fn test_archive_source_latest_is_newest_file() {
        let dir = TempDir::new().unwrap();
        write_snapshot(dir.path(), "scraped_data_2024-01-14_09-00-00.json", 10);
        write_snapshot(dir.path(), "scraped_data_2024-01-15_14-30-45.json", 55);

        let mut source = ArchiveSource::new(dir.path());
        source.request_latest(1);

        match source.poll() {
            Some(SourceEvent::Latest { gen: 1, result }) => {
                assert_eq!(result.unwrap().occupancy, Some(55));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_archive_source_history_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write_snapshot(dir.path(), "scraped_data_2024-01-15_14-30-45.json", 55);
        write_snapshot(dir.path(), "scraped_data_2024-01-14_09-00-00.json", 10);
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let mut source = ArchiveSource::new(dir.path());
        source.request_history(2);

        match source.poll() {
            Some(SourceEvent::History { gen: 2, result }) => {
                let names = result.unwrap();
                assert_eq!(
                    names,
                    vec![
                        "scraped_data_2024-01-14_09-00-00.json",
                        "scraped_data_2024-01-15_14-30-45.json"
                    ]
                );
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_archive_source_blob_and_missing_blob() {
        let dir = TempDir::new().unwrap();
        write_snapshot(dir.path(), "scraped_data_2024-01-14_09-00-00.json", 80);

        let mut source = ArchiveSource::new(dir.path());

        source.request_blob("scraped_data_2024-01-14_09-00-00.json");
        match source.poll() {
            Some(SourceEvent::Blob { name, result }) => {
                assert_eq!(name, "scraped_data_2024-01-14_09-00-00.json");
                assert_eq!(result.unwrap().occupancy, Some(80));
            }
            other => panic!("unexpected event: {:?}", other),
        }

        source.request_blob("scraped_data_1999-01-01_00-00-00.json");
        match source.poll() {
            Some(SourceEvent::Blob { result, .. }) => {
                assert!(matches!(result, Err(SourceError::Transport(_))));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_archive_source_empty_directory() {
        let dir = TempDir::new().unwrap();
        let mut source = ArchiveSource::new(dir.path());

        source.request_latest(1);
        match source.poll() {
            Some(SourceEvent::Latest { result, .. }) => assert!(result.is_err()),
            other => panic!("unexpected event: {:?}", other),
        }

        source.request_history(1);
        match source.poll() {
            Some(SourceEvent::History { result, .. }) => {
                assert!(result.unwrap().is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_archive_source_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("scraped_data_2024-01-15_14-30-45.json"),
            "not valid json",
        )
        .unwrap();

        let mut source = ArchiveSource::new(dir.path());
        source.request_latest(1);
        match source.poll() {
            Some(SourceEvent::Latest { result, .. }) => {
                assert!(matches!(result, Err(SourceError::Decode(_))));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
