//! Application state and refresh orchestration.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::data::{build_history, format_blob_name, HistoryEntry, StatusData, Thresholds, Trend};
use crate::source::{DataSource, SourceEvent};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Occupancy status plus the raw snapshot details.
    Status,
    /// Historical snapshot list.
    History,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Status => View::History,
            View::History => View::Status,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views, so prev == next
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Status => "Status",
            View::History => "History",
        }
    }
}

/// State of the latest-snapshot display area.
#[derive(Debug, Clone)]
pub enum LatestState {
    /// A fetch is in flight; any prior bucket styling is gone.
    Loading,
    Loaded(StatusData),
    /// The fetch failed; the message is shown inline.
    Error(String),
}

/// State of the history list area.
#[derive(Debug, Clone)]
pub enum HistoryState {
    Loading,
    Loaded(Vec<HistoryEntry>),
    Error(String),
}

/// A historical snapshot shown in the details area in place of the latest
/// payload. Cleared whenever a new latest snapshot lands.
#[derive(Debug, Clone)]
pub struct Viewing {
    /// Formatted identifier for the "Viewing:" header line.
    pub label: String,
    /// Indented JSON body, or the inline error message.
    pub body: Result<String, String>,
}

/// Where the current refresh cycle stands.
///
/// The history request is only issued once the latest-snapshot result has
/// settled, so the two loads of one cycle never race each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshPhase {
    Idle,
    Latest,
    History,
}

/// Auto-refresh timer state: one enabled flag, one pending tick.
///
/// Owned by the [`App`]; toggle semantics guarantee at most one logical
/// timer.
#[derive(Debug, Clone)]
pub struct AutoRefresh {
    pub enabled: bool,
    interval: Duration,
    next_tick: Option<Instant>,
}

impl AutoRefresh {
    pub fn new(interval: Duration) -> Self {
        Self {
            enabled: false,
            interval,
            next_tick: None,
        }
    }

    fn enable(&mut self, now: Instant) {
        self.enabled = true;
        self.next_tick = Some(now + self.interval);
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.next_tick = None;
    }

    /// Check whether a tick is due, and if so arm the next one.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(deadline) if self.enabled && now >= deadline => {
                self.next_tick = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub thresholds: Thresholds,

    // Display areas
    pub latest: LatestState,
    pub history: HistoryState,
    pub viewing: Option<Viewing>,
    pub blob_in_flight: Option<String>,
    pub trend: Trend,

    // Navigation
    pub selected_history_index: usize,

    // Refresh cycle state. `refresh_gen` is the generation token: a new
    // refresh bumps it and events from older cycles are dropped, so the
    // latest-started refresh wins the displayed state.
    refresh_gen: u64,
    refresh_phase: RefreshPhase,
    pub auto: AutoRefresh,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source and settings.
    pub fn new(source: Box<dyn DataSource>, thresholds: Thresholds, interval: Duration) -> Self {
        Self {
            running: true,
            current_view: View::Status,
            show_help: false,
            source,
            thresholds,
            latest: LatestState::Loading,
            history: HistoryState::Loading,
            viewing: None,
            blob_in_flight: None,
            trend: Trend::new(),
            selected_history_index: 0,
            refresh_gen: 0,
            refresh_phase: RefreshPhase::Idle,
            auto: AutoRefresh::new(interval),
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Start a refresh cycle: latest snapshot first, history after it
    /// settles. Supersedes any cycle still in flight.
    pub fn start_refresh(&mut self) {
        self.refresh_gen += 1;
        self.refresh_phase = RefreshPhase::Latest;
        self.latest = LatestState::Loading;
        self.source.request_latest(self.refresh_gen);
    }

    /// Whether a refresh cycle is currently in flight.
    pub fn refreshing(&self) -> bool {
        self.refresh_phase != RefreshPhase::Idle
    }

    /// Flip auto-refresh. Enabling runs one immediate refresh and arms the
    /// recurring tick; disabling cancels the pending tick.
    pub fn toggle_auto_refresh(&mut self, now: Instant) {
        if self.auto.enabled {
            self.auto.disable();
            self.set_status_message("Auto-refresh off".to_string());
        } else {
            self.auto.enable(now);
            self.set_status_message("Auto-refresh on".to_string());
            self.start_refresh();
        }
    }

    /// Fire a refresh if the auto-refresh tick is due.
    pub fn check_auto_refresh(&mut self, now: Instant) {
        if self.auto.due(now) {
            self.start_refresh();
        }
    }

    /// Drain all completed fetches from the source.
    ///
    /// Returns true if anything was applied (the UI should redraw).
    pub fn poll_source(&mut self) -> bool {
        let mut applied = false;
        while let Some(event) = self.source.poll() {
            self.apply_event(event);
            applied = true;
        }
        applied
    }

    /// Apply one completed fetch to the display state.
    pub fn apply_event(&mut self, event: SourceEvent) {
        match event {
            SourceEvent::Latest { gen, result } => {
                if gen != self.refresh_gen {
                    return; // superseded cycle
                }
                match result {
                    Ok(snapshot) => {
                        let data = StatusData::from_snapshot(&snapshot, &self.thresholds);
                        self.trend.record(data.occupancy);
                        // A fresh latest payload replaces any historical view
                        self.viewing = None;
                        self.latest = LatestState::Loaded(data);
                    }
                    Err(e) => {
                        self.latest = LatestState::Error(format!("Error loading data: {}", e));
                    }
                }
                // History loads after the latest result settles, success or
                // failure alike
                if self.refresh_phase == RefreshPhase::Latest {
                    self.refresh_phase = RefreshPhase::History;
                    self.source.request_history(gen);
                }
            }
            SourceEvent::History { gen, result } => {
                if gen != self.refresh_gen {
                    return;
                }
                match result {
                    Ok(blobs) => {
                        let entries = build_history(&blobs);
                        if self.selected_history_index >= entries.len() {
                            self.selected_history_index = entries.len().saturating_sub(1);
                        }
                        self.history = HistoryState::Loaded(entries);
                    }
                    Err(e) => {
                        self.history = HistoryState::Error(format!("Error loading history: {}", e));
                    }
                }
                if self.refresh_phase == RefreshPhase::History {
                    self.refresh_phase = RefreshPhase::Idle;
                }
            }
            SourceEvent::Blob { name, result } => {
                if self.blob_in_flight.as_deref() != Some(name.as_str()) {
                    return; // a newer selection superseded this one
                }
                self.blob_in_flight = None;
                self.viewing = Some(Viewing {
                    label: format_blob_name(&name),
                    body: result
                        .map(|snapshot| snapshot.pretty())
                        .map_err(|e| format!("Error loading data: {}", e)),
                });
            }
        }
    }

    /// The "last updated" line for the status view.
    ///
    /// The literal `Error` marker replaces the timestamp when the latest
    /// load failed.
    pub fn last_updated_label(&self) -> String {
        match &self.latest {
            LatestState::Loading => "...".to_string(),
            LatestState::Loaded(data) => data.last_updated_text(),
            LatestState::Error(_) => "Error".to_string(),
        }
    }

    /// History entries, if loaded.
    pub fn history_entries(&self) -> Option<&[HistoryEntry]> {
        match &self.history {
            HistoryState::Loaded(entries) => Some(entries),
            _ => None,
        }
    }

    /// The currently selected history entry, if any.
    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.history_entries()?.get(self.selected_history_index)
    }

    /// Fetch the selected historical snapshot and focus the status view.
    pub fn open_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let name = entry.name.clone();
        self.blob_in_flight = Some(name.clone());
        self.source.request_blob(&name);
        self.current_view = View::Status;
    }

    /// Drop the historical view and show the latest snapshot again.
    pub fn close_viewing(&mut self) {
        self.viewing = None;
        self.blob_in_flight = None;
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move the history selection down by one item.
    pub fn select_next(&mut self) {
        if let Some(entries) = self.history_entries() {
            let max = entries.len().saturating_sub(1);
            self.selected_history_index = (self.selected_history_index + 1).min(max);
        }
    }

    /// Move the history selection up by one item.
    pub fn select_prev(&mut self) {
        self.selected_history_index = self.selected_history_index.saturating_sub(1);
    }

    /// Jump to the first history entry.
    pub fn select_first(&mut self) {
        self.selected_history_index = 0;
    }

    /// Jump to the last history entry.
    pub fn select_last(&mut self) {
        if let Some(entries) = self.history_entries() {
            self.selected_history_index = entries.len().saturating_sub(1);
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the currently displayed snapshot to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let (label, body) = match &self.viewing {
            Some(viewing) => match &viewing.body {
                Ok(pretty) => (viewing.label.as_str(), pretty.as_str()),
                Err(_) => anyhow::bail!("No data to export"),
            },
            None => match &self.latest {
                LatestState::Loaded(data) => ("latest", data.pretty.as_str()),
                _ => anyhow::bail!("No data to export"),
            },
        };

        let mut file = std::fs::File::create(path)?;
        writeln!(file, "{{")?;
        writeln!(file, "  \"viewing\": {},", serde_json::json!(label))?;
        writeln!(file, "  \"snapshot\": {}", indent_json(body))?;
        writeln!(file, "}}")?;
        Ok(())
    }
}

/// Re-indent a pretty-printed JSON body one level for embedding.
fn indent_json(body: &str) -> String {
    body.lines().collect::<Vec<_>>().join("\n  ")
}
