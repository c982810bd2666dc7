//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::StatusBucket;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for the Available bucket.
    pub available: Color,
    /// Color for the Busy bucket.
    pub busy: Color,
    /// Color for the Full bucket.
    pub full: Color,
    /// Color for the Unknown bucket and other muted text.
    pub muted: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for error messages.
    pub error: Style,
    /// Style for header rows and titles.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            available: Color::Green,
            busy: Color::Yellow,
            full: Color::Red,
            muted: Color::Gray,
            border: Color::Gray,
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            available: Color::Green,
            busy: Color::Yellow,
            full: Color::Red,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a status bucket
    pub fn bucket_style(&self, bucket: StatusBucket) -> Style {
        match bucket {
            StatusBucket::Available => Style::default().fg(self.available),
            StatusBucket::Busy => Style::default().fg(self.busy),
            StatusBucket::Full => Style::default().fg(self.full).add_modifier(Modifier::BOLD),
            StatusBucket::Unknown => Style::default().fg(self.muted),
        }
    }
}
