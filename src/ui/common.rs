//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, LatestState, View};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the header bar with the current occupancy at a glance.
///
/// Displays: status indicator, bucket label, occupancy trend sparkline.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " POOLWATCH ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    match &app.latest {
        LatestState::Loading => {
            spans.push(Span::raw("│ Loading..."));
        }
        LatestState::Error(_) => {
            spans.push(Span::styled("│ unavailable", app.theme.error));
        }
        LatestState::Loaded(data) => {
            spans.push(Span::styled(" ● ", app.theme.bucket_style(data.bucket)));
            spans.push(Span::styled(
                data.bucket.name(),
                app.theme.bucket_style(data.bucket),
            ));
            if let Some(occupancy) = data.occupancy {
                spans.push(Span::raw(format!(" │ {}% occupied", occupancy)));
            }
            if !app.trend.is_empty() {
                spans.push(Span::raw(" │ "));
                spans.push(Span::styled(
                    render_sparkline(&app.trend.sparkline(12)),
                    Style::default().fg(app.theme.highlight),
                ));
            }
        }
    }

    if app.auto.enabled {
        spans.push(Span::styled(
            " │ auto",
            Style::default().fg(app.theme.highlight),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_sparkline(levels: &[u8]) -> String {
    levels.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Status "), Line::from(" 2:History ")];

    let selected = match app.current_view {
        View::Status => 0,
        View::History => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, refresh state, available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let refresh_state = if app.refreshing() {
        "Refreshing..."
    } else if app.auto.enabled {
        "Auto-refresh on"
    } else {
        "Auto-refresh off"
    };

    let controls = match app.current_view {
        View::Status => "r:refresh a:auto Tab:switch Esc:back ?:help q:quit",
        View::History => "↑↓:select Enter:view r:refresh a:auto Tab:switch ?:help q:quit",
    };

    let status = format!(
        " {} | {} | {}",
        app.source_description(),
        refresh_state,
        controls
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate history"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       View snapshot"),
        Line::from("  Esc         Back to latest"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Data",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  a         Toggle auto-refresh"),
        Line::from("  e         Export snapshot to JSON"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ?         Toggle this help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
