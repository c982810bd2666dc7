//! Status view rendering.
//!
//! Shows the bucketed status indicator, the "last updated" line, and the raw
//! snapshot JSON (latest, or a historical one when the user opened a history
//! entry).

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LatestState};

/// Render the Status view: indicator box on top, details area below.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(4), // Status box
        Constraint::Min(4),    // Raw snapshot details
    ])
    .split(area);

    render_status_box(frame, app, chunks[0]);
    render_details(frame, app, chunks[1]);
}

/// The status indicator box with the bucket text and last-updated line.
fn render_status_box(frame: &mut Frame, app: &App, area: Rect) {
    let (lines, border_style) = match &app.latest {
        LatestState::Loading => (
            vec![Line::from(Span::styled(
                "Loading...",
                Style::default().add_modifier(Modifier::DIM),
            ))],
            Style::default().fg(app.theme.border),
        ),
        LatestState::Error(message) => (
            vec![
                Line::from(Span::styled(message.clone(), app.theme.error)),
                Line::from(vec![
                    Span::styled("Last updated: ", Style::default().add_modifier(Modifier::DIM)),
                    Span::styled("Error", app.theme.error),
                ]),
            ],
            app.theme.error,
        ),
        LatestState::Loaded(data) => {
            let bucket_style = app.theme.bucket_style(data.bucket).add_modifier(Modifier::BOLD);
            (
                vec![
                    Line::from(Span::styled(data.status_text(), bucket_style)),
                    Line::from(vec![
                        Span::styled(
                            "Last updated: ",
                            Style::default().add_modifier(Modifier::DIM),
                        ),
                        Span::raw(data.last_updated_text()),
                    ]),
                ],
                app.theme.bucket_style(data.bucket),
            )
        }
    };

    let block = Block::default()
        .title(" Current Status ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// The details area: raw JSON of the latest snapshot, or the historical one
/// being viewed, or an inline fetch error.
fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let mut title = " Latest Data ".to_string();
    let mut lines: Vec<Line> = Vec::new();

    if let Some(name) = &app.blob_in_flight {
        title = " History ".to_string();
        lines.push(Line::from(Span::styled(
            format!("Loading {}...", crate::data::format_blob_name(name)),
            Style::default().add_modifier(Modifier::DIM),
        )));
    } else if let Some(viewing) = &app.viewing {
        title = " History ".to_string();
        lines.push(Line::from(vec![
            Span::styled("Viewing: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(viewing.label.clone(), app.theme.header),
        ]));
        lines.push(Line::from(""));
        match &viewing.body {
            Ok(pretty) => {
                lines.extend(pretty.lines().map(|l| Line::from(l.to_string())));
            }
            Err(message) => {
                lines.push(Line::from(Span::styled(message.clone(), app.theme.error)));
            }
        }
    } else {
        match &app.latest {
            LatestState::Loading => {
                lines.push(Line::from(Span::styled(
                    "Loading...",
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
            LatestState::Error(message) => {
                lines.push(Line::from(Span::styled(message.clone(), app.theme.error)));
            }
            LatestState::Loaded(data) => {
                lines.extend(data.pretty.lines().map(|l| Line::from(l.to_string())));
            }
        }
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Thresholds;
    use crate::source::{ArchiveSource, SourceError, SourceEvent};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_app() -> App {
        let dir = TempDir::new().unwrap();
        let source = Box::new(ArchiveSource::new(dir.path()));
        App::new(source, Thresholds::default(), Duration::from_secs(60))
    }

    fn render_to_text(app: &App) -> String {
        let backend = TestBackend::new(70, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, app, frame.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_loaded_status_shows_bucket_and_timestamp() {
        let mut app = test_app();
        app.start_refresh();
        app.apply_event(SourceEvent::Latest {
            gen: 1,
            result: Ok(crate::source::Snapshot::from_value(json!({
                "timestamp": "2024-01-15T14:30:45",
                "data": { "occupancy": 42 },
            }))),
        });

        let text = render_to_text(&app);
        assert!(text.contains("Busy (42% occupied)"));
        assert!(text.contains("Last updated:"));
        assert!(!text.contains("Last updated: Error"));
    }

    #[test]
    fn test_fetch_error_shown_inline_with_error_marker() {
        let mut app = test_app();
        app.start_refresh();
        app.apply_event(SourceEvent::Latest {
            gen: 1,
            result: Err(SourceError::Status(500)),
        });

        let text = render_to_text(&app);
        assert!(text.contains("Error loading data"));
        assert!(text.contains("500"));
        assert!(text.contains("Last updated: Error"));
    }
}
