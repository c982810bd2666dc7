//! History view rendering.
//!
//! Displays the most recent stored snapshots (newest first, at most 10) as a
//! selectable list.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, HistoryState};

/// Literal shown when the backend has no stored snapshots.
pub const NO_DATA_MESSAGE: &str = "No historical data available";

/// Render the History view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(list_title(app))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    match &app.history {
        HistoryState::Loading => {
            let paragraph = Paragraph::new(Span::styled(
                "Loading...",
                Style::default().add_modifier(Modifier::DIM),
            ))
            .block(block);
            frame.render_widget(paragraph, area);
        }
        HistoryState::Error(message) => {
            let paragraph =
                Paragraph::new(Span::styled(message.clone(), app.theme.error)).block(block);
            frame.render_widget(paragraph, area);
        }
        HistoryState::Loaded(entries) if entries.is_empty() => {
            let paragraph = Paragraph::new(NO_DATA_MESSAGE).block(block);
            frame.render_widget(paragraph, area);
        }
        HistoryState::Loaded(entries) => {
            let items: Vec<ListItem> = entries
                .iter()
                .map(|entry| {
                    ListItem::new(Line::from(vec![
                        Span::raw(entry.label.clone()),
                        Span::styled(
                            "  Enter to view",
                            Style::default().add_modifier(Modifier::DIM),
                        ),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(app.theme.selected)
                .highlight_symbol("▶ ");

            let mut state = ListState::default();
            state.select(Some(
                app.selected_history_index.min(entries.len().saturating_sub(1)),
            ));

            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn list_title(app: &App) -> String {
    match &app.history {
        HistoryState::Loaded(entries) if !entries.is_empty() => {
            format!(
                " Recent Snapshots [{}/{}] ",
                app.selected_history_index + 1,
                entries.len()
            )
        }
        _ => " Recent Snapshots ".to_string(),
    }
}
