use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Status),
        KeyCode::Char('2') => app.set_view(View::History),

        // History list navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Open the selected historical snapshot
        KeyCode::Enter => {
            if app.current_view == View::History {
                app.open_selected();
            }
        }

        // Back from a historical snapshot to the latest one
        KeyCode::Esc | KeyCode::Backspace => {
            if app.viewing.is_some() || app.blob_in_flight.is_some() {
                app.close_viewing();
            }
        }

        // Manual refresh; inert while a cycle is already in flight
        KeyCode::Char('r') => {
            if !app.refreshing() {
                app.start_refresh();
            }
        }

        // Auto-refresh toggle
        KeyCode::Char('a') => app.toggle_auto_refresh(Instant::now()),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from("poolwatch_export.json");
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => {
            app.select_prev();
        }
        MouseEventKind::ScrollDown => {
            app.select_next();
        }

        // Click to select / open
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Tab bar clicks (row 1, after header):
            // approximate tab positions: Status (0-10), History (11-22)
            if clicked_row == 1 {
                let col = mouse.column;
                if col < 11 {
                    app.set_view(View::Status);
                } else if col < 23 {
                    app.set_view(View::History);
                }
                return;
            }

            // History entries are one row each inside the list border
            if app.current_view == View::History && clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                if let Some(entries) = app.history_entries() {
                    if item_row < entries.len() {
                        app.selected_history_index = item_row;
                        app.open_selected();
                    }
                }
            }
        }

        // Right-click goes back to the latest snapshot
        MouseEventKind::Down(MouseButton::Right) => {
            app.close_viewing();
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Thresholds;
    use crate::source::{ArchiveSource, SourceEvent};
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        // An empty archive works as an inert source for key handling tests
        let dir = TempDir::new().unwrap();
        let source = Box::new(ArchiveSource::new(dir.path()));
        App::new(source, Thresholds::default(), Duration::from_secs(60))
    }

    #[test]
    fn test_quit_key() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_view_switching() {
        let mut app = test_app();
        assert_eq!(app.current_view, View::Status);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::History);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Status);
        handle_key_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.current_view, View::History);
    }

    #[test]
    fn test_any_key_closes_help() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        // The key that closed help did nothing else
        assert!(app.running);
    }

    #[test]
    fn test_escape_closes_historical_view() {
        let mut app = test_app();
        app.blob_in_flight = Some("x.json".to_string());
        app.apply_event(SourceEvent::Blob {
            name: "x.json".to_string(),
            result: Err(crate::source::SourceError::Status(404)),
        });
        assert!(app.viewing.is_some());
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(app.viewing.is_none());
        assert!(app.blob_in_flight.is_none());
    }
}
