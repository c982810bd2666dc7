// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::EnvFilter;

mod app;
mod data;
mod events;
mod source;
mod ui;

use app::{App, View};
use data::Thresholds;
use source::{ArchiveSource, DataSource, HttpSource};

#[derive(Parser, Debug)]
#[command(name = "poolwatch")]
#[command(about = "Diagnostic TUI for monitoring swimming-pool occupancy via the attendance tracker API")]
struct Args {
    /// API root of the tracker backend
    #[arg(short, long, default_value = "http://localhost:5000/api", conflicts_with = "dir")]
    url: String,

    /// Browse a local directory of archived snapshot files instead of the API
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Auto-refresh interval in seconds
    #[arg(short, long, default_value = "60")]
    refresh: u64,

    /// Occupancy at or below this percentage is shown as Available
    #[arg(long, default_value = "30")]
    available_max: i64,

    /// Occupancy at or below this percentage is shown as Busy
    #[arg(long, default_value = "70")]
    busy_max: i64,
}

fn main() -> Result<()> {
    // Logs go to stderr so they can be redirected from under the TUI
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let thresholds = Thresholds {
        available_max: args.available_max,
        busy_max: args.busy_max,
    };
    let interval = Duration::from_secs(args.refresh);

    // Archive mode: browse local snapshot files
    if let Some(ref dir) = args.dir {
        let source = Box::new(ArchiveSource::new(dir));
        return run_tui(source, thresholds, interval);
    }

    // Default: HTTP mode. The runtime stays alive here for the background
    // fetch task while the TUI runs on the main thread.
    let rt = tokio::runtime::Runtime::new()?;
    let source = rt.block_on(async { HttpSource::spawn(&args.url) })?;
    run_tui(Box::new(source), thresholds, interval)
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, thresholds: Thresholds, interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and trigger the initial load
    let mut app = App::new(source, thresholds, interval);
    app.start_refresh();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with the occupancy at a glance
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Status => ui::status::render(frame, app, chunks[2]),
                View::History => ui::history::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1)
                    events::handle_mouse_event(app, mouse, 2);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Apply any completed fetches
        app.poll_source();

        // Fire the auto-refresh tick when due
        app.check_auto_refresh(Instant::now());
    }

    Ok(())
}
