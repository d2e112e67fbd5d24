//! Tasklet: terminal client for a remote task list.
//!
//! Launches the TUI against a task API. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/tasklet/config.toml`).
//!
//! ```bash
//! # Default API at http://127.0.0.1:8000
//! cargo run --bin tasklet
//!
//! # Another server
//! cargo run --bin tasklet -- --api-url https://tasks.example.com
//! TASKLET_API_URL=https://tasks.example.com cargo run --bin tasklet
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use tasklet::api::TaskApi;
use tasklet::api::http::HttpTaskApi;
use tasklet::app::App;
use tasklet::config::{CliArgs, ClientConfig};
use tasklet::net::Dispatcher;
use tasklet::ui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::from_cli(&cli)
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api_url = %config.api_url, "tasklet starting");

    let api = match HttpTaskApi::new(&config.api_url) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            tracing::error!(error = %e, "invalid API configuration");
            eprintln!("Error: {e}");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, api, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("tasklet exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("tasklet.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
///
/// Terminal events and request completions are awaited together, so the UI
/// keeps responding while requests are in flight.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: Arc<HttpTaskApi>,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new(api.endpoint()).with_header_title(config.header_title.clone());
    let (dispatcher, mut completions) = Dispatcher::new(api, config.channel_capacity);
    let mut events = EventStream::new();

    dispatcher.dispatch(app.tasks.begin_refresh());

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        tokio::select! {
            Some(completion) = completions.recv() => {
                let label = completion.pending.label();
                let settled = app.apply_completion(completion);
                tracing::info!(mutation = label, ?settled, "request settled");
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(pending) = app.handle_key_event(key) {
                        dispatcher.dispatch(pending);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
