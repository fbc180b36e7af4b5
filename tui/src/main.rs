//! Zenorb TUI Entry Point
//!
//! Launches the terminal surface for the breathing orb.
//!
//! Environment:
//!   OLLAMA_HOST / OLLAMA_PORT  Ollama server (default: localhost:11434)
//!   ZENORB_MODEL               Model to ask for replies
//!   ZENORB_CONFIG              Engine config file
//!   ZENORB_LOG                 Log file (default: zenorb.log in the temp dir)
//!   RUST_LOG                   Log filter (default: info)

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zenorb_core::{load_config, OllamaBackend, ReplyBackend};
use zenorb_tui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_path = init_logging()?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: zenorb requires a terminal (TTY)");
        std::process::exit(1);
    }

    let (config, source) = load_config()?;
    tracing::info!(?source, "Configuration loaded");

    let backend = OllamaBackend::from_env()?;
    if !backend.health_check().await {
        tracing::warn!(model = backend.model(), "Ollama is not reachable");
        eprintln!(
            "Warning: Ollama is not reachable; replies will fail (log: {})",
            log_path.display()
        );
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let mut app = App::new(config, Arc::new(backend));
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Log to a file so output never lands on the alternate screen
fn init_logging() -> anyhow::Result<PathBuf> {
    let path = std::env::var_os("ZENORB_LOG")
        .map_or_else(|| std::env::temp_dir().join("zenorb.log"), PathBuf::from);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(path)
}
