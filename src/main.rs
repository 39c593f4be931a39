//! lendadmin binary entry point.
//!
//! Parses configuration, wires the store, HTTP client and keymap into the
//! dashboard state, initializes the terminal in raw mode, runs the TUI event
//! loop, and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lendadmin::api::transport::ReqwestTransport;
use lendadmin::api::{ApiClient, UserService};
use lendadmin::app::{self, AppState, keymap::Keymap};
use lendadmin::config::Args;
use lendadmin::error::{Context, Result};
use lendadmin::store::{FileStore, KeyValueStore};

/// Route `tracing` output to the log file; the terminal belongs to the TUI.
fn init_logging(args: &Args) -> Result<()> {
    let path = args.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_ctx(|| format!("create log dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;
    init_logging(&args)?;

    let file_store = FileStore::new(args.data_dir());
    let transport = ReqwestTransport::new(args.timeout()).with_ctx(|| "build http client".to_string())?;
    let client = ApiClient::new(args.api_url.clone(), Arc::new(transport)).with_token(args.token());
    info!(
        api_url = client.base_url(),
        data_dir = %file_store.dir().display(),
        "starting lendadmin"
    );

    let store: Arc<dyn KeyValueStore> = Arc::new(file_store);
    let service: Arc<dyn UserService> = Arc::new(client);
    let keymap = Keymap::load(&args.keybinds_path());
    let state = AppState::new(store, keymap);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {e}"))?;

    let res = app::run(&mut terminal, state, service).await;

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
