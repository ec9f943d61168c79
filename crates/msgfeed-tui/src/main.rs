use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use msgfeed_core::{FeedViewConfig, MessageFeedView, MessagesApi, StaticHost};

mod app;
mod config;
mod handler;
mod tui;
mod ui;

use app::App;
use config::Config;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "msgfeed")]
#[command(about = "Terminal viewer for the anonymous message feed")]
struct Cli {
    /// Base URL of the messages API
    #[arg(long)]
    base_url: Option<String>,
    /// Number of messages to request
    #[arg(short, long)]
    limit: Option<u32>,
    /// Auto-refresh period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log file (defaults to the user cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("msgfeed")
        .join("msgfeed.log")
}

/// Log to a file: the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file.clone().unwrap_or_else(default_log_path))?;

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => Config::get_config_path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("could not read config {}", config_path.display()))?;

    let base_url = cli.base_url.unwrap_or(config.base_url);
    let view_config = FeedViewConfig {
        limit: cli.limit.or(config.limit),
        refresh_interval: Duration::from_millis(cli.interval_ms.unwrap_or(config.refresh_interval_ms).max(1)),
    };
    let host = config.host.map(|params| Arc::new(StaticHost::new(params)));

    tracing::info!(
        %base_url,
        interval_ms = view_config.refresh_interval.as_millis() as u64,
        hosted = host.is_some(),
        "starting message feed"
    );

    let view = MessageFeedView::new(Arc::new(MessagesApi::new(&base_url)), view_config);
    let mut app = App::new(view, host, Some(config_path));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;

    app.shutdown();
    tui::restore()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "message feed exited with an error");
    }
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();
    app.start();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            Some(event) = events.next() => handler::handle_event(app, event),
            Some(event) = app.view.next_event() => app.view.handle(event),
            else => break,
        }
    }

    Ok(())
}
