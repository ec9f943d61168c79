use std::io::{self, Stderr};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Redraw cadence for transient UI state (refresh highlight, spinner)
pub const ANIMATION_TICK: Duration = Duration::from_millis(250);

#[derive(Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Map a terminal event to what the app reacts to. Key releases and
/// repeats are dropped so each press counts once.
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}

fn spawn_input_reader(tx: mpsc::UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(read) = reader.next().await {
            let event = match read {
                Ok(event) => translate(event),
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event stream failed");
                    continue;
                }
            };
            if let Some(event) = event {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
        tracing::debug!("terminal input closed");
    })
}

fn spawn_ticker(tx: mpsc::UnboundedSender<AppEvent>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        while tx.send(AppEvent::Tick).is_ok() {
            interval.tick().await;
        }
    })
}

/// Terminal input plus the animation tick, merged into one stream.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tasks = vec![spawn_input_reader(tx.clone()), spawn_ticker(tx, ANIMATION_TICK)];
        Self { rx, tasks }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stderr()))?)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Leave the alternate screen before the panic message is printed.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        previous(info);
    }));
}
