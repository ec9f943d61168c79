//! The polling message feed view.
//!
//! [`MessageFeedView`] owns the container contents, its refresh timer and the
//! in-flight request. It is driven from a single task: the owner awaits
//! [`MessageFeedView::next_event`] and hands each event back to
//! [`MessageFeedView::handle`]. Network work runs in spawned tasks that only
//! ever talk to the view through that event channel.
//!
//! Every refresh is tagged with a sequence number. A response is applied
//! only if it answers the most recently issued request, and starting a new
//! refresh aborts the previous one, so a slow response can never overwrite a
//! newer list.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::MessageSource;
use crate::error::FeedError;
use crate::feed::{ContainerContent, FeedState};
use crate::host::Host;
use crate::message::Payload;
use crate::theme::{self, Theme};
use crate::time_format::format_clock;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(10_000);
pub const REFRESH_HIGHLIGHT: Duration = Duration::from_millis(1000);

const EMPTY_SUBMISSION: &str = "Порожнє повідомлення";
const STILL_SENDING: &str = "Попереднє повідомлення ще надсилається";
const VIEW_CLOSED: &str = "Стрічку закрито";

#[derive(Debug, Clone)]
pub struct FeedViewConfig {
    /// Initial limit selection. `None` means there is no selector.
    pub limit: Option<u32>,
    pub refresh_interval: Duration,
}

impl Default for FeedViewConfig {
    fn default() -> Self {
        Self {
            limit: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Work completed outside the view, delivered back to it.
#[derive(Debug)]
pub enum ViewEvent {
    /// The periodic timer fired
    Tick,
    /// A fetch finished
    Loaded {
        seq: u64,
        result: Result<Payload, FeedError>,
    },
    /// A new message was posted (or failed to)
    Submitted { result: Result<(), FeedError> },
}

pub struct MessageFeedView {
    source: Arc<dyn MessageSource>,
    config: FeedViewConfig,
    state: FeedState,
    content: ContainerContent,
    status: Option<String>,
    theme: Theme,
    expanded: bool,

    // Request bookkeeping
    latest_seq: u64,
    in_flight: Option<JoinHandle<()>>,
    timer: Option<JoinHandle<()>>,
    submit_task: Option<JoinHandle<()>>,
    submit_error: Option<String>,
    highlight_until: Option<Instant>,
    closed: bool,

    events_tx: mpsc::UnboundedSender<ViewEvent>,
    events_rx: mpsc::UnboundedReceiver<ViewEvent>,
}

impl MessageFeedView {
    pub fn new(source: Arc<dyn MessageSource>, config: FeedViewConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = FeedState::new(config.limit);

        Self {
            source,
            config,
            state,
            content: ContainerContent::Loading,
            status: None,
            theme: Theme::default(),
            expanded: false,

            latest_seq: 0,
            in_flight: None,
            timer: None,
            submit_task: None,
            submit_error: None,
            highlight_until: None,
            closed: false,

            events_tx,
            events_rx,
        }
    }

    /// Bootstrap host theming, load the feed once and arm the refresh timer.
    pub fn initialize(&mut self, host: Option<&dyn Host>) {
        if let Some(host) = host {
            host.ready();
            host.expand();
            self.expanded = true;
            self.apply_theme(Some(host));
        }

        self.refresh();
        self.arm_timer();
    }

    /// Resolve presentation colors from the host, or defaults without one.
    pub fn apply_theme(&mut self, host: Option<&dyn Host>) {
        let params = host.map(|h| h.theme_params());
        self.theme = theme::apply_theme(params.as_ref());
    }

    /// Start a new fetch, superseding any request still in flight.
    pub fn refresh(&mut self) {
        if self.closed {
            return;
        }

        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(seq = self.latest_seq, "superseding in-flight request");
            previous.abort();
        }

        self.latest_seq += 1;
        let seq = self.latest_seq;
        let limit = self.state.limit;

        self.state.is_loading = true;
        self.content = ContainerContent::Loading;

        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = source.fetch_messages(limit).await;
            let _ = tx.send(ViewEvent::Loaded { seq, result });
        }));
    }

    /// Refresh from the manual trigger. The trigger highlight is purely
    /// cosmetic and ends after [`REFRESH_HIGHLIGHT`] regardless of the fetch.
    pub fn press_refresh(&mut self) {
        self.highlight_until = Some(Instant::now() + REFRESH_HIGHLIGHT);
        self.refresh();
    }

    pub fn is_refresh_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }

    /// Change the limit selection and reload.
    pub fn set_limit(&mut self, limit: u32) {
        let limit = limit.max(1);
        if limit == self.state.limit {
            return;
        }
        self.state.limit = limit;
        self.refresh();
    }

    /// Post a new message. Only one submission runs at a time; a call made
    /// while one is pending is rejected so the caller keeps its draft.
    pub fn submit(&mut self, text: &str) -> Result<(), FeedError> {
        let text = text.trim();
        let rejection = if text.is_empty() {
            Some(EMPTY_SUBMISSION)
        } else if self.closed {
            Some(VIEW_CLOSED)
        } else if self.is_submitting() {
            Some(STILL_SENDING)
        } else {
            None
        };

        if let Some(reason) = rejection {
            let err = FeedError::Rejected(reason.to_string());
            self.submit_error = Some(err.to_string());
            return Err(err);
        }

        self.submit_error = None;
        let text = text.to_string();
        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        self.submit_task = Some(tokio::spawn(async move {
            let result = source.post_message(&text).await;
            let _ = tx.send(ViewEvent::Submitted { result });
        }));
        Ok(())
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_task.is_some()
    }

    /// Wait for the next timer tick or completed request.
    pub async fn next_event(&mut self) -> Option<ViewEvent> {
        self.events_rx.recv().await
    }

    pub fn handle(&mut self, event: ViewEvent) {
        if self.closed {
            return;
        }

        match event {
            ViewEvent::Tick => {
                // Ticks never supersede: a slow request is left to finish
                if self.in_flight.is_some() {
                    tracing::debug!(seq = self.latest_seq, "request outstanding, skipping periodic refresh");
                } else {
                    tracing::debug!("periodic refresh");
                    self.refresh();
                }
            }
            ViewEvent::Loaded { seq, result } => self.apply_result(seq, result),
            ViewEvent::Submitted { result } => {
                self.submit_task = None;
                match result {
                    Ok(()) => {
                        tracing::info!("message submitted");
                        self.refresh();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to submit message");
                        self.submit_error = Some(e.to_string());
                    }
                }
            }
        }
    }

    fn apply_result(&mut self, seq: u64, result: Result<Payload, FeedError>) {
        if seq != self.latest_seq || self.in_flight.is_none() {
            tracing::debug!(seq, latest = self.latest_seq, "discarding superseded response");
            return;
        }

        self.in_flight = None;
        self.state.is_loading = false;

        match result {
            Ok(payload) => {
                tracing::info!(count = payload.len(), limit = self.state.limit, "feed refreshed");
                self.content = ContainerContent::from_payload(payload, Utc::now());

                let now = Local::now();
                self.status = Some(format!("Оновлено о {}", format_clock(&now)));
                self.state.last_refresh = Some(now);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load messages");
                self.content = ContainerContent::Failed {
                    detail: e.to_string(),
                };
            }
        }
    }

    fn arm_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let period = self.config.refresh_interval.max(Duration::from_millis(1));
        let tx = self.events_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(ViewEvent::Tick).is_err() {
                    break;
                }
            }
        }));
    }

    /// Cancel the timer and any outstanding work. The view stays readable
    /// but ignores further events.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        for task in [
            self.timer.take(),
            self.in_flight.take(),
            self.submit_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
        tracing::debug!("feed view shut down");
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn content(&self) -> &ContainerContent {
        &self.content
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn limit(&self) -> u32 {
        self.state.limit
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }
}

impl Drop for MessageFeedView {
    fn drop(&mut self) {
        self.shutdown();
    }
}
