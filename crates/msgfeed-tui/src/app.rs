use std::path::PathBuf;
use std::sync::Arc;

use msgfeed_core::feed::cycle_limit;
use msgfeed_core::{Host, MessageFeedView, StaticHost};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Composing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Feed
    pub view: MessageFeedView,
    pub host: Option<Arc<StaticHost>>,

    // Compose state
    pub compose_input: String,
    pub compose_cursor: usize, // cursor position in compose_input, in chars

    // Content scrolling
    pub content_scroll: u16,
    pub content_height: u16,
    pub total_content_lines: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    /// Where limit changes are persisted, if anywhere
    pub config_path: Option<PathBuf>,
}

impl App {
    pub fn new(view: MessageFeedView, host: Option<Arc<StaticHost>>, config_path: Option<PathBuf>) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,

            view,
            host,

            compose_input: String::new(),
            compose_cursor: 0,

            content_scroll: 0,
            content_height: 0,
            total_content_lines: 0,

            animation_frame: 0,

            config_path,
        }
    }

    /// Signal the host (if any), theme the view, load and arm the timer.
    pub fn start(&mut self) {
        let host = self.host.clone();
        self.view.initialize(host.as_deref().map(|h| h as &dyn Host));
    }

    pub fn refresh(&mut self) {
        self.content_scroll = 0;
        self.view.press_refresh();
    }

    /// Retry control of the error block.
    pub fn retry(&mut self) {
        if self.view.content().is_failed() {
            self.content_scroll = 0;
            self.view.refresh();
        }
    }

    pub fn change_limit(&mut self, forward: bool) {
        let limit = cycle_limit(self.view.limit(), forward);
        if limit == self.view.limit() {
            return;
        }

        self.content_scroll = 0;
        self.view.set_limit(limit);

        if let Some(path) = &self.config_path {
            if let Err(e) = Config::save_limit(path, limit) {
                tracing::warn!(error = %e, "could not persist limit");
            }
        }
    }

    pub fn start_composing(&mut self) {
        self.input_mode = InputMode::Composing;
    }

    pub fn cancel_composing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Send the compose line. The input is kept when it was rejected locally.
    pub fn submit_compose(&mut self) {
        if self.view.submit(&self.compose_input).is_ok() {
            self.compose_input.clear();
            self.compose_cursor = 0;
            self.input_mode = InputMode::Normal;
        }
    }

    // Content scrolling
    pub fn scroll_down(&mut self) {
        if self.content_scroll < self.total_content_lines.saturating_sub(self.content_height) {
            self.content_scroll = self.content_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.content_scroll = self.content_scroll.saturating_sub(1);
    }

    pub fn tick_animation(&mut self) {
        if self.view.state().is_loading || self.view.is_submitting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }

    pub fn shutdown(&mut self) {
        self.view.shutdown();
    }
}
