//! Host integration context
//!
//! The embedding application may expose lifecycle signals and theme data to
//! the feed view. Running without a host is a normal mode of operation.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::theme::ThemeParams;

/// Capabilities offered by an embedding application.
pub trait Host: Send + Sync {
    /// The view has loaded and is ready to be shown.
    fn ready(&self);

    /// Ask the host to give the view its full available area.
    fn expand(&self);

    /// Theme colors supplied by the host.
    fn theme_params(&self) -> ThemeParams;
}

/// A host whose theme is fixed at construction, e.g. read from a config file.
#[derive(Debug, Default)]
pub struct StaticHost {
    params: ThemeParams,
    ready: AtomicBool,
    expanded: AtomicBool,
}

impl StaticHost {
    pub fn new(params: ThemeParams) -> Self {
        Self {
            params,
            ready: AtomicBool::new(false),
            expanded: AtomicBool::new(false),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.load(Ordering::Relaxed)
    }
}

impl Host for StaticHost {
    fn ready(&self) {
        tracing::debug!("host signalled ready");
        self.ready.store(true, Ordering::Relaxed);
    }

    fn expand(&self) {
        tracing::debug!("host signalled expand");
        self.expanded.store(true, Ordering::Relaxed);
    }

    fn theme_params(&self) -> ThemeParams {
        self.params.clone()
    }
}
