//! User-facing notifications.
//!
//! Fire-and-forget: the surface never waits on a notification or learns
//! whether it was shown. Hosts plug in their toast layer; the default just
//! forwards to `tracing`.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::cell::RefCell;

use tracing::{error, info};

/// Sink for messages shown to the user.
pub trait Notifier {
    fn error(&self, message: &str);
    fn success(&self, message: &str);
    fn info(&self, message: &str);
}

/// Forwards notifications to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        error!(%message, "notify");
    }

    fn success(&self, message: &str) {
        info!(%message, kind = "success", "notify");
    }

    fn info(&self, message: &str) {
        info!(%message, kind = "info", "notify");
    }
}

/// Severity of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Success,
    Info,
}

/// Keeps every notification in memory, oldest first.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.borrow().clone()
    }

    /// Messages recorded at `level`.
    #[must_use]
    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages.borrow().iter().filter(|(l, _)| *l == level).map(|(_, m)| m.clone()).collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.messages.borrow_mut().push((level, message.to_owned()));
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }
}
