//! Runtime configuration for a tail.

use std::time::Duration;

/// Options for how a file is watched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailConfig {
    /// Poll the file at this interval instead of using kernel notifications.
    pub poll_interval: Option<Duration>,
}

impl TailConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the polling backend, checking the file every `interval`.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Polling compares mtimes in whole seconds, so contents are hashed too or
    /// an append landing in the same second as the last scan goes unseen.
    pub(crate) fn notify_config(&self) -> notify::Config {
        let config = notify::Config::default();
        match self.poll_interval {
            Some(interval) => config
                .with_poll_interval(interval)
                .with_compare_contents(true),
            None => config,
        }
    }
}
