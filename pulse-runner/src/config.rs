//! Runner configuration
//!
//! Defines the configurable parameters of a polling job: what to poll,
//! how often, how long a single probe may take, and where lines are logged.

use anyhow::Context;
use std::time::Duration;

/// Destination for the lines a job logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogSinkKind {
    /// Timestamped lines on stderr
    #[default]
    Console,
    /// INFO events through the tracing subscriber
    Tracing,
}

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Resource to poll (e.g., "http://localhost:8080" or a bare host)
    pub target: String,

    /// Pause between the end of one poll and the start of the next
    pub poll_interval: Duration,

    /// Upper bound for a single HTTP probe
    pub request_timeout: Duration,

    /// When set, the runner suspends the job once after this delay
    pub suspend_after: Option<Duration>,

    /// How long a scripted suspension lasts
    pub suspend_for: Duration,

    /// Where poll outcomes are written
    pub sink: LogSinkKind,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
            suspend_after: None,
            suspend_for: Duration::from_secs(5),
            sink: LogSinkKind::Console,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Schedules one suspension of `duration`, starting `after` the job starts
    pub fn with_suspend_window(mut self, after: Duration, duration: Duration) -> Self {
        self.suspend_after = Some(after);
        self.suspend_for = duration;
        self
    }

    pub fn with_sink(mut self, sink: LogSinkKind) -> Self {
        self.sink = sink;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.target.trim().is_empty() {
            anyhow::bail!("target cannot be empty");
        }

        pulse_client::normalize_target(&self.target)
            .with_context(|| format!("target '{}' must be an http or https URL", self.target))?;

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
