//! Pulse Runner
//!
//! Polls one resource at a fixed interval and logs every outcome until
//! interrupted. An optional scripted suspension pauses polling once,
//! then resumes it.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_runner::config::{Config, LogSinkKind};
use pulse_runner::repository::HttpServerPoller;
use pulse_runner::scheduler::PollerJob;
use pulse_runner::service::{ConsoleLogger, Logger, TracingLogger};

#[derive(Parser)]
#[command(name = "pulse-runner")]
#[command(about = "Periodically poll a resource and log its status", long_about = None)]
struct Cli {
    /// Resource to poll
    #[arg(long, env = "PULSE_TARGET", default_value = "http://localhost:8080")]
    target: String,

    /// Milliseconds between polls
    #[arg(long, env = "PULSE_INTERVAL_MS", default_value_t = 1000)]
    interval_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "PULSE_TIMEOUT_MS", default_value_t = 5000)]
    timeout_ms: u64,

    /// Suspend the job once after this many milliseconds
    #[arg(long, env = "PULSE_SUSPEND_AFTER_MS")]
    suspend_after_ms: Option<u64>,

    /// How long the scripted suspension lasts, in milliseconds
    #[arg(long, env = "PULSE_SUSPEND_FOR_MS", default_value_t = 5000)]
    suspend_for_ms: u64,

    /// Where poll outcomes are written
    #[arg(long, env = "PULSE_SINK", value_enum, default_value_t = LogSinkKind::Console)]
    sink: LogSinkKind,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.target)
            .with_poll_interval(Duration::from_millis(self.interval_ms))
            .with_request_timeout(Duration::from_millis(self.timeout_ms))
            .with_sink(self.sink);

        if let Some(after) = self.suspend_after_ms {
            config = config.with_suspend_window(
                Duration::from_millis(after),
                Duration::from_millis(self.suspend_for_ms),
            );
        }

        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_runner=info,pulse_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Cli::parse().into_config();
    config.validate()?;

    info!(
        "Loaded configuration: target={}, poll_interval={:?}, sink={:?}",
        config.target, config.poll_interval, config.sink
    );

    let poller = HttpServerPoller::from_config(&config)
        .with_context(|| format!("Failed to build HTTP poller for {}", config.target))?;

    let logger: Arc<dyn Logger> = match config.sink {
        LogSinkKind::Console => Arc::new(ConsoleLogger::stderr()),
        LogSinkKind::Tracing => Arc::new(TracingLogger::new(config.target.clone())),
    };

    let job = Arc::new(PollerJob::from_config(&config, Arc::new(poller), logger));
    job.start().context("Failed to start poller job")?;

    let script = config
        .suspend_after
        .map(|after| tokio::spawn(run_suspend_window(Arc::clone(&job), after, config.suspend_for)));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown requested");

    if let Some(script) = script {
        script.abort();
    }

    job.shutdown().await.context("Poller job did not stop cleanly")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&job.snapshot()).context("Failed to render job snapshot")?
    );

    Ok(())
}

/// Suspends the job after `after`, then resumes it `duration` later
async fn run_suspend_window(job: Arc<PollerJob>, after: Duration, duration: Duration) {
    tokio::time::sleep(after).await;

    if !job.state().is_active() {
        warn!("Job is {}, skipping scripted suspension", job.state());
        return;
    }

    info!("Suspending monitoring of {} for {:?}", job.target(), duration);
    if let Err(e) = job.suspend().await {
        warn!("Failed to suspend job: {}", e);
        return;
    }

    tokio::time::sleep(duration).await;

    info!("Resuming job");
    if let Err(e) = job.resume().await {
        warn!("Failed to resume job: {}", e);
    }
}
