//! Poller job
//!
//! Probes one resource at a fixed interval on a dedicated task and logs the
//! outcome of every probe. The loop checks for cancellation and for a
//! pending suspend request only between polls; neither a poll nor the
//! interval sleep is interrupted by a suspend.

use pulse_core::domain::job::{JobSnapshot, JobState};
use pulse_core::domain::poll::PollOutcome;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::control::{ControlRequest, Controller};
use super::error::JobError;
use crate::config::Config;
use crate::repository::ServerPoller;
use crate::service::Logger;

/// Single-worker polling job
///
/// The poller and logger are fixed at construction. To poll with different
/// collaborators, build a new job.
pub struct PollerJob {
    id: Uuid,
    target: String,
    interval: Duration,
    poller: Arc<dyn ServerPoller>,
    logger: Arc<dyn Logger>,
    controller: Controller,
    cancel: CancellationToken,
    /// Loop-side channel ends, taken by the first `start`
    pending: Mutex<Option<LoopChannels>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct LoopChannels {
    control: mpsc::Receiver<ControlRequest>,
    state: watch::Sender<JobState>,
}

impl PollerJob {
    /// Creates a new, not yet started job
    ///
    /// # Arguments
    /// * `target` - Resource identifier used in every success line
    /// * `interval` - Sleep between the end of one poll and the next
    /// * `poller` - Probe invoked once per cycle
    /// * `logger` - Sink receiving one line per cycle
    pub fn new(
        target: impl Into<String>,
        interval: Duration,
        poller: Arc<dyn ServerPoller>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::channel(1);
        let (state_tx, state_rx) = watch::channel(JobState::Idle);

        Self {
            id: Uuid::new_v4(),
            target: target.into(),
            interval,
            poller,
            logger,
            controller: Controller::new(control_tx, state_rx),
            cancel: CancellationToken::new(),
            pending: Mutex::new(Some(LoopChannels {
                control: control_rx,
                state: state_tx,
            })),
            task: Mutex::new(None),
        }
    }

    /// Creates a job for the target and interval in `config`
    pub fn from_config(
        config: &Config,
        poller: Arc<dyn ServerPoller>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self::new(config.target.clone(), config.poll_interval, poller, logger)
    }

    /// Ties the job to `parent`: cancelling the parent stops the job
    ///
    /// Stopping the job does not cancel the parent.
    pub fn with_cancellation_token(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> JobState {
        self.controller.state()
    }

    /// Token that stops the run loop when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            target: self.target.clone(),
            interval_ms: self.interval.as_millis() as u64,
            state: self.state(),
        }
    }

    /// Spawns the run loop on the current tokio runtime
    ///
    /// A job runs at most once: a second call fails with `AlreadyStarted`,
    /// and a job shut down before it was started fails with `Stopped`.
    /// Called outside a runtime it fails with `NoRuntime` and can be
    /// retried from inside one.
    pub fn start(&self) -> Result<(), JobError> {
        if self.cancel.is_cancelled() {
            return Err(JobError::Stopped);
        }

        let runtime = Handle::try_current().map_err(|_| JobError::NoRuntime)?;

        let channels = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(JobError::AlreadyStarted)?;

        // Publish before spawning so control calls made right after
        // `start` returns see a started job
        channels.state.send_replace(JobState::Running);

        let run_loop = RunLoop {
            id: self.id,
            target: self.target.clone(),
            interval: self.interval,
            poller: Arc::clone(&self.poller),
            logger: Arc::clone(&self.logger),
            control: channels.control,
            state: channels.state,
            cancel: self.cancel.clone(),
        };

        let handle = runtime.spawn(run_loop.run());
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        Ok(())
    }

    /// Pauses the run loop at its next iteration boundary
    ///
    /// Returns once the loop is suspended, which may take up to one interval.
    pub async fn suspend(&self) -> Result<(), JobError> {
        self.controller.suspend().await
    }

    /// Continues a suspended run loop
    ///
    /// Returns once the loop has left the suspended state.
    pub async fn resume(&self) -> Result<(), JobError> {
        self.controller.resume().await
    }

    /// Cancels the run loop and waits for its task to finish
    ///
    /// Safe to call more than once and on a job that was never started.
    pub async fn shutdown(&self) -> Result<(), JobError> {
        self.cancel.cancel();

        if let Some(channels) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            channels.state.send_replace(JobState::Stopped);
        }

        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(handle) = handle else {
            return Ok(());
        };

        match handle.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_panic() => {
                let payload = e.into_panic();
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(JobError::Panicked(message))
            }
            Err(_) => Ok(()),
        }
    }
}

impl Drop for PollerJob {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// State owned by the spawned task
struct RunLoop {
    id: Uuid,
    target: String,
    interval: Duration,
    poller: Arc<dyn ServerPoller>,
    logger: Arc<dyn Logger>,
    control: mpsc::Receiver<ControlRequest>,
    state: watch::Sender<JobState>,
    cancel: CancellationToken,
}

impl RunLoop {
    async fn run(mut self) {
        info!(
            job_id = %self.id,
            "Starting poller job for {} (interval: {:?})", self.target, self.interval
        );

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            match self.control.try_recv() {
                Ok(ControlRequest::Suspend { ack }) => {
                    self.state.send_replace(JobState::Suspended);

                    // The caller gave up before the boundary; keep polling
                    if ack.send(Ok(())).is_err() {
                        self.state.send_replace(JobState::Running);
                        debug!(job_id = %self.id, "Suspend request abandoned, still running");
                        continue;
                    }
                    info!(job_id = %self.id, "Job suspended");

                    if !self.wait_for_resume().await {
                        break;
                    }
                    continue;
                }
                Ok(ControlRequest::Resume { ack }) => {
                    let _ = ack.send(Err(JobError::NotSuspended));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = self.poll_once() => {}
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = time::sleep(self.interval) => {}
            }
        }

        self.state.send_replace(JobState::Stopped);
        info!(job_id = %self.id, "Poller job stopped");
    }

    /// Runs one poll cycle: probe, render, log
    async fn poll_once(&self) {
        let outcome = PollOutcome::from(self.poller.poll_server().await);

        let line = outcome.render(&self.target);

        if outcome.is_failure() {
            warn!(job_id = %self.id, "{}", line);
        } else {
            debug!(job_id = %self.id, "{}", line);
        }

        self.logger.log(&line);
    }

    /// Blocks while suspended
    ///
    /// Returns true once resumed, false if the loop should exit instead.
    async fn wait_for_resume(&mut self) -> bool {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return false,
                request = self.control.recv() => match request {
                    Some(ControlRequest::Resume { ack }) => {
                        self.state.send_replace(JobState::Running);
                        let _ = ack.send(Ok(()));
                        info!(job_id = %self.id, "Job resumed");
                        return true;
                    }
                    Some(ControlRequest::Suspend { ack }) => {
                        let _ = ack.send(Err(JobError::AlreadySuspended));
                    }
                    None => return false,
                },
            }
        }
    }
}
