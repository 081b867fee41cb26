//! Suspend/resume controller
//!
//! Callers and the run loop meet over a bounded channel. Every request
//! carries a one-shot reply, and the loop answers only after it has
//! committed to the new state, so `suspend` and `resume` return at the
//! rendezvous rather than when the request is queued.

use pulse_core::domain::job::JobState;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tracing::debug;

use super::error::JobError;

pub(crate) type Ack = oneshot::Sender<Result<(), JobError>>;

/// Request delivered to the run loop
pub(crate) enum ControlRequest {
    Suspend { ack: Ack },
    Resume { ack: Ack },
}

/// Caller-side half of the protocol
///
/// Requests are serialised through `gate`, so at most one is ever
/// outstanding. Misuse is rejected from the published state before
/// anything is sent.
pub(crate) struct Controller {
    sender: mpsc::Sender<ControlRequest>,
    state: watch::Receiver<JobState>,
    gate: Mutex<()>,
}

impl Controller {
    pub(crate) fn new(sender: mpsc::Sender<ControlRequest>, state: watch::Receiver<JobState>) -> Self {
        Self {
            sender,
            state,
            gate: Mutex::new(()),
        }
    }

    /// Last state published by the job
    ///
    /// A closed channel means the loop is gone, even if it died before
    /// publishing `Stopped`.
    pub(crate) fn state(&self) -> JobState {
        if self.state.has_changed().is_err() {
            return JobState::Stopped;
        }
        *self.state.borrow()
    }

    pub(crate) async fn suspend(&self) -> Result<(), JobError> {
        let _guard = self.gate.lock().await;

        match self.state() {
            JobState::Idle => return Err(JobError::NotStarted),
            JobState::Stopped => return Err(JobError::Stopped),
            JobState::Suspended => return Err(JobError::AlreadySuspended),
            JobState::Running => {}
        }

        debug!("Requesting suspend");
        self.request(|ack| ControlRequest::Suspend { ack }).await
    }

    pub(crate) async fn resume(&self) -> Result<(), JobError> {
        let _guard = self.gate.lock().await;

        match self.state() {
            JobState::Idle => return Err(JobError::NotStarted),
            JobState::Stopped => return Err(JobError::Stopped),
            JobState::Running => return Err(JobError::NotSuspended),
            JobState::Suspended => {}
        }

        debug!("Requesting resume");
        self.request(|ack| ControlRequest::Resume { ack }).await
    }

    /// Sends one request and waits for the loop to answer it
    ///
    /// A loop that exits first drops both the receiver and the reply
    /// sender, which reads as `Stopped` here.
    async fn request(&self, make: impl FnOnce(Ack) -> ControlRequest) -> Result<(), JobError> {
        let (ack, reply) = oneshot::channel();

        self.sender
            .send(make(ack))
            .await
            .map_err(|_| JobError::Stopped)?;

        reply.await.map_err(|_| JobError::Stopped)?
    }
}
