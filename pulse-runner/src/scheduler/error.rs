//! Scheduler error types

use thiserror::Error;

/// Errors returned by job lifecycle and control operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("job has already been started")]
    AlreadyStarted,

    #[error("job has not been started")]
    NotStarted,

    #[error("no tokio runtime to run the job on")]
    NoRuntime,

    #[error("job is already suspended")]
    AlreadySuspended,

    #[error("job is not suspended")]
    NotSuspended,

    /// The run loop has exited, or exits before answering
    #[error("job has stopped")]
    Stopped,

    #[error("job task panicked: {0}")]
    Panicked(String),
}
