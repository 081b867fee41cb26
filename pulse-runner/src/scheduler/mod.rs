//! Scheduler layer for the runner
//!
//! This layer owns the polling job: its run loop, the suspend/resume
//! protocol callers use to pause it, and its lifecycle from start to
//! shutdown.

mod control;
pub mod error;
pub mod job;

pub use error::JobError;
pub use job::PollerJob;
