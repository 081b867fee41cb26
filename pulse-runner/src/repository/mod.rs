//! Repository layer
//!
//! Repositories are stateless probes of the outside world. They issue one
//! request per call and carry no retry policy; the scheduler owns repetition.
//!
//! All repositories are trait-based to enable testing and mocking.

mod server;

// Re-export traits
pub use server::ServerPoller;

// Re-export implementations
pub use server::{HttpServerPoller, PollError};
