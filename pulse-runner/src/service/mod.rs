//! Service layer
//!
//! Services hold the sinks a job writes its poll outcomes to.
//!
//! All services are trait-based to enable testing and dependency injection.

mod logger;

// Re-export traits
pub use logger::Logger;

// Re-export implementations
pub use logger::{ConsoleLogger, InMemoryLogger, TracingLogger};
