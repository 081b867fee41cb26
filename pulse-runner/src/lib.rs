//! Pulse Runner
//!
//! A single-worker polling job that probes one resource at a fixed interval
//! and can be suspended and resumed while it runs.
//!
//! Architecture:
//! - Configuration: target, interval and sink settings
//! - Repository: the `ServerPoller` seam and its HTTP implementation
//! - Services: pluggable `Logger` sinks (console, tracing, in-memory)
//! - Scheduler: the `PollerJob` run loop and its suspend/resume controller

pub mod config;
pub mod repository;
pub mod scheduler;
pub mod service;
