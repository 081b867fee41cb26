//! Core domain types
//!
//! These types describe a polling job from the outside: what state it is in,
//! what a single probe produced, and what ended up in the log.

pub mod job;
pub mod log;
pub mod poll;
