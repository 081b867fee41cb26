//! Pulse Core
//!
//! Core types shared by the Pulse status client and runner.
//!
//! This crate contains:
//! - Domain types: job lifecycle state, poll outcomes and log records

pub mod domain;
