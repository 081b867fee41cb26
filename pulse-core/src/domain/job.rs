//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle state of a polling job
///
/// `Running` and `Suspended` are the two states of the run loop itself.
/// `Idle` covers a job that was built but never started, `Stopped` a job
/// whose loop has exited after cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Idle,
    Running,
    Suspended,
    Stopped,
}

impl JobState {
    /// Returns true while a run loop exists for the job
    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Running | JobState::Suspended)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::Running => "running",
            JobState::Suspended => "suspended",
            JobState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Point-in-time description of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: Uuid,
    pub target: String,
    pub interval_ms: u64,
    pub state: JobState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(!JobState::Idle.is_active());
        assert!(JobState::Running.is_active());
        assert!(JobState::Suspended.is_active());
        assert!(!JobState::Stopped.is_active());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(JobState::Suspended.to_string(), "suspended");
        assert_eq!(JobState::Running.to_string(), "running");
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = JobSnapshot {
            id: Uuid::nil(),
            target: "http://madeup.website".to_string(),
            interval_ms: 20,
            state: JobState::Suspended,
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["target"], "http://madeup.website");
        assert_eq!(value["interval_ms"], 20);
        assert_eq!(value["state"], "Suspended");
    }
}
