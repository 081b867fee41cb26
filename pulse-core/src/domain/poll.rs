//! Poll outcome types

use serde::{Deserialize, Serialize};

/// Prefix of every line logged for a failed probe
pub const POLL_ERROR_PREFIX: &str = "Error trying to get state: ";

/// Result of one probe of the target resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollOutcome {
    /// The resource answered with this status text
    Status(String),
    /// The probe could not produce a status
    Failed(String),
}

impl PollOutcome {
    /// Renders the single log line for this outcome
    ///
    /// # Arguments
    /// * `resource` - Identifier of the polled resource, used on success only
    pub fn render(&self, resource: &str) -> String {
        match self {
            PollOutcome::Status(status) => format!("{} -- {}", resource, status),
            PollOutcome::Failed(cause) => format!("{}{}", POLL_ERROR_PREFIX, cause),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PollOutcome::Failed(_))
    }
}

impl<E: std::fmt::Display> From<Result<String, E>> for PollOutcome {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(status) => PollOutcome::Status(status),
            Err(e) => PollOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_status() {
        let outcome = PollOutcome::Status("200 OK".to_string());
        assert_eq!(outcome.render("madeup.website"), "madeup.website -- 200 OK");
    }

    #[test]
    fn test_render_failure_ignores_resource() {
        let outcome = PollOutcome::Failed("DNS probe failed".to_string());
        assert_eq!(
            outcome.render("error.website"),
            "Error trying to get state: DNS probe failed"
        );
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_from_result() {
        let ok: Result<String, String> = Ok("500 SERVER ERROR".to_string());
        assert_eq!(
            PollOutcome::from(ok),
            PollOutcome::Status("500 SERVER ERROR".to_string())
        );

        let err: Result<String, String> = Err("timed out".to_string());
        assert_eq!(
            PollOutcome::from(err),
            PollOutcome::Failed("timed out".to_string())
        );
    }
}
