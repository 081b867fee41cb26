//! Log domain types

use serde::{Deserialize, Serialize};

/// A rendered line written by a job, with the time it was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub message: String,
}

impl LogRecord {
    /// Creates a record stamped with the current time
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            message: message.into(),
        }
    }
}
