//! Error types for the Pulse status client

use std::error::Error as StdError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while probing a resource
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// HTTP request failed before a response was received
    ///
    /// The message carries the whole cause chain, since reqwest's own
    /// message names only the URL.
    #[error("{}", cause_chain(.0))]
    RequestFailed(reqwest::Error),

    /// The target could not be turned into a request URL
    #[error("invalid target URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Check if this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Joins an error and its sources with ": ", skipping repeated messages
fn cause_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut last = message.clone();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if text != last && !last.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
            last = text;
        }
        source = cause.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::time::Duration;

    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source.as_deref().map(|s| s as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_timeout_message() {
        let err = ClientError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "request timed out after 250ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_invalid_url_message() {
        let err = ClientError::InvalidUrl("ftp://nope".to_string());
        assert_eq!(err.to_string(), "invalid target URL: ftp://nope");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_cause_chain_joins_sources() {
        let err = Layer {
            message: "error sending request",
            source: Some(Box::new(Layer {
                message: "tcp connect error",
                source: Some(Box::new(Layer {
                    message: "Connection refused",
                    source: None,
                })),
            })),
        };

        assert_eq!(
            cause_chain(&err),
            "error sending request: tcp connect error: Connection refused"
        );
    }

    #[test]
    fn test_cause_chain_skips_repeats() {
        let err = Layer {
            message: "client error (Connect)",
            source: Some(Box::new(Layer {
                message: "client error (Connect)",
                source: None,
            })),
        };

        assert_eq!(cause_chain(&err), "client error (Connect)");
    }
}
