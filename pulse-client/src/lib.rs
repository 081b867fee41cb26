//! Pulse HTTP Client
//!
//! A small, typed HTTP client that probes one resource and reports the
//! status line it answered with.
//!
//! # Example
//!
//! ```no_run
//! use pulse_client::StatusClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> pulse_client::Result<()> {
//!     let client = StatusClient::new("example.com", Duration::from_secs(5))?;
//!
//!     let status = client.probe().await?;
//!     println!("{} -- {}", client.url(), status);
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ClientError, Result};

use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

/// HTTP client bound to a single target resource
///
/// Every call to [`probe`](Self::probe) issues exactly one GET request.
/// Retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct StatusClient {
    /// Normalised target URL (e.g., "http://localhost:8080")
    url: String,
    /// Per-request timeout
    timeout: Duration,
    /// HTTP client instance
    client: Client,
}

impl StatusClient {
    /// Create a new status client
    ///
    /// # Arguments
    /// * `target` - Resource to probe; a bare host gets an `http://` scheme
    /// * `timeout` - Upper bound for a single request
    ///
    /// # Example
    /// ```
    /// use pulse_client::StatusClient;
    /// use std::time::Duration;
    ///
    /// let client = StatusClient::new("localhost:8080/", Duration::from_secs(1)).unwrap();
    /// assert_eq!(client.url(), "http://localhost:8080");
    /// ```
    pub fn new(target: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::RequestFailed)?;

        Self::with_client(target, timeout, client)
    }

    /// Create a new status client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. The timeout
    /// is only used to describe [`ClientError::Timeout`]; configure the
    /// actual deadline on `client`.
    pub fn with_client(target: impl AsRef<str>, timeout: Duration, client: Client) -> Result<Self> {
        Ok(Self {
            url: normalize_target(target.as_ref())?,
            timeout,
            client,
        })
    }

    /// Get the normalised target URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probe the target once and return its status line (e.g., "200 OK")
    ///
    /// Any response counts as a successful probe, including 4xx and 5xx;
    /// only a failure to obtain a response is an error.
    pub async fn probe(&self) -> Result<String> {
        debug!("Probing {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        Ok(response.status().to_string())
    }

    fn map_request_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else {
            ClientError::RequestFailed(err)
        }
    }
}

/// Turns a target identifier into a request URL
///
/// Bare hosts are given an `http://` scheme and trailing slashes are dropped.
/// Only http and https targets are accepted.
pub fn normalize_target(target: &str) -> Result<String> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl(target.to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).map_err(|_| ClientError::InvalidUrl(target.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ClientError::InvalidUrl(target.to_string()));
    }

    Ok(candidate.trim_end_matches('/').to_string())
}
