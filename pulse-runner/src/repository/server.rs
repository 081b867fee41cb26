//! Server repository
//!
//! Probes the monitored resource once per call and reports its status text.

use async_trait::async_trait;
use pulse_client::{ClientError, StatusClient};
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Why a probe produced no status
#[derive(Debug, Error)]
pub enum PollError {
    /// The HTTP client could not obtain a response
    #[error(transparent)]
    Probe(#[from] ClientError),

    /// Any other probe failure, described by its cause
    #[error("{0}")]
    Other(String),
}

impl PollError {
    pub fn other(cause: impl Into<String>) -> Self {
        Self::Other(cause.into())
    }
}

/// Repository trait for probing the monitored resource
#[async_trait]
pub trait ServerPoller: Send + Sync {
    /// Probes the resource once
    ///
    /// # Returns
    /// The status text reported by the resource (e.g., "200 OK")
    async fn poll_server(&self) -> Result<String, PollError>;
}

/// HTTP implementation of ServerPoller
pub struct HttpServerPoller {
    client: StatusClient,
}

impl HttpServerPoller {
    /// Creates a new HTTP server poller
    ///
    /// # Arguments
    /// * `target` - Resource to GET on every poll
    /// * `timeout` - Upper bound for a single request
    pub fn new(target: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: StatusClient::new(target, timeout)?,
        })
    }

    /// Creates a poller for the target and timeout in `config`
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(&config.target, config.request_timeout)
    }

    pub fn url(&self) -> &str {
        self.client.url()
    }
}

#[async_trait]
impl ServerPoller for HttpServerPoller {
    async fn poll_server(&self) -> Result<String, PollError> {
        let status = self.client.probe().await?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::domain::poll::{POLL_ERROR_PREFIX, PollOutcome};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_other_error_displays_cause() {
        let err = PollError::other("DNS probe failed");
        assert_eq!(err.to_string(), "DNS probe failed");
    }

    #[test]
    fn test_from_config_normalises_target() {
        let config = Config::new("madeup.website/");
        let poller = HttpServerPoller::from_config(&config).unwrap();
        assert_eq!(poller.url(), "http://madeup.website");
    }

    #[tokio::test]
    async fn test_poll_server_returns_status() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await;
        });

        let poller = HttpServerPoller::new(&addr.to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(poller.poll_server().await.unwrap(), "200 OK");
    }

    #[tokio::test]
    async fn test_poll_server_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let poller = HttpServerPoller::new(&addr.to_string(), Duration::from_secs(5)).unwrap();
        let err = poller.poll_server().await.unwrap_err();
        assert!(matches!(err, PollError::Probe(ClientError::RequestFailed(_))));

        let line = PollOutcome::from(Err::<String, _>(&err)).render("unreachable.website");

        // The logged line names the cause, not just the URL
        let url = format!("http://{}/", addr);
        let cause = line
            .strip_prefix(POLL_ERROR_PREFIX)
            .unwrap()
            .replace(&url, "");
        assert!(cause.to_lowercase().contains("refused"), "line: {}", line);
    }
}
