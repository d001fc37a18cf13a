//! Remote translation source.

use async_trait::async_trait;
use thiserror::Error;

/// Status line and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Transport-level failure. Never reaches callers of the engine.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote source unavailable: {0}")]
    Unavailable(String),
}

/// Performs a GET request for a URL.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// # Errors
    /// Returns an error on transport failure. Non-200 statuses are not errors.
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// [`RemoteFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Shared connection pool
    client: reqwest::Client,
}

impl HttpFetcher {
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        tracing::debug!(%url, status, bytes = body.len(), "Response received");
        Ok(FetchResponse { status, body: body.to_vec() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(200, true)]
    #[case(204, false)]
    #[case(304, false)]
    #[case(500, false)]
    fn only_200_is_ok(#[case] status: u16, #[case] expected: bool) {
        assert_that!(FetchResponse::new(status, "{}").is_ok(), eq(expected));
    }

    #[tokio::test]
    async fn connection_refused_is_an_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.get(&format!("http://127.0.0.1:{port}/en")).await;

        assert_that!(result, err(anything()));
    }
}
