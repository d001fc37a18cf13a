//! Network reachability probes.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use url::Url;

/// Upper bound for a single [`TcpProbe`] attempt.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Answers whether the network is worth trying.
#[async_trait]
pub trait ConnectivityOracle: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Oracle with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticConnectivity(pub bool);

impl StaticConnectivity {
    #[must_use]
    pub const fn online() -> Self {
        Self(true)
    }

    #[must_use]
    pub const fn offline() -> Self {
        Self(false)
    }
}

#[async_trait]
impl ConnectivityOracle for StaticConnectivity {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}

/// Reports reachable when a TCP connection to `address` opens within `timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpProbe {
    /// `host:port` to connect to
    address: String,
    /// Upper bound for one connection attempt
    timeout: Duration,
}

impl TcpProbe {
    #[must_use]
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self { address: address.into(), timeout }
    }

    /// Probe the host and port a URL points at.
    ///
    /// Returns `None` when the URL has no host or no known default port.
    #[must_use]
    pub fn for_url(url: &Url, timeout: Duration) -> Option<Self> {
        let host = url.host_str()?;
        let port = url.port_or_known_default()?;
        Some(Self::new(format!("{host}:{port}"), timeout))
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl ConnectivityOracle for TcpProbe {
    async fn is_reachable(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!(address = %self.address, error = %e, "Connectivity probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(address = %self.address, "Connectivity probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://cdn.example.com/i18n/", Some("cdn.example.com:443"))]
    #[case("http://localhost:8080/translations/", Some("localhost:8080"))]
    #[case("http://10.0.0.2/", Some("10.0.0.2:80"))]
    #[case("file:///tmp/translations/", None)]
    fn for_url_derives_address(#[case] url: &str, #[case] expected: Option<&str>) {
        let probe = TcpProbe::for_url(&Url::parse(url).unwrap(), DEFAULT_PROBE_TIMEOUT);

        assert_that!(probe.as_ref().map(TcpProbe::address), eq(expected));
    }

    #[tokio::test]
    async fn static_connectivity_answers_fixed_value() {
        assert!(StaticConnectivity::online().is_reachable().await);
        assert!(!StaticConnectivity::offline().is_reachable().await);
    }

    #[tokio::test]
    async fn probe_reaches_listening_socket() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let probe = TcpProbe::new(address, DEFAULT_PROBE_TIMEOUT);

        assert!(probe.is_reachable().await);
    }

    #[tokio::test]
    async fn probe_reports_closed_port_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let probe = TcpProbe::new(address, DEFAULT_PROBE_TIMEOUT);

        assert!(!probe.is_reachable().await);
    }
}
