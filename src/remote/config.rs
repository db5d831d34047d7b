//! HTTP client configuration.

use std::time::Duration;

/// Public collection API host.
pub const DEFAULT_BASE_URL: &str = "https://collectionapi.metmuseum.org/";

/// Configuration for [`MetClient`](super::MetClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended to it.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// `User-Agent` header. The API rejects some anonymous clients.
    pub user_agent: String,
}

impl ClientConfig {
    /// Config for a given API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Full URL for an API path such as `public/collection/v1/departments`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("metropolitan/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_slashes() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("public/collection/v1/departments"),
            "https://collectionapi.metmuseum.org/public/collection/v1/departments"
        );

        let config = ClientConfig::new("http://127.0.0.1:9000");
        assert_eq!(
            config.endpoint("/public/collection/v1/objects/5"),
            "http://127.0.0.1:9000/public/collection/v1/objects/5"
        );
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("http://localhost")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
    }
}
