//! Client configuration.

use crate::retry::RetryPolicy;
use std::time::Duration;

pub const API_BASE: &str = "https://api.genius.com";
pub const WEB_BASE: &str = "https://genius.com";
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Text genius.com shows on its 404 page.
pub const NOT_FOUND_MARKER: &str = "Page not found";

/// Settings for [`GeniusClient`](crate::GeniusClient).
///
/// ```
/// use genius_api::{ClientConfig, RetryPolicy};
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .timeout(Duration::from_secs(10))
///     .retry(RetryPolicy::new(5));
/// assert_eq!(config.retry.max_attempts, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API root, without trailing slash.
    pub api_base: String,
    /// Website root used for scraping song pages.
    pub web_base: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// A fetched page containing this text is treated as "page not found".
    pub not_found_marker: String,
    /// Retry ceiling for lyrics scraping.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_owned(),
            web_base: WEB_BASE.to_owned(),
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_owned(),
            not_found_marker: NOT_FOUND_MARKER.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn web_base(mut self, url: impl Into<String>) -> Self {
        self.web_base = url.into().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn not_found_marker(mut self, marker: impl Into<String>) -> Self {
        self.not_found_marker = marker.into();
        self
    }

    #[must_use]
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urls_lose_trailing_slash() {
        let c = ClientConfig::default()
            .api_base("http://localhost:8080/")
            .web_base("http://localhost:8081//");
        assert_eq!(c.api_base, "http://localhost:8080");
        assert_eq!(c.web_base, "http://localhost:8081");
    }

    #[test]
    fn defaults() {
        let c = ClientConfig::default();
        assert_eq!(c.api_base, API_BASE);
        assert_eq!(c.timeout, Duration::from_secs(30));
        assert_eq!(c.retry, RetryPolicy::default());
    }
}
