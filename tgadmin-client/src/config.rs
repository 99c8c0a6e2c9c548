//! Client configuration: backend base URL and request timeout.

use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

/// Environment variable selecting the backend base URL.
pub const API_URL_ENV: &str = "TGADMIN_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path prefix of the versioned REST API.
pub const API_PREFIX: &str = "/api/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without the API prefix.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    /// Creates a configuration for a base URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Resolves the base URL: explicit value, then environment, then the
    /// configured value, then the default.
    pub fn resolve(explicit: Option<&str>, configured: Option<&str>) -> Self {
        let env = std::env::var(API_URL_ENV).ok();
        let (source, url) = pick_url(explicit, env.as_deref(), configured);
        debug!(source, url = %url, "Resolved API base URL");
        Self::new(url)
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API root (`{api_url}/api/v1`).
    pub fn api_root(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), API_PREFIX)
    }

    /// Parses the API root.
    pub fn api_root_url(&self) -> Result<Url, ApiError> {
        let url = Url::parse(&self.api_root()).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                self.api_url
            )));
        }
        Ok(url)
    }
}

fn pick_url<'a>(
    explicit: Option<&'a str>,
    env: Option<&'a str>,
    configured: Option<&'a str>,
) -> (&'static str, String) {
    let non_empty = |v: Option<&'a str>| v.map(str::trim).filter(|v| !v.is_empty());

    if let Some(url) = non_empty(explicit) {
        ("flag", url.to_string())
    } else if let Some(url) = non_empty(env) {
        ("env", url.to_string())
    } else if let Some(url) = non_empty(configured) {
        ("settings", url.to_string())
    } else {
        ("default", DEFAULT_API_URL.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
