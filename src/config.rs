//! Client configuration files
//!
//! A [`ClientConfig`] is read from YAML (or JSON, which YAML accepts) and
//! turned into an [`HttpClientConfig`] plus the settings a [`ListClient`]
//! needs. Every field has a default, so an empty file is valid.
//!
//! ```yaml
//! base_url: https://management.azure.com
//! api_version: 2020-10-15-preview
//! timeout_secs: 30
//! max_retries: 3
//! backoff:
//!   type: exponential
//!   initial_ms: 100
//!   max_ms: 60000
//! rate_limit:
//!   requests_per_second: 10
//!   burst_size: 5
//! headers:
//!   Authorization: Bearer ...
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::pagination::ListClient;
use crate::scope::ScopePath;
use crate::types::{BackoffType, StringMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Public management endpoint used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://management.azure.com";

// ============================================================================
// Client Config
// ============================================================================

/// Settings for talking to one management endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Endpoint every request is sent to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `api-version` sent with the first request of a listing
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-attempt request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Optional client-side rate limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub headers: StringMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffConfig::default(),
            rate_limit: None,
            user_agent: None,
            headers: StringMap::new(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    crate::DEFAULT_API_VERSION.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60_000
}

// ============================================================================
// Loading
// ============================================================================

impl ClientConfig {
    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded client config");
        Self::from_str(&content)
    }

    /// Parse and validate config text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid base_url '{}': {e}", self.base_url)))?;
        if self.api_version.trim().is_empty() {
            return Err(Error::config("api_version must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        if self.backoff.initial_ms > self.backoff.max_ms {
            return Err(Error::config(format!(
                "backoff initial_ms ({}) exceeds max_ms ({})",
                self.backoff.initial_ms, self.backoff.max_ms
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Transport settings for these values
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            )
            .user_agent(
                self.user_agent
                    .clone()
                    .unwrap_or_else(|| crate::user_agent(&self.api_version)),
            );

        if let Some(rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }

    /// Build the production transport
    pub fn transport(&self) -> Result<Arc<HttpClient>> {
        Ok(Arc::new(HttpClient::with_config(self.http_config())?))
    }

    /// Build a listing client for the collection at `path`
    pub fn list_client<T>(&self, path: impl ScopePath + 'static) -> Result<ListClient<T>>
    where
        T: DeserializeOwned + 'static,
    {
        let client = ListClient::new(self.transport()?, &self.base_url, path)?
            .with_api_version(self.api_version.clone());
        Ok(client)
    }
}
