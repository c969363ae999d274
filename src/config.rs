//! Client configuration
//!
//! Loaded from YAML, then overridden from the environment:
//!
//! ```yaml
//! endpoint: https://manila.example.com:8786/v2/16e1ab15c35a457e9c2b2aa189f544e1
//! microversion: "2.7"
//! auth:
//!   type: token
//!   token: gAAAAABk...
//! http:
//!   timeout_seconds: 30
//!   max_retries: 3
//!   backoff:
//!     type: exponential
//!     initial_ms: 100
//!     max_ms: 60000
//!   rate_limit:
//!     requests_per_second: 10
//!     burst_size: 10
//! ```
//!
//! `MANILA_ENDPOINT` replaces `endpoint` and `MANILA_TOKEN` replaces the
//! credential with a token.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::service::ServiceClient;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable overriding the endpoint
pub const ENV_ENDPOINT: &str = "MANILA_ENDPOINT";

/// Environment variable overriding the credential with a token
pub const ENV_TOKEN: &str = "MANILA_TOKEN";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Everything needed to build a [`ServiceClient`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service endpoint including the project path
    #[serde(default)]
    pub endpoint: String,

    /// API microversion requested on every call
    #[serde(default)]
    pub microversion: Option<String>,

    /// Credential
    #[serde(default)]
    pub auth: AuthConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Client-side rate limit; absent means unlimited
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffConfig::default(),
            rate_limit: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Retry backoff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Backoff type
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
    60000
}

// ============================================================================
// Loading
// ============================================================================

/// Load a config file, apply environment overrides and validate
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut config: ClientConfig = serde_yaml::from_str(&content)?;
    config.apply_env_overrides();
    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse and validate a YAML config; the environment is not consulted
pub fn load_config_from_str(yaml: &str) -> Result<ClientConfig> {
    let config: ClientConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

impl ClientConfig {
    /// Config pointing at `endpoint` with every other setting defaulted
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Apply `MANILA_ENDPOINT` / `MANILA_TOKEN` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.is_empty()) {
            debug!("Endpoint overridden by {}", ENV_ENDPOINT);
            self.endpoint = endpoint;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            debug!("Credential overridden by {}", ENV_TOKEN);
            self.auth = AuthConfig::token(token);
        }
    }

    /// Check the config can build a working client
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(Error::config(format!(
                "endpoint is required (set it in the config file or {ENV_ENDPOINT})"
            )));
        }

        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| Error::config(format!("invalid endpoint '{}': {}", self.endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "endpoint must be http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        if self.http.timeout_seconds == 0 {
            return Err(Error::config("http.timeout_seconds must be greater than zero"));
        }
        if self.http.backoff.initial_ms > self.http.backoff.max_ms {
            return Err(Error::config(
                "http.backoff.initial_ms cannot exceed http.backoff.max_ms",
            ));
        }
        if let Some(limit) = &self.http.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::config(
                    "http.rate_limit.requests_per_second must be greater than zero",
                ));
            }
        }
        if matches!(&self.microversion, Some(v) if v.trim().is_empty()) {
            return Err(Error::config("microversion cannot be empty"));
        }

        Ok(())
    }

    /// Settings for the underlying [`HttpClient`]
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff.backoff_type,
                Duration::from_millis(self.http.backoff.initial_ms),
                Duration::from_millis(self.http.backoff.max_ms),
            )
            .auth(self.auth.clone());

        builder = match &self.http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        builder.build()
    }

    /// Build a service client from this config
    pub fn build_client(&self) -> Result<ServiceClient> {
        self.validate()?;
        let http = HttpClient::with_config(self.http_client_config())?;
        let client = ServiceClient::new(http, &self.endpoint)?;
        match &self.microversion {
            Some(version) => client.with_microversion(version),
            None => Ok(client),
        }
    }
}
