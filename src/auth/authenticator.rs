//! Authenticator implementation
//!
//! Applies the configured credential to outgoing requests.

use super::types::{AuthConfig, Location};
use reqwest::RequestBuilder;

/// Header carrying a Keystone token
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,

            AuthConfig::Token { token } => req.header(AUTH_TOKEN_HEADER, token.as_str()),

            AuthConfig::ApiKey {
                location,
                header_name,
                query_param,
                value,
            } => match location {
                Location::Header => {
                    let header = header_name.as_deref().unwrap_or("X-API-Key");
                    req.header(header, value.as_str())
                }
                Location::Query => {
                    let param = query_param.as_deref().unwrap_or("api_key");
                    req.query(&[(param, value.as_str())])
                }
            },

            AuthConfig::Basic { username, password } => req.basic_auth(username, Some(password)),

            AuthConfig::Bearer { token } => req.bearer_auth(token),
        }
    }

    /// Get the auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
