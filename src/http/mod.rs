//! HTTP client module
//!
//! Provides the transport the pagination engine consumes, plus the
//! reqwest-based implementation with retry, rate limiting and backoff.
//!
//! # Features
//!
//! - **Transport trait**: "GET a URL, get back status, headers and body"
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Credentials from the auth module on every request

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{RawResponse, Transport};

#[cfg(test)]
mod tests;
