//! Transport abstraction
//!
//! The pagination engine only needs to issue GETs. Anything that can do
//! that (the real HTTP client, a service client wrapping it, or a scripted
//! fake in tests) implements [`Transport`].

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

/// A fully received HTTP response
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Final URL of the request (after redirects)
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl RawResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as lossy UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-2xx response into `Error::HttpStatus`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::http_status(self.status, self.text()))
        }
    }
}

/// Issues GET requests on behalf of the pagination engine
///
/// Implementations own retries, authentication and connection handling.
/// A returned error is fatal for the fetch step that issued it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with the given extra headers
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse> {
        (**self).get(url, headers).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse> {
        (**self).get(url, headers).await
    }
}

#[cfg(test)]
mod transport_tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> RawResponse {
        RawResponse {
            url: Url::parse("https://manila.example.com/v2/shares").unwrap(),
            status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_raw_response_success() {
        assert!(response(200, "{}").is_success());
        assert!(response(204, "").is_success());
        assert!(!response(301, "").is_success());
        assert!(!response(404, "").is_success());
    }

    #[test]
    fn test_raw_response_json() {
        let value: serde_json::Value = response(200, r#"{"shares": []}"#).json().unwrap();
        assert!(value["shares"].is_array());

        let err = response(200, "not json").json::<serde_json::Value>();
        assert!(matches!(err, Err(Error::JsonParse(_))));
    }

    #[test]
    fn test_error_for_status() {
        assert!(response(200, "{}").error_for_status().is_ok());

        let err = response(404, "itemNotFound").error_for_status().unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, ref body } if body == "itemNotFound"));
    }
}
