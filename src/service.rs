//! Service client for the shared file systems API
//!
//! Wraps an [`HttpClient`] with the service endpoint and the API
//! microversion, builds resource URLs and checks the status codes each
//! operation expects.

use crate::error::{Error, Result};
use crate::http::{HttpClient, RawResponse, RequestConfig, Transport};
use crate::pagination::{PageStrategy, Pager};
use crate::query::QueryBuilder;
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Header carrying the requested API microversion
pub const MICROVERSION_HEADER: &str = "X-OpenStack-Manila-API-Version";

/// HTTP client bound to one service endpoint
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Arc<HttpClient>,
    endpoint: Url,
    headers: HeaderMap,
}

impl ServiceClient {
    /// Bind `http` to `endpoint`, e.g. `https://manila:8786/v2/<project>`
    pub fn new(http: HttpClient, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::config(format!(
                "endpoint '{endpoint}' cannot be used as a base URL"
            )));
        }

        Ok(Self {
            http: Arc::new(http),
            endpoint,
            headers: HeaderMap::new(),
        })
    }

    /// Request a specific API microversion on every call
    pub fn with_microversion(mut self, version: &str) -> Result<Self> {
        let value = HeaderValue::from_str(version)
            .map_err(|_| Error::validation("microversion", format!("invalid value '{version}'")))?;
        self.headers
            .insert(HeaderName::from_static("x-openstack-manila-api-version"), value);
        Ok(self)
    }

    /// The service endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Microversion sent with every request, if any
    pub fn microversion(&self) -> Option<&str> {
        self.headers
            .get(MICROVERSION_HEADER)
            .and_then(|v| v.to_str().ok())
    }

    /// Endpoint with `parts` appended as path segments
    pub fn service_url(&self, parts: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("endpoint cannot be a base URL"))?
            .pop_if_empty()
            .extend(parts);
        Ok(url)
    }

    /// Resource URL with a list query applied
    pub fn list_url(&self, parts: &[&str], query: &QueryBuilder) -> Result<Url> {
        let mut url = self.service_url(parts)?;
        query.apply(&mut url);
        Ok(url)
    }

    /// Start a traversal of a paginated listing
    pub fn pager(&self, url: &Url, strategy: PageStrategy) -> Result<Pager<&Self>> {
        Pager::new(self, url.as_str(), strategy)
    }

    /// GET a single resource and decode the object under `root`
    pub async fn get_resource<T: DeserializeOwned>(&self, url: &Url, root: &str) -> Result<T> {
        let response = self.send(Method::GET, url, None, &[200]).await?;
        extract_root(&response, root)
    }

    /// POST `body` and decode the created object under `root`
    pub async fn create<T: DeserializeOwned>(
        &self,
        url: &Url,
        body: JsonValue,
        root: &str,
        ok_codes: &[u16],
    ) -> Result<T> {
        let response = self.send(Method::POST, url, Some(body), ok_codes).await?;
        extract_root(&response, root)
    }

    /// PUT `body` and decode the updated object under `root`
    pub async fn update<T: DeserializeOwned>(
        &self,
        url: &Url,
        body: JsonValue,
        root: &str,
    ) -> Result<T> {
        let response = self.send(Method::PUT, url, Some(body), &[200]).await?;
        extract_root(&response, root)
    }

    /// POST an action body, returning the raw response
    pub async fn action(&self, url: &Url, body: JsonValue, ok_codes: &[u16]) -> Result<RawResponse> {
        self.send(Method::POST, url, Some(body), ok_codes).await
    }

    /// DELETE a resource
    pub async fn delete(&self, url: &Url, ok_codes: &[u16]) -> Result<()> {
        self.send(Method::DELETE, url, None, ok_codes).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<JsonValue>,
        ok_codes: &[u16],
    ) -> Result<RawResponse> {
        debug!("{:?} {}", method, url);

        let mut config = RequestConfig::new()
            .headers(self.headers.clone())
            .ok_codes(ok_codes);
        if let Some(body) = body {
            config = config.json(body);
        }

        self.http.request(method, url.as_str(), config).await
    }
}

#[async_trait]
impl Transport for ServiceClient {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse> {
        let mut merged = self.headers.clone();
        merged.extend(headers.clone());
        Transport::get(self.http.as_ref(), url, &merged).await
    }
}

/// Decode the object nested under `root` in a response body
pub fn extract_root<T: DeserializeOwned>(response: &RawResponse, root: &str) -> Result<T> {
    let mut body: JsonValue = response
        .json()
        .map_err(|e| Error::decode(format!("invalid JSON from {}: {e}", response.url)))?;

    let inner = body
        .get_mut(root)
        .map(JsonValue::take)
        .ok_or_else(|| Error::decode(format!("response body has no '{root}' object")))?;

    serde_json::from_value(inner).map_err(|e| Error::decode(format!("invalid '{root}': {e}")))
}
