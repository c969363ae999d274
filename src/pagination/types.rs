//! Pagination types and traits
//!
//! Defines the page abstraction shared by all strategies.

use super::pages::{LinkedPage, MarkerPage, OffsetPage, SinglePage};
use crate::error::{Error, Result};
use crate::http::RawResponse;
use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

/// One fetched page: where it came from, its status, headers and body
#[derive(Debug, Clone)]
pub struct PageResult {
    /// URL the page was fetched from
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded JSON body (key order preserved)
    pub body: Value,
}

impl PageResult {
    /// Decode a transport response into a page result.
    ///
    /// Non-2xx responses become `Error::HttpStatus`; an empty body decodes
    /// to `Value::Null` and is rejected later by the page variant.
    pub fn from_response(response: RawResponse) -> Result<Self> {
        let response = response.error_for_status()?;
        let body = if response.body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&response.body)
                .map_err(|e| Error::decode(format!("invalid JSON page from {}: {e}", response.url)))?
        };

        Ok(Self {
            url: response.url,
            status: response.status,
            headers: response.headers,
            body,
        })
    }
}

/// Capability set every pagination strategy implements
pub trait Page: Send + Sync + std::fmt::Debug {
    /// The page as fetched
    fn result(&self) -> &PageResult;

    /// Body field holding this page's item array
    fn items_key(&self) -> &str;

    /// Items on this page; `Error::Decode` if the body has no such array
    fn items(&self) -> Result<&[Value]> {
        items_array(&self.result().body, self.items_key())
    }

    /// Whether this page holds zero items
    fn is_empty(&self) -> Result<bool> {
        Ok(self.items()?.is_empty())
    }

    /// URL of the following page, `None` when this is the last one
    fn next_page_url(&self) -> Result<Option<String>>;
}

/// Look up `key` in `body` and require it to be an array
pub(crate) fn items_array<'a>(body: &'a Value, key: &str) -> Result<&'a [Value]> {
    match body.get(key) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(Error::decode(format!(
            "expected '{key}' to be an array, found {}",
            json_kind(other)
        ))),
        None => Err(Error::decode(format!(
            "response body has no '{key}' array"
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Which page variant a listing endpoint uses, and its parameters
///
/// Chosen once by the resource code and held by the pager for the whole
/// traversal. This is the context a page needs beyond its own response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStrategy {
    /// Everything arrives in one response
    Single {
        /// Body field holding the items
        items_key: String,
    },

    /// Body embeds `[{href, rel}]` links; `rel == "next"` continues
    Linked {
        /// Body field holding the items
        items_key: String,
        /// Body field holding the link objects
        links_key: String,
    },

    /// Re-issue the original request with a marker set to the last item's id
    Marker {
        /// Body field holding the items
        items_key: String,
        /// Query parameter carrying the marker
        marker_param: String,
        /// Item field whose value becomes the marker
        id_field: String,
    },

    /// Advance an offset query parameter by the page limit
    Offset {
        /// Body field holding the items
        items_key: String,
        /// Query parameter carrying the offset
        offset_param: String,
        /// Query parameter carrying the page size
        limit_param: String,
    },
}

impl PageStrategy {
    /// Single-page strategy
    pub fn single(items_key: impl Into<String>) -> Self {
        Self::Single {
            items_key: items_key.into(),
        }
    }

    /// Linked strategy using the conventional `<items_key>_links` field
    pub fn linked(items_key: impl Into<String>) -> Self {
        let items_key = items_key.into();
        let links_key = format!("{items_key}_links");
        Self::Linked {
            items_key,
            links_key,
        }
    }

    /// Marker strategy using `marker` and the item's `id`
    pub fn marker(items_key: impl Into<String>) -> Self {
        Self::Marker {
            items_key: items_key.into(),
            marker_param: "marker".to_string(),
            id_field: "id".to_string(),
        }
    }

    /// Offset strategy using `offset` and `limit`
    pub fn offset(items_key: impl Into<String>) -> Self {
        Self::Offset {
            items_key: items_key.into(),
            offset_param: "offset".to_string(),
            limit_param: "limit".to_string(),
        }
    }

    /// Body field holding the items, whatever the variant
    pub fn items_key(&self) -> &str {
        match self {
            Self::Single { items_key }
            | Self::Linked { items_key, .. }
            | Self::Marker { items_key, .. }
            | Self::Offset { items_key, .. } => items_key,
        }
    }

    /// Build the typed page for one fetched result.
    ///
    /// `initial_url` is the URL the traversal started from; marker pages
    /// derive every continuation from it.
    pub fn build(&self, initial_url: &Url, result: PageResult) -> Box<dyn Page> {
        match self {
            Self::Single { items_key } => Box::new(SinglePage::new(result, items_key)),
            Self::Linked {
                items_key,
                links_key,
            } => Box::new(LinkedPage::new(result, items_key, links_key)),
            Self::Marker {
                items_key,
                marker_param,
                id_field,
            } => Box::new(MarkerPage::new(
                result,
                initial_url.clone(),
                items_key,
                marker_param,
                id_field,
            )),
            Self::Offset {
                items_key,
                offset_param,
                limit_param,
            } => Box::new(OffsetPage::new(
                result,
                items_key,
                offset_param,
                limit_param,
            )),
        }
    }
}
