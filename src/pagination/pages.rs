//! Page variants
//!
//! Each variant handles a specific pagination pattern.

use super::types::{json_kind, Page, PageResult};
use crate::error::{Error, Result};
use serde_json::Value;
use url::Url;

// ============================================================================
// Single Page
// ============================================================================

/// A response that already holds the whole collection
#[derive(Debug, Clone)]
pub struct SinglePage {
    result: PageResult,
    items_key: String,
}

impl SinglePage {
    /// Wrap a fetched result
    pub fn new(result: PageResult, items_key: impl Into<String>) -> Self {
        Self {
            result,
            items_key: items_key.into(),
        }
    }
}

impl Page for SinglePage {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn items_key(&self) -> &str {
        &self.items_key
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

// ============================================================================
// Linked Page
// ============================================================================

/// Next page URL embedded in the body as a link object
///
/// ```json
/// {
///   "shares": [...],
///   "shares_links": [{"href": "https://.../shares?marker=abc", "rel": "next"}]
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LinkedPage {
    result: PageResult,
    items_key: String,
    links_key: String,
}

impl LinkedPage {
    /// Wrap a fetched result
    pub fn new(
        result: PageResult,
        items_key: impl Into<String>,
        links_key: impl Into<String>,
    ) -> Self {
        Self {
            result,
            items_key: items_key.into(),
            links_key: links_key.into(),
        }
    }
}

impl Page for LinkedPage {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn items_key(&self) -> &str {
        &self.items_key
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        let links = match self.result.body.get(&self.links_key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(links)) => links,
            Some(other) => {
                return Err(Error::decode(format!(
                    "expected '{}' to be an array of links, found {}",
                    self.links_key,
                    json_kind(other)
                )))
            }
        };

        for link in links {
            let Value::Object(link) = link else {
                return Err(Error::decode(format!(
                    "entries of '{}' must be objects, found {}",
                    self.links_key,
                    json_kind(link)
                )));
            };

            if link.get("rel").and_then(Value::as_str) != Some("next") {
                continue;
            }

            return match link.get("href") {
                Some(Value::String(href)) if href.is_empty() => Ok(None),
                Some(Value::String(href)) => Ok(Some(href.clone())),
                _ => Err(Error::decode(format!(
                    "'next' link in '{}' has no string href",
                    self.links_key
                ))),
            };
        }

        Ok(None)
    }
}

// ============================================================================
// Marker Page
// ============================================================================

/// Continuation keyed by the last item's identifier
///
/// The next URL is the initial listing URL with the marker parameter set
/// to the id of the last item on this page. Every other query pair is
/// kept as the caller's filters produced it.
#[derive(Debug, Clone)]
pub struct MarkerPage {
    result: PageResult,
    initial_url: Url,
    items_key: String,
    marker_param: String,
    id_field: String,
}

impl MarkerPage {
    /// Wrap a fetched result
    pub fn new(
        result: PageResult,
        initial_url: Url,
        items_key: impl Into<String>,
        marker_param: impl Into<String>,
        id_field: impl Into<String>,
    ) -> Self {
        Self {
            result,
            initial_url,
            items_key: items_key.into(),
            marker_param: marker_param.into(),
            id_field: id_field.into(),
        }
    }

    /// Identifier of the last item on this page
    pub fn last_marker(&self) -> Result<Option<String>> {
        let Some(last) = self.items()?.last() else {
            return Ok(None);
        };

        match last.get(&self.id_field) {
            Some(Value::String(id)) => Ok(Some(id.clone())),
            Some(Value::Number(id)) => Ok(Some(id.to_string())),
            Some(other) => Err(Error::decode(format!(
                "marker field '{}' must be a string or number, found {}",
                self.id_field,
                json_kind(other)
            ))),
            None => Err(Error::decode(format!(
                "last item in '{}' has no '{}' field",
                self.items_key, self.id_field
            ))),
        }
    }
}

impl Page for MarkerPage {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn items_key(&self) -> &str {
        &self.items_key
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        let Some(marker) = self.last_marker()? else {
            return Ok(None);
        };

        let url = with_query_param(&self.initial_url, &self.marker_param, &marker);
        Ok(Some(url.into()))
    }
}

// ============================================================================
// Offset Page
// ============================================================================

/// Offset/limit pagination
///
/// Reads `offset` and `limit` from the URL this page was fetched from.
/// Without a limit the server returned everything. A page shorter than
/// the limit is the last one; otherwise the offset advances by the limit.
#[derive(Debug, Clone)]
pub struct OffsetPage {
    result: PageResult,
    items_key: String,
    offset_param: String,
    limit_param: String,
}

impl OffsetPage {
    /// Wrap a fetched result
    pub fn new(
        result: PageResult,
        items_key: impl Into<String>,
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
    ) -> Self {
        Self {
            result,
            items_key: items_key.into(),
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
        }
    }

    fn query_number(&self, key: &str) -> Result<Option<usize>> {
        let Some((_, value)) = self.result.url.query_pairs().find(|(k, _)| k == key) else {
            return Ok(None);
        };
        value.parse().map(Some).map_err(|_| {
            Error::decode(format!("query parameter '{key}' is not a number: {value}"))
        })
    }
}

impl Page for OffsetPage {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn items_key(&self) -> &str {
        &self.items_key
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        let Some(limit) = self.query_number(&self.limit_param)? else {
            return Ok(None);
        };
        if limit == 0 || self.items()?.len() < limit {
            return Ok(None);
        }

        let offset = self
            .query_number(&self.offset_param)?
            .unwrap_or(0)
            .checked_add(limit)
            .ok_or_else(|| {
                Error::decode(format!(
                    "query parameter '{}' overflows when advanced by {limit}",
                    self.offset_param
                ))
            })?;
        let url = with_query_param(&self.result.url, &self.offset_param, &offset.to_string());
        Ok(Some(url.into()))
    }
}

/// Copy of `url` with `key` set to `value`, replacing any existing pairs
/// for `key` and keeping the order of the others
fn with_query_param(url: &Url, key: &str, value: &str) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut next = url.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(key, value);
    next
}
