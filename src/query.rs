//! Query-string building for list filters
//!
//! Every filter field is added with an explicit [`Omit`] flag instead of
//! relying on zero values to mean "not set". Absent `Option`s never produce
//! a pair.
//!
//! ```
//! use manila_client::query::{Omit, QueryBuilder};
//!
//! let query = QueryBuilder::new()
//!     .field("name", "x", Omit::IfEmpty)
//!     .field("is_public", &false, Omit::IfEmpty)
//!     .build();
//! assert_eq!(query, "name=x");
//! ```

use crate::error::Result;
use crate::types::Metadata;
use url::form_urlencoded;
use url::Url;

/// Whether a zero value (`false`, `0`, `""`, empty map) is left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Omit {
    /// Leave the pair out when the value is zero
    #[default]
    IfEmpty,
    /// Always emit the pair, zero or not
    Never,
}

/// A value that can be rendered into one query parameter
pub trait QueryValue {
    /// Rendered value, `None` when there is nothing to send at all
    fn render(&self) -> Option<String>;

    /// Whether this is the zero value of its type
    fn is_zero(&self) -> bool;
}

impl QueryValue for str {
    fn render(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl QueryValue for String {
    fn render(&self) -> Option<String> {
        Some(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl QueryValue for bool {
    fn render(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

macro_rules! impl_query_value_for_int {
    ($($t:ty),*) => {
        $(
            impl QueryValue for $t {
                fn render(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_query_value_for_int!(u8, u16, u32, u64, usize, i32, i64);

/// JSON string literal for `value`
fn json_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Rendered as `{"k":"v", "k2":"v2"}` with keys in sorted order
impl QueryValue for Metadata {
    fn render(&self) -> Option<String> {
        let pairs: Vec<String> = self
            .iter()
            .map(|(k, v)| format!("{}:{}", json_string(k), json_string(v)))
            .collect();
        Some(format!("{{{}}}", pairs.join(", ")))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn render(&self) -> Option<String> {
        self.as_ref().and_then(|value| value.render())
    }

    fn is_zero(&self) -> bool {
        self.as_ref().map_or(true, |value| value.is_zero())
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn render(&self) -> Option<String> {
        (**self).render()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

/// Ordered list of query pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    pairs: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key=value` unless the value is absent, or zero under `Omit::IfEmpty`
    #[must_use]
    pub fn field<V: QueryValue + ?Sized>(mut self, key: &str, value: &V, omit: Omit) -> Self {
        if omit == Omit::IfEmpty && value.is_zero() {
            return self;
        }
        if let Some(rendered) = value.render() {
            self.pairs.push((key.to_string(), rendered));
        }
        self
    }

    /// Rendered pairs in insertion order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Whether no pair was added
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// URL-encoded query string, without a leading `?`
    pub fn build(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }

    /// Append these pairs to `url`
    pub fn apply(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(&self.pairs);
    }
}

/// Filter options that translate into a list query
pub trait ToQuery {
    /// Build the query pairs, failing on inconsistent filters
    fn to_query(&self) -> Result<QueryBuilder>;
}
