//! The pager drives one traversal of a paginated listing

use super::cancel::CancellationToken;
use super::types::{Page, PageResult, PageStrategy};
use crate::error::{Error, Result};
use crate::http::Transport;
use futures::Stream;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Where the traversal stands between two fetches
#[derive(Debug)]
enum Cursor {
    /// Nothing fetched yet
    Start,
    /// Continuation computed from the last visited page
    Pending(Result<Option<String>>),
    /// Exhausted, failed, or stopped
    Done,
}

/// Sequential, single-use driver over a paginated listing
///
/// A pager is consumed by [`all_pages`](Self::all_pages),
/// [`each_page`](Self::each_page) or [`into_stream`](Self::into_stream).
/// Pages are fetched strictly one after the other and only when the
/// caller asks for them.
pub struct Pager<T> {
    client: T,
    initial_url: Url,
    strategy: PageStrategy,
    headers: HeaderMap,
    cancel: Option<CancellationToken>,
    deadline: Option<Duration>,
    cursor: Cursor,
    pages_fetched: usize,
}

impl<T: Transport> Pager<T> {
    /// Create a pager starting at `url`
    pub fn new(client: T, url: &str, strategy: PageStrategy) -> Result<Self> {
        Ok(Self {
            client,
            initial_url: Url::parse(url)?,
            strategy,
            headers: HeaderMap::new(),
            cancel: None,
            deadline: None,
            cursor: Cursor::Start,
            pages_fetched: 0,
        })
    }

    /// Extra headers sent with every page request
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Abort the traversal when `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Fail any single page fetch that takes longer than `deadline`
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// URL the traversal starts from
    pub fn initial_url(&self) -> &Url {
        &self.initial_url
    }

    /// Strategy used to interpret pages
    pub fn strategy(&self) -> &PageStrategy {
        &self.strategy
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next non-empty page.
    ///
    /// Returns `Ok(None)` once the listing is exhausted or a fetched page
    /// is empty. After an error or the end, every further call returns
    /// `Ok(None)` without touching the network.
    pub async fn next_page(&mut self) -> Result<Option<Box<dyn Page>>> {
        let url = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Start => self.initial_url.to_string(),
            Cursor::Pending(next) => match next? {
                Some(url) => url,
                None => return Ok(None),
            },
            Cursor::Done => return Ok(None),
        };

        let result = self.fetch(&url).await?;
        self.pages_fetched += 1;

        let page = self.strategy.build(&self.initial_url, result);
        if page.is_empty()? {
            debug!(url = %url, "Page {} is empty, stopping", self.pages_fetched);
            return Ok(None);
        }

        let base = &page.result().url;
        let next = page
            .next_page_url()
            .and_then(|next| next.map(|href| resolve_next(base, &href)).transpose());
        self.cursor = Cursor::Pending(next);
        Ok(Some(page))
    }

    /// Visit every page in server order.
    ///
    /// `visit` returning `Ok(false)` stops the traversal without error and
    /// without fetching anything further. An error from `visit` is returned
    /// as is. Empty pages end the traversal and are never visited.
    pub async fn each_page<F>(mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&dyn Page) -> Result<bool>,
    {
        while let Some(page) = self.next_page().await? {
            if !visit(page.as_ref())? {
                debug!(
                    "Traversal of {} stopped by caller after {} pages",
                    self.initial_url, self.pages_fetched
                );
                return Ok(());
            }
        }
        Ok(())
    }

    /// Fetch every page and concatenate their items in server order.
    ///
    /// Any error discards what was gathered so far.
    pub async fn all_pages(mut self) -> Result<AllPages> {
        let mut items = Vec::new();

        while let Some(page) = self.next_page().await? {
            items.extend(page.items()?.iter().cloned());
        }

        debug!(
            "Collected {} items from {} pages of {}",
            items.len(),
            self.pages_fetched,
            self.initial_url
        );

        Ok(AllPages {
            items_key: self.strategy.items_key().to_string(),
            items,
            pages: self.pages_fetched,
        })
    }

    /// Yield pages lazily as a stream
    pub fn into_stream(self) -> impl Stream<Item = Result<Box<dyn Page>>> {
        futures::stream::try_unfold(self, |mut pager| async move {
            let page = pager.next_page().await?;
            Ok::<_, Error>(page.map(|page| (page, pager)))
        })
    }

    async fn fetch(&self, url: &str) -> Result<PageResult> {
        debug!(url = %url, "Fetching page {}", self.pages_fetched + 1);

        let request = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout(deadline, self.client.get(url, &self.headers))
                    .await
                    .unwrap_or_else(|_| {
                        Err(Error::Timeout {
                            timeout_ms: deadline.as_millis() as u64,
                        })
                    }),
                None => self.client.get(url, &self.headers).await,
            }
        };

        let response = match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => return Err(Error::Cancelled),
                    response = request => response?,
                }
            }
            None => request.await?,
        };

        PageResult::from_response(response)
    }
}

/// Resolve a next-page reference against the URL of the page it came from.
/// Absolute references come back unchanged.
fn resolve_next(base: &Url, href: &str) -> Result<String> {
    Ok(base.join(href)?.into())
}

impl<T> std::fmt::Debug for Pager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("initial_url", &self.initial_url.as_str())
            .field("strategy", &self.strategy)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}

/// Items of every page of a traversal, concatenated in server order
#[derive(Debug, Clone, PartialEq)]
pub struct AllPages {
    items_key: String,
    items: Vec<Value>,
    pages: usize,
}

impl AllPages {
    /// Build an aggregate from one page-shaped body, e.g. a stored response
    pub fn from_body(body: &Value, items_key: impl Into<String>) -> Result<Self> {
        let items_key = items_key.into();
        let items = super::types::items_array(body, &items_key)?.to_vec();
        Ok(Self {
            items_key,
            items,
            pages: 1,
        })
    }

    /// Body field the items were collected from
    pub fn items_key(&self) -> &str {
        &self.items_key
    }

    /// The concatenated items
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Number of non-empty pages fetched, plus a trailing empty one if any
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Number of items collected
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were collected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The aggregate in the same shape as one page: `{items_key: [...]}`
    pub fn body(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(self.items_key.clone(), Value::Array(self.items.clone()));
        Value::Object(body)
    }

    /// Decode every item into `I`
    pub fn extract<I: DeserializeOwned>(&self) -> Result<Vec<I>> {
        self.items
            .iter()
            .map(|item| {
                I::deserialize(item).map_err(|e| {
                    Error::decode(format!("invalid item in '{}': {e}", self.items_key))
                })
            })
            .collect()
    }
}
