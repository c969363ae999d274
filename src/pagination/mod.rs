//! Pagination module
//!
//! Supports: Single page, Linked (next link in body), Marker, Offset
//!
//! # Overview
//!
//! Listing endpoints paginate in different ways. Each way is a [`Page`]
//! implementation that answers two questions about one fetched response:
//! "is it empty?" and "where is the next page?". The [`Pager`] drives the
//! fetch loop once, for every strategy, and exposes it three ways:
//!
//! - [`Pager::all_pages`] concatenates every page's items in server order
//! - [`Pager::each_page`] visits pages one at a time with early exit
//! - [`Pager::into_stream`] yields pages as a `futures::Stream`
//!
//! Exactly one request is in flight at a time and nothing is prefetched.

mod cancel;
mod pager;
mod pages;
mod types;

pub use cancel::CancellationToken;
pub use pager::{AllPages, Pager};
pub use pages::{LinkedPage, MarkerPage, OffsetPage, SinglePage};
pub use types::{Page, PageResult, PageStrategy};
