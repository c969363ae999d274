// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # Manila Client
//!
//! Async client for shared file systems (Manila) REST APIs, built around a
//! uniform pagination engine.
//!
//! ## Features
//!
//! - **Uniform Pagination**: Single page, next links, markers and offsets behind one `Page` trait
//! - **Lazy Traversal**: Pages fetched one at a time, only when asked for
//! - **Resources**: Shares, share networks and security services
//! - **Resilient HTTP**: Retries with backoff and client-side rate limiting
//! - **Cancellation**: Token and per-fetch deadline for long listings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use manila_client::config::ClientConfig;
//! use manila_client::resources::shares;
//!
//! #[tokio::main]
//! async fn main() -> manila_client::Result<()> {
//!     let client = ClientConfig::new("https://manila.example.com:8786/v2/project").build_client()?;
//!
//!     let opts = shares::ListOpts { name: "x".into(), ..Default::default() };
//!     let pages = shares::list(&client, &opts)?.all_pages().await?;
//!     for share in shares::extract_shares(&pages)? {
//!         println!("{} {:?}", share.id, share.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Resources                               │
//! │   shares          share_networks          security_services     │
//! │   ListOpts → query    CreateOpts → body    extract_*(AllPages)  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Pager (one traversal)                       │
//! │  next_page()   each_page(visit)   all_pages()   into_stream()   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │  Single  │  Linked   │    Marker     │  Offset   │  Transport  │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ no next  │ rel=next  │ last item id  │ offset += │ HttpClient  │
//! │          │ href      │ on first URL  │ limit     │ retry, auth │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination engine
pub mod pagination;

/// Query-string builder for list filters
pub mod query;

/// Request-body builder for create and update calls
pub mod body;

/// Service client bound to one endpoint
pub mod service;

/// Shares, share networks and security services
pub mod resources;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, ClientConfig};
pub use pagination::{AllPages, CancellationToken, Page, PageStrategy, Pager};
pub use service::ServiceClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
