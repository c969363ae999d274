//! Authentication module
//!
//! Credentials are opaque to the pagination engine: the transport attaches
//! them to every request it sends. Supports Keystone token, API key,
//! Basic and Bearer authentication.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, AUTH_TOKEN_HEADER};
pub use types::{AuthConfig, Location};
