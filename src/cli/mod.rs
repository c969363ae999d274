//! CLI module
//!
//! Command-line interface over the resource APIs.
//!
//! # Commands
//!
//! - `shares list|get|delete`
//! - `share-networks list|get|delete`
//! - `security-services list`
//!
//! Listings stream every page to stdout as it is fetched.

mod commands;
mod runner;

pub use commands::{
    Cli, Commands, OutputFormat, SecurityServicesCommand, ShareNetworksCommand, SharesCommand,
};
pub use runner::Runner;
