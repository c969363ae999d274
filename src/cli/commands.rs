//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shared file systems command-line client
#[derive(Parser, Debug)]
#[command(name = "manila")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Fail a page fetch that takes longer than this many seconds
    #[arg(long, global = true)]
    pub page_timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage shares
    Shares {
        #[command(subcommand)]
        action: SharesCommand,
    },

    /// Manage share networks
    ShareNetworks {
        #[command(subcommand)]
        action: ShareNetworksCommand,
    },

    /// Manage security services
    SecurityServices {
        #[command(subcommand)]
        action: SecurityServicesCommand,
    },
}

/// `shares` subcommands
#[derive(Subcommand, Debug)]
pub enum SharesCommand {
    /// List shares, following every page
    List {
        /// Only shares with this name
        #[arg(long)]
        name: Option<String>,

        /// Only shares in this status
        #[arg(long)]
        status: Option<String>,

        /// Shares of every project (admin only)
        #[arg(long)]
        all_tenants: bool,

        /// Sort key
        #[arg(long)]
        sort_key: Option<String>,

        /// Sort direction (asc or desc)
        #[arg(long)]
        sort_dir: Option<String>,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one share
    Get {
        /// Share id
        id: String,
    },

    /// Delete a share
    Delete {
        /// Share id
        id: String,
    },
}

/// `share-networks` subcommands
#[derive(Subcommand, Debug)]
pub enum ShareNetworksCommand {
    /// List share networks, following every page
    List {
        /// Only networks with this name
        #[arg(long)]
        name: Option<String>,

        /// Networks of every project (admin only)
        #[arg(long)]
        all_tenants: bool,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one share network
    Get {
        /// Share network id
        id: String,
    },

    /// Delete a share network
    Delete {
        /// Share network id
        id: String,
    },
}

/// `security-services` subcommands
#[derive(Subcommand, Debug)]
pub enum SecurityServicesCommand {
    /// List security services
    List {
        /// Only services with this name
        #[arg(long)]
        name: Option<String>,

        /// Only services of this type (ldap, kerberos, active_directory)
        #[arg(long = "type")]
        service_type: Option<String>,

        /// Only services bound to this share network
        #[arg(long)]
        share_network_id: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}
