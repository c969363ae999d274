//! CLI runner - executes commands

use crate::cli::commands::{
    Cli, Commands, OutputFormat, SecurityServicesCommand, ShareNetworksCommand, SharesCommand,
};
use crate::config::{load_config, ClientConfig};
use crate::error::Result;
use crate::pagination::{CancellationToken, Pager};
use crate::resources::{security_services, share_networks, shares};
use crate::service::ServiceClient;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = self.client()?;

        match &self.cli.command {
            Commands::Shares { action } => self.shares(&client, action).await,
            Commands::ShareNetworks { action } => self.share_networks(&client, action).await,
            Commands::SecurityServices { action } => self.security_services(&client, action).await,
        }
    }

    /// Build the service client from the config file or the environment
    fn client(&self) -> Result<ServiceClient> {
        let config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => {
                let mut config = ClientConfig::default();
                config.apply_env_overrides();
                config
            }
        };
        config.build_client()
    }

    async fn shares(&self, client: &ServiceClient, action: &SharesCommand) -> Result<()> {
        match action {
            SharesCommand::List {
                name,
                status,
                all_tenants,
                sort_key,
                sort_dir,
                limit,
            } => {
                let opts = shares::ListOpts {
                    name: name.clone().unwrap_or_default(),
                    status: status.clone().unwrap_or_default(),
                    all_tenants: *all_tenants,
                    sort_key: sort_key.clone().unwrap_or_default(),
                    sort_dir: sort_dir.clone().unwrap_or_default(),
                    limit: *limit,
                    ..Default::default()
                };
                self.print_listing(shares::list(client, &opts)?).await
            }
            SharesCommand::Get { id } => self.output(&shares::get(client, id).await?),
            SharesCommand::Delete { id } => {
                shares::delete(client, id).await?;
                self.output(&serde_json::json!({"deleted": id}))
            }
        }
    }

    async fn share_networks(
        &self,
        client: &ServiceClient,
        action: &ShareNetworksCommand,
    ) -> Result<()> {
        match action {
            ShareNetworksCommand::List {
                name,
                all_tenants,
                limit,
            } => {
                let opts = share_networks::ListOpts {
                    name: name.clone().unwrap_or_default(),
                    all_tenants: *all_tenants,
                    limit: *limit,
                    ..Default::default()
                };
                self.print_listing(share_networks::list(client, &opts)?).await
            }
            ShareNetworksCommand::Get { id } => {
                self.output(&share_networks::get(client, id).await?)
            }
            ShareNetworksCommand::Delete { id } => {
                share_networks::delete(client, id).await?;
                self.output(&serde_json::json!({"deleted": id}))
            }
        }
    }

    async fn security_services(
        &self,
        client: &ServiceClient,
        action: &SecurityServicesCommand,
    ) -> Result<()> {
        match action {
            SecurityServicesCommand::List {
                name,
                service_type,
                share_network_id,
            } => {
                let opts = security_services::ListOpts {
                    name: name.clone().unwrap_or_default(),
                    service_type: service_type
                        .as_deref()
                        .map(str::parse::<security_services::SecurityServiceType>)
                        .transpose()?,
                    share_network_id: share_network_id.clone().unwrap_or_default(),
                    ..Default::default()
                };
                self.print_listing(security_services::list(client, &opts)?).await
            }
        }
    }

    /// Print every item of every page as it arrives. Ctrl-C cancels the
    /// fetch in flight.
    async fn print_listing(&self, pager: Pager<&ServiceClient>) -> Result<()> {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                trigger.cancel();
            }
        });

        let mut pager = pager.with_cancellation(token);
        if let Some(seconds) = self.cli.page_timeout {
            pager = pager.with_deadline(Duration::from_secs(seconds));
        }
        debug!("Listing {}", pager.initial_url());

        let mut count = 0usize;
        let result = pager
            .each_page(|page| {
                for item in page.items()? {
                    self.print_value(item)?;
                    count += 1;
                }
                Ok(true)
            })
            .await;
        watcher.abort();

        result?;
        info!("Listed {} items", count);
        Ok(())
    }

    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        self.print_value(&serde_json::to_value(value)?)
    }

    fn print_value(&self, value: &Value) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        }?;
        println!("{rendered}");
        Ok(())
    }
}
