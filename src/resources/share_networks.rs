//! Share networks
//!
//! Listing uses marker pagination: the server sends no continuation link,
//! the next request carries the id of the last network seen.

use super::timestamp;
use crate::body::{build_request_body, require_str, Validate};
use crate::error::{Error, Result};
use crate::pagination::{AllPages, PageStrategy, Pager};
use crate::query::{Omit, QueryBuilder, ToQuery};
use crate::service::{extract_root, ServiceClient};
use crate::types::{JsonObject, JsonValue};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

const RESOURCE: &str = "share-networks";
const ITEMS: &str = "share_networks";
const ITEM: &str = "share_network";

/// A share network as returned by the API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareNetwork {
    pub id: String,
    pub project_id: Option<String>,
    pub neutron_net_id: Option<String>,
    pub neutron_subnet_id: Option<String>,
    pub nova_net_id: Option<String>,
    pub network_type: Option<String>,
    pub segmentation_id: Option<u32>,
    pub cidr: Option<String>,
    pub ip_version: Option<u8>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(with = "timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Options for [`create`]; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateOpts {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub neutron_net_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub neutron_subnet_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub nova_net_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Validate for CreateOpts {
    fn validate(&self) -> Result<()> {
        if !self.nova_net_id.is_empty()
            && !(self.neutron_net_id.is_empty() && self.neutron_subnet_id.is_empty())
        {
            return Err(Error::validation(
                "nova_net_id",
                "cannot be combined with neutron network options",
            ));
        }
        Ok(())
    }
}

/// Options for [`update`]; at least one field must be set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutron_net_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutron_subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nova_net_id: Option<String>,
}

impl Validate for UpdateOpts {
    fn validate(&self) -> Result<()> {
        let any_set = [
            &self.name,
            &self.description,
            &self.neutron_net_id,
            &self.neutron_subnet_id,
            &self.nova_net_id,
        ]
        .iter()
        .any(|field| field.is_some());

        if !any_set {
            return Err(Error::validation(ITEM, "at least one field must be set"));
        }
        Ok(())
    }
}

/// Options for [`add_security_service`] and [`remove_security_service`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecurityServiceOpts {
    pub security_service_id: String,
}

impl Validate for SecurityServiceOpts {
    fn validate(&self) -> Result<()> {
        require_str("security_service_id", &self.security_service_id)
    }
}

/// Filters for [`list`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOpts {
    pub all_tenants: bool,
    pub project_id: String,
    pub neutron_net_id: String,
    pub neutron_subnet_id: String,
    pub network_type: String,
    pub segmentation_id: Option<u32>,
    pub cidr: String,
    pub ip_version: Option<u8>,
    pub name: String,
    pub description: String,
    /// Page size
    pub limit: Option<u32>,
    /// Start after this network id
    pub marker: String,
}

impl ToQuery for ListOpts {
    fn to_query(&self) -> Result<QueryBuilder> {
        if let Some(version) = self.ip_version {
            if version != 4 && version != 6 {
                return Err(Error::validation(
                    "ip_version",
                    format!("expected 4 or 6, got {version}"),
                ));
            }
        }

        Ok(QueryBuilder::new()
            .field("all_tenants", &self.all_tenants, Omit::IfEmpty)
            .field("project_id", &self.project_id, Omit::IfEmpty)
            .field("neutron_net_id", &self.neutron_net_id, Omit::IfEmpty)
            .field("neutron_subnet_id", &self.neutron_subnet_id, Omit::IfEmpty)
            .field("network_type", &self.network_type, Omit::IfEmpty)
            .field("segmentation_id", &self.segmentation_id, Omit::Never)
            .field("cidr", &self.cidr, Omit::IfEmpty)
            .field("ip_version", &self.ip_version, Omit::IfEmpty)
            .field("name", &self.name, Omit::IfEmpty)
            .field("description", &self.description, Omit::IfEmpty)
            .field("limit", &self.limit, Omit::IfEmpty)
            .field("marker", &self.marker, Omit::IfEmpty))
    }
}

/// Create a share network
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<ShareNetwork> {
    let body = build_request_body(opts, ITEM)?;
    let url = client.service_url(&[RESOURCE])?;
    let network: ShareNetwork = client.create(&url, body, ITEM, &[200, 202]).await?;
    info!("Created share network {}", network.id);
    Ok(network)
}

/// Get one share network by id
pub async fn get(client: &ServiceClient, id: &str) -> Result<ShareNetwork> {
    require_str("id", id)?;
    let url = client.service_url(&[RESOURCE, id])?;
    client.get_resource(&url, ITEM).await
}

/// Update name, description or network bindings
pub async fn update(client: &ServiceClient, id: &str, opts: &UpdateOpts) -> Result<ShareNetwork> {
    require_str("id", id)?;
    let body = build_request_body(opts, ITEM)?;
    let url = client.service_url(&[RESOURCE, id])?;
    client.update(&url, body, ITEM).await
}

/// Delete a share network
pub async fn delete(client: &ServiceClient, id: &str) -> Result<()> {
    require_str("id", id)?;
    let url = client.service_url(&[RESOURCE, id])?;
    client.delete(&url, &[202]).await?;
    info!("Deleted share network {}", id);
    Ok(())
}

/// Associate a security service with a share network
pub async fn add_security_service(
    client: &ServiceClient,
    id: &str,
    opts: &SecurityServiceOpts,
) -> Result<ShareNetwork> {
    security_service_action(client, id, "add_security_service", opts).await
}

/// Dissociate a security service from a share network
pub async fn remove_security_service(
    client: &ServiceClient,
    id: &str,
    opts: &SecurityServiceOpts,
) -> Result<ShareNetwork> {
    security_service_action(client, id, "remove_security_service", opts).await
}

async fn security_service_action(
    client: &ServiceClient,
    id: &str,
    action: &str,
    opts: &SecurityServiceOpts,
) -> Result<ShareNetwork> {
    require_str("id", id)?;
    opts.validate()?;

    let url = client.service_url(&[RESOURCE, id, "action"])?;
    let mut body = JsonObject::new();
    body.insert(action.to_string(), serde_json::to_value(opts)?);
    let body = JsonValue::Object(body);
    let response = client.action(&url, body, &[200]).await?;
    extract_root(&response, ITEM)
}

/// Page strategy of the share network listing
pub fn page_strategy() -> PageStrategy {
    PageStrategy::marker(ITEMS)
}

/// List share networks with details
pub fn list<'a>(client: &'a ServiceClient, opts: &ListOpts) -> Result<Pager<&'a ServiceClient>> {
    let url = client.list_url(&[RESOURCE, "detail"], &opts.to_query()?)?;
    client.pager(&url, page_strategy())
}

/// Decode the share networks of an aggregated listing
pub fn extract_share_networks(pages: &AllPages) -> Result<Vec<ShareNetwork>> {
    pages.extract()
}
