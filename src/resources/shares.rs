//! Shares
//!
//! Listing uses linked pagination over `shares` / `shares_links`. When a
//! deployment omits the links field the listing is a single page.

use super::{timestamp, Link};
use crate::body::{build_request_body, is_false, require_positive, require_str, Validate};
use crate::error::{Error, Result};
use crate::pagination::{AllPages, PageStrategy, Pager};
use crate::query::{Omit, QueryBuilder, ToQuery};
use crate::service::ServiceClient;
use crate::types::Metadata;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

const RESOURCE: &str = "shares";
const ITEM: &str = "share";

// ============================================================================
// Model
// ============================================================================

/// A share as returned by the API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Share {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub share_proto: Option<String>,
    pub size: u32,
    pub status: Option<String>,
    pub availability_zone: Option<String>,
    pub project_id: Option<String>,
    pub share_network_id: Option<String>,
    pub share_server_id: Option<String>,
    pub share_type: Option<String>,
    pub share_type_name: Option<String>,
    pub volume_type: Option<String>,
    pub snapshot_id: Option<String>,
    pub consistency_group_id: Option<String>,
    pub host: Option<String>,
    pub is_public: bool,
    pub has_replicas: bool,
    pub replication_type: Option<String>,
    pub task_state: Option<String>,
    pub metadata: Metadata,
    pub export_locations: Vec<String>,
    pub links: Vec<Link>,
    #[serde(with = "timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

// ============================================================================
// Options
// ============================================================================

/// Options for [`create`]
///
/// `share_proto` and `size` are required; everything else is only sent
/// when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateOpts {
    pub share_proto: String,
    pub size: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub share_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub volume_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub snapshot_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_public: bool,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub share_network_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub consistency_group_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub availability_zone: String,
}

impl Validate for CreateOpts {
    fn validate(&self) -> Result<()> {
        require_str("share_proto", &self.share_proto)?;
        require_positive("size", u64::from(self.size))
    }
}

/// Filters for [`list`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOpts {
    /// Admin-only: list shares of every project
    pub all_tenants: bool,
    pub name: String,
    pub status: String,
    pub share_server_id: String,
    pub metadata: Metadata,
    pub share_type_id: String,
    pub sort_key: String,
    /// `asc` or `desc`
    pub sort_dir: String,
    pub snapshot_id: String,
    pub share_network_id: String,
    pub project_id: String,
    /// Sent whenever set, `Some(false)` included
    pub is_public: Option<bool>,
    pub consistency_group_id: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ToQuery for ListOpts {
    fn to_query(&self) -> Result<QueryBuilder> {
        if !matches!(self.sort_dir.as_str(), "" | "asc" | "desc") {
            return Err(Error::validation(
                "sort_dir",
                format!("expected 'asc' or 'desc', got '{}'", self.sort_dir),
            ));
        }

        Ok(QueryBuilder::new()
            .field("all_tenants", &self.all_tenants, Omit::IfEmpty)
            .field("name", &self.name, Omit::IfEmpty)
            .field("status", &self.status, Omit::IfEmpty)
            .field("share_server_id", &self.share_server_id, Omit::IfEmpty)
            .field("metadata", &self.metadata, Omit::IfEmpty)
            .field("share_type_id", &self.share_type_id, Omit::IfEmpty)
            .field("sort_key", &self.sort_key, Omit::IfEmpty)
            .field("sort_dir", &self.sort_dir, Omit::IfEmpty)
            .field("snapshot_id", &self.snapshot_id, Omit::IfEmpty)
            .field("share_network_id", &self.share_network_id, Omit::IfEmpty)
            .field("project_id", &self.project_id, Omit::IfEmpty)
            .field("is_public", &self.is_public, Omit::Never)
            .field("consistency_group_id", &self.consistency_group_id, Omit::IfEmpty)
            .field("limit", &self.limit, Omit::IfEmpty)
            .field("offset", &self.offset, Omit::Never))
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Request body for [`create`]
pub fn create_body(opts: &CreateOpts) -> Result<serde_json::Value> {
    build_request_body(opts, ITEM)
}

/// Create a share
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<Share> {
    let body = create_body(opts)?;
    let url = client.service_url(&[RESOURCE])?;
    let share: Share = client.create(&url, body, ITEM, &[200, 201]).await?;
    info!("Created share {} ({} GiB {})", share.id, opts.size, opts.share_proto);
    Ok(share)
}

/// Get one share by id
pub async fn get(client: &ServiceClient, id: &str) -> Result<Share> {
    require_str("id", id)?;
    let url = client.service_url(&[RESOURCE, id])?;
    client.get_resource(&url, ITEM).await
}

/// Delete a share
pub async fn delete(client: &ServiceClient, id: &str) -> Result<()> {
    require_str("id", id)?;
    let url = client.service_url(&[RESOURCE, id])?;
    client.delete(&url, &[202]).await?;
    info!("Deleted share {}", id);
    Ok(())
}

/// Page strategy of the share listing
pub fn page_strategy() -> PageStrategy {
    PageStrategy::linked(RESOURCE)
}

/// List shares with details
pub fn list<'a>(client: &'a ServiceClient, opts: &ListOpts) -> Result<Pager<&'a ServiceClient>> {
    let url = client.list_url(&[RESOURCE, "detail"], &opts.to_query()?)?;
    client.pager(&url, page_strategy())
}

/// Decode the shares of an aggregated listing
pub fn extract_shares(pages: &AllPages) -> Result<Vec<Share>> {
    pages.extract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpClient, HttpClientConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SHARE_ID: &str = "011d21e2-fbc3-4e4a-9993-9ea223f73264";

    fn service_for(server: &MockServer) -> ServiceClient {
        let http = HttpClient::with_config(
            HttpClientConfig::builder()
                .no_rate_limit()
                .max_retries(0)
                .build(),
        )
        .unwrap();
        ServiceClient::new(http, &format!("{}/v2/project", server.uri())).unwrap()
    }

    fn share_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "share_proto": "NFS",
            "size": 1,
            "status": "available",
            "is_public": false,
            "metadata": {"project": "my_app"},
            "created_at": "2015-09-18T10:25:24.000000",
            "links": [
                {"href": format!("http://172.18.198.54:8786/v2/project/shares/{id}"), "rel": "self"}
            ]
        })
    }

    #[test]
    fn test_create_body_only_set_fields() {
        let opts = CreateOpts {
            size: 1,
            name: "x".to_string(),
            share_proto: "NFS".to_string(),
            ..Default::default()
        };

        let body = create_body(&opts).unwrap();
        assert_eq!(
            body,
            json!({"share": {"share_proto": "NFS", "size": 1, "name": "x"}})
        );
        assert_eq!(body["share"].as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_create_requires_proto_and_size() {
        let err = create_body(&CreateOpts {
            size: 1,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "share_proto"));

        let err = create_body(&CreateOpts {
            share_proto: "CIFS".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "size"));
    }

    #[test]
    fn test_list_opts_name_only() {
        let opts = ListOpts {
            name: "x".to_string(),
            ..Default::default()
        };
        assert_eq!(opts.to_query().unwrap().build(), "name=x");
    }

    #[test]
    fn test_list_opts_default_is_empty() {
        assert!(ListOpts::default().to_query().unwrap().is_empty());
    }

    #[test]
    fn test_list_opts_explicit_false_is_public() {
        let opts = ListOpts {
            is_public: Some(false),
            all_tenants: true,
            ..Default::default()
        };
        assert_eq!(
            opts.to_query().unwrap().build(),
            "all_tenants=true&is_public=false"
        );
    }

    #[test]
    fn test_list_opts_bad_sort_dir() {
        let opts = ListOpts {
            sort_dir: "sideways".to_string(),
            ..Default::default()
        };
        assert!(matches!(opts.to_query(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_share_decodes_nulls() {
        let share: Share = serde_json::from_value(json!({
            "id": SHARE_ID,
            "name": null,
            "description": null,
            "size": 1,
            "created_at": null,
            "export_locations": []
        }))
        .unwrap();

        assert_eq!(share.id, SHARE_ID);
        assert_eq!(share.name, None);
        assert!(share.metadata.is_empty());
    }

    #[tokio::test]
    async fn test_create() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/project/shares"))
            .and(body_json(json!({
                "share": {"share_proto": "NFS", "size": 1, "name": "my_test_share"}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"share": share_json(SHARE_ID, "my_test_share")})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = service_for(&server);
        let opts = CreateOpts {
            size: 1,
            name: "my_test_share".to_string(),
            share_proto: "NFS".to_string(),
            ..Default::default()
        };
        let share = create(&client, &opts).await.unwrap();

        assert_eq!(share.name.as_deref(), Some("my_test_share"));
        assert_eq!(share.size, 1);
        assert_eq!(share.share_proto.as_deref(), Some("NFS"));
    }

    #[tokio::test]
    async fn test_create_invalid_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = service_for(&server);
        let err = create(&client, &CreateOpts::default()).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v2/project/shares/{SHARE_ID}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"share": share_json(SHARE_ID, "s")})),
            )
            .mount(&server)
            .await;

        let client = service_for(&server);
        let share = get(&client, SHARE_ID).await.unwrap();
        assert_eq!(share.id, SHARE_ID);
        assert_eq!(share.metadata.get("project").map(String::as_str), Some("my_app"));
        assert!(share.created_at.is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("/v2/project/shares/{SHARE_ID}")))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = service_for(&server);
        delete(&client, SHARE_ID).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_empty_id() {
        let server = MockServer::start().await;
        let client = service_for(&server);
        assert!(matches!(delete(&client, "").await, Err(Error::Validation { .. })));
    }

    #[tokio::test]
    async fn test_list_follows_links() {
        let server = MockServer::start().await;
        let next = format!("{}/v2/project/shares/detail?name=s&marker=a", server.uri());

        Mock::given(method("GET"))
            .and(path("/v2/project/shares/detail"))
            .and(query_param("marker", "a"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"shares": [share_json("b", "s")]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/project/shares/detail"))
            .and(query_param("name", "s"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "shares": [share_json("a", "s")],
                "shares_links": [{"href": next, "rel": "next"}]
            })))
            .mount(&server)
            .await;

        let client = service_for(&server);
        let opts = ListOpts {
            name: "s".to_string(),
            ..Default::default()
        };
        let pages = list(&client, &opts).unwrap().all_pages().await.unwrap();
        let shares = extract_shares(&pages).unwrap();

        let ids: Vec<&str> = shares.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
