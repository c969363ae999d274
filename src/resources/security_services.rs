//! Security services
//!
//! The listing is not paginated server side: one response carries every
//! matching service.

use super::timestamp;
use crate::body::{build_request_body, require_str, Validate};
use crate::error::{Error, Result};
use crate::pagination::{AllPages, PageStrategy, Pager};
use crate::query::{Omit, QueryBuilder, QueryValue, ToQuery};
use crate::service::ServiceClient;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

const RESOURCE: &str = "security-services";
const ITEMS: &str = "security_services";
const ITEM: &str = "security_service";

/// Kind of directory or authentication service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityServiceType {
    Ldap,
    Kerberos,
    ActiveDirectory,
}

impl SecurityServiceType {
    /// Wire name of the type
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ldap => "ldap",
            Self::Kerberos => "kerberos",
            Self::ActiveDirectory => "active_directory",
        }
    }
}

impl std::str::FromStr for SecurityServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ldap" => Ok(Self::Ldap),
            "kerberos" => Ok(Self::Kerberos),
            "active_directory" => Ok(Self::ActiveDirectory),
            other => Err(Error::validation(
                "type",
                format!("unknown security service type '{other}'"),
            )),
        }
    }
}

impl QueryValue for SecurityServiceType {
    fn render(&self) -> Option<String> {
        Some(self.as_str().to_string())
    }

    fn is_zero(&self) -> bool {
        false
    }
}

/// A security service as returned by the API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityService {
    pub id: String,
    pub project_id: Option<String>,
    #[serde(rename = "type")]
    pub service_type: Option<SecurityServiceType>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub dns_ip: Option<String>,
    pub user: Option<String>,
    pub server: Option<String>,
    pub domain: Option<String>,
    /// Ids of the share networks this service is bound to
    pub share_networks: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(with = "timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Options for [`create`]; `service_type` is required
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateOpts {
    #[serde(rename = "type")]
    pub service_type: Option<SecurityServiceType>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dns_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server: String,
}

impl Validate for CreateOpts {
    fn validate(&self) -> Result<()> {
        if self.service_type.is_none() {
            return Err(Error::missing_field("type"));
        }
        Ok(())
    }
}

/// Filters for [`list`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOpts {
    pub all_tenants: bool,
    pub id: String,
    pub name: String,
    pub service_type: Option<SecurityServiceType>,
    pub user: String,
    pub server: String,
    pub domain: String,
    pub dns_ip: String,
    pub share_network_id: String,
}

impl ToQuery for ListOpts {
    fn to_query(&self) -> Result<QueryBuilder> {
        Ok(QueryBuilder::new()
            .field("all_tenants", &self.all_tenants, Omit::IfEmpty)
            .field("id", &self.id, Omit::IfEmpty)
            .field("name", &self.name, Omit::IfEmpty)
            .field("type", &self.service_type, Omit::IfEmpty)
            .field("user", &self.user, Omit::IfEmpty)
            .field("server", &self.server, Omit::IfEmpty)
            .field("domain", &self.domain, Omit::IfEmpty)
            .field("dns_ip", &self.dns_ip, Omit::IfEmpty)
            .field("share_network_id", &self.share_network_id, Omit::IfEmpty))
    }
}

/// Create a security service
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<SecurityService> {
    let body = build_request_body(opts, ITEM)?;
    let url = client.service_url(&[RESOURCE])?;
    let service: SecurityService = client.create(&url, body, ITEM, &[200]).await?;
    info!("Created security service {}", service.id);
    Ok(service)
}

/// Get one security service by id
pub async fn get(client: &ServiceClient, id: &str) -> Result<SecurityService> {
    require_str("id", id)?;
    let url = client.service_url(&[RESOURCE, id])?;
    client.get_resource(&url, ITEM).await
}

/// Delete a security service
pub async fn delete(client: &ServiceClient, id: &str) -> Result<()> {
    require_str("id", id)?;
    let url = client.service_url(&[RESOURCE, id])?;
    client.delete(&url, &[202]).await?;
    info!("Deleted security service {}", id);
    Ok(())
}

/// Page strategy of the security service listing
pub fn page_strategy() -> PageStrategy {
    PageStrategy::single(ITEMS)
}

/// List security services with details
pub fn list<'a>(client: &'a ServiceClient, opts: &ListOpts) -> Result<Pager<&'a ServiceClient>> {
    let url = client.list_url(&[RESOURCE, "detail"], &opts.to_query()?)?;
    client.pager(&url, page_strategy())
}

/// Decode the security services of an aggregated listing
pub fn extract_security_services(pages: &AllPages) -> Result<Vec<SecurityService>> {
    pages.extract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpClient, HttpClientConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

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

    #[test_case("ldap", SecurityServiceType::Ldap)]
    #[test_case("kerberos", SecurityServiceType::Kerberos)]
    #[test_case("active_directory", SecurityServiceType::ActiveDirectory)]
    fn test_type_round_trip(raw: &str, expected: SecurityServiceType) {
        let parsed: SecurityServiceType = raw.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
        assert_eq!(serde_json::to_value(parsed).unwrap(), json!(raw));
    }

    #[test]
    fn test_create_requires_type() {
        let err = build_request_body(&CreateOpts::default(), ITEM).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "type"));
    }

    #[test]
    fn test_list_query_type() {
        let opts = ListOpts {
            service_type: Some(SecurityServiceType::Kerberos),
            id: "ss-1".to_string(),
            ..Default::default()
        };
        assert_eq!(opts.to_query().unwrap().build(), "id=ss-1&type=kerberos");
    }

    #[tokio::test]
    async fn test_create() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/project/security-services"))
            .and(body_json(json!({
                "security_service": {"type": "kerberos", "name": "SecServ1", "dns_ip": "10.0.0.0/24"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "security_service": {"id": "ss-1", "type": "kerberos", "name": "SecServ1"}
            })))
            .mount(&server)
            .await;

        let client = service_for(&server);
        let opts = CreateOpts {
            service_type: Some(SecurityServiceType::Kerberos),
            name: "SecServ1".to_string(),
            dns_ip: "10.0.0.0/24".to_string(),
            ..Default::default()
        };
        let service = create(&client, &opts).await.unwrap();
        assert_eq!(service.service_type, Some(SecurityServiceType::Kerberos));
    }

    #[tokio::test]
    async fn test_list_single_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/project/security-services/detail"))
            .and(query_param("id", "ss-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "security_services": [
                    {"id": "ss-1", "type": "ldap", "share_networks": ["net-1"]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = service_for(&server);
        let opts = ListOpts {
            id: "ss-1".to_string(),
            ..Default::default()
        };
        let pages = list(&client, &opts).unwrap().all_pages().await.unwrap();
        let services = extract_security_services(&pages).unwrap();

        assert_eq!(services.len(), 1);
        assert_eq!(services[0].share_networks, vec!["net-1".to_string()]);
    }
}
