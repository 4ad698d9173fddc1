//! Azure Resource Manager provider - resource listing and diagnostic settings
//! over the ARM REST API

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::cache::DiagnosticsLookup;
use crate::config::AzureSettings;
use crate::error::ProviderError;
use crate::scanners::{agw, cae, kv, plan, Resource, ResourceSource, Scope};
use crate::utils::command::execute_command_checked;

const DIAGNOSTIC_SETTINGS_API_VERSION: &str = "2021-05-01-preview";

/// Environment variable holding a pre-acquired bearer token
pub const TOKEN_ENV_VAR: &str = "AZURE_ACCESS_TOKEN";

/// Upper bound on error bodies kept in [`ProviderError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// A resource type listable through ARM.
pub trait ArmResource: Resource + DeserializeOwned {
    const API_VERSION: &'static str;
}

impl ArmResource for kv::KeyVault {
    const API_VERSION: &'static str = "2022-07-01";
}

impl ArmResource for agw::ApplicationGateway {
    const API_VERSION: &'static str = "2022-09-01";
}

impl ArmResource for cae::ManagedEnvironment {
    const API_VERSION: &'static str = "2023-05-01";
}

impl ArmResource for plan::AppServicePlan {
    const API_VERSION: &'static str = "2022-09-01";
}

/// One page of an ARM list response
#[derive(Debug, Deserialize)]
struct ArmPage<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

/// Client for the Azure Resource Manager API.
///
/// The bearer token is acquired lazily on the first request.
pub struct AzureClient {
    http: reqwest::Client,
    endpoint: String,
    token: OnceCell<String>,
}

impl AzureClient {
    pub fn new(settings: &AzureSettings) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(concat!("azqr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Http {
                url: settings.endpoint.clone(),
                source: e,
            })?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            token: OnceCell::new(),
        })
    }

    /// Use a fixed bearer token instead of acquiring one
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = OnceCell::from(token.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL listing resources of one type within a scope
    pub fn list_url(&self, scope: &Scope, resource_type: &str, api_version: &str) -> String {
        format!(
            "{}{}/providers/{}?api-version={}",
            self.endpoint,
            scope.arm_path(),
            resource_type,
            api_version
        )
    }

    /// URL listing diagnostic settings attached to a resource
    pub fn diagnostic_settings_url(&self, resource_id: &str) -> String {
        format!(
            "{}/{}/providers/Microsoft.Insights/diagnosticSettings?api-version={}",
            self.endpoint,
            resource_id.trim_start_matches('/'),
            DIAGNOSTIC_SETTINGS_API_VERSION
        )
    }

    /// List every resource of type `R` in the scope, following `nextLink`
    pub async fn list<R: ArmResource>(&self, scope: &Scope) -> Result<Vec<R>, ProviderError> {
        let mut url = Some(self.list_url(scope, R::RESOURCE_TYPE, R::API_VERSION));
        let mut visited = HashSet::new();
        let mut resources = Vec::new();

        while let Some(current) = url.take() {
            let page: ArmPage<R> = self.get_json(&current).await?;
            resources.extend(page.value);
            visited.insert(current);
            url = self.next_page(page.next_link, &visited)?;
        }

        tracing::debug!(
            resource_type = R::RESOURCE_TYPE,
            count = resources.len(),
            "Listed resources"
        );
        Ok(resources)
    }

    /// Validate a `nextLink`. Links must stay on the configured endpoint, since
    /// the bearer token is attached to them; a link already fetched ends paging.
    fn next_page(
        &self,
        link: Option<String>,
        visited: &HashSet<String>,
    ) -> Result<Option<String>, ProviderError> {
        let link = match link.filter(|l| !l.is_empty()) {
            Some(link) => link,
            None => return Ok(None),
        };

        let on_endpoint = link
            .strip_prefix(self.endpoint.as_str())
            .map_or(false, |rest| rest.starts_with('/') || rest.starts_with('?'));
        if !on_endpoint {
            return Err(ProviderError::UntrustedLink {
                link,
                endpoint: self.endpoint.clone(),
            });
        }

        if visited.contains(&link) {
            tracing::warn!(link = %link, "nextLink repeats a fetched page, stopping");
            return Ok(None);
        }
        Ok(Some(link))
    }

    async fn token(&self) -> Result<&str, ProviderError> {
        let endpoint = self.endpoint.clone();
        self.token
            .get_or_try_init(|| async move {
                tokio::task::spawn_blocking(move || acquire_token(&endpoint))
                    .await
                    .map_err(|e| ProviderError::Authentication {
                        message: format!("token task failed: {}", e),
                    })?
            })
            .await
            .map(String::as_str)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let token = self.token().await?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProviderError::Http {
                url: url.to_string(),
                source: e,
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| ProviderError::Http {
            url: url.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "ARM request failed");
            return Err(ProviderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl DiagnosticsLookup for AzureClient {
    async fn has_diagnostics(&self, resource_id: &str) -> Result<bool, ProviderError> {
        let url = self.diagnostic_settings_url(resource_id);
        let page: ArmPage<serde_json::Value> = self.get_json(&url).await?;
        Ok(!page.value.is_empty())
    }
}

/// Obtain a bearer token from the environment or the Azure CLI
fn acquire_token(endpoint: &str) -> Result<String, ProviderError> {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
        if !token.trim().is_empty() {
            return Ok(token.trim().to_string());
        }
    }

    which::which("az").map_err(|_| ProviderError::Authentication {
        message: format!(
            "set {} or install the Azure CLI and run 'az login'",
            TOKEN_ENV_VAR
        ),
    })?;

    let resource = format!("{}/", endpoint);
    execute_command_checked(
        "az",
        &[
            "account",
            "get-access-token",
            "--resource",
            &resource,
            "--query",
            "accessToken",
            "-o",
            "tsv",
        ],
    )
    .map_err(|message| {
        tracing::debug!("az account get-access-token failed: {}", message);
        ProviderError::CommandFailed {
            command: "az account get-access-token".to_string(),
        }
    })
}

/// [`ResourceSource`] backed by [`AzureClient::list`]
pub struct ArmSource<R> {
    client: Arc<AzureClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> ArmSource<R> {
    pub fn new(client: Arc<AzureClient>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: ArmResource> ResourceSource<R> for ArmSource<R> {
    async fn list(&self, scope: &Scope) -> Result<Vec<R>, ProviderError> {
        self.client.list::<R>(scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUB: &str = "3f2c1a9e-6b1d-4c1e-9d0a-2b7e5c8f1a23";

    fn client(endpoint: &str) -> AzureClient {
        let settings = AzureSettings {
            endpoint: endpoint.to_string(),
            request_timeout_secs: 5,
        };
        AzureClient::new(&settings).unwrap().with_token("test-token")
    }

    #[test]
    fn test_list_url_for_subscription() {
        let client = client("https://management.azure.com/");
        assert_eq!(
            client.list_url(&Scope::subscription(SUB), "Microsoft.KeyVault/vaults", "2022-07-01"),
            format!(
                "https://management.azure.com/subscriptions/{}/providers/Microsoft.KeyVault/vaults?api-version=2022-07-01",
                SUB
            )
        );
    }

    #[test]
    fn test_list_url_for_resource_group() {
        let client = client("https://management.chinacloudapi.cn");
        let url = client.list_url(
            &Scope::resource_group(SUB, "rg-apps"),
            "Microsoft.Web/serverfarms",
            "2022-09-01",
        );
        assert_eq!(
            url,
            format!(
                "https://management.chinacloudapi.cn/subscriptions/{}/resourceGroups/rg-apps/providers/Microsoft.Web/serverfarms?api-version=2022-09-01",
                SUB
            )
        );
    }

    #[test]
    fn test_diagnostic_settings_url() {
        let client = client("https://management.azure.com");
        let url = client.diagnostic_settings_url("/subscriptions/s/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/kv-a");
        assert_eq!(
            url,
            "https://management.azure.com/subscriptions/s/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/kv-a/providers/Microsoft.Insights/diagnosticSettings?api-version=2021-05-01-preview"
        );
    }

    #[test]
    fn test_parse_page_with_next_link() {
        let json = r#"{ "value": [ { "id": "/a", "name": "kv-a" } ], "nextLink": "https://next" }"#;
        let page: ArmPage<kv::KeyVault> = serde_json::from_str(json).unwrap();
        assert_eq!(page.value.len(), 1);
        assert_eq!(page.next_link.as_deref(), Some("https://next"));
    }

    #[test]
    fn test_parse_empty_page() {
        let page: ArmPage<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }

    #[test]
    fn test_next_page_follows_link_on_endpoint() {
        let client = client("https://management.azure.com/");
        let link = "https://management.azure.com/subscriptions/s/providers/Microsoft.KeyVault/vaults?api-version=2022-07-01&$skiptoken=abc";
        assert_eq!(
            client.next_page(Some(link.to_string()), &HashSet::new()).unwrap().as_deref(),
            Some(link)
        );
        assert!(client.next_page(None, &HashSet::new()).unwrap().is_none());
        assert!(client.next_page(Some(String::new()), &HashSet::new()).unwrap().is_none());
    }

    #[test]
    fn test_next_page_rejects_other_hosts() {
        let client = client("https://management.azure.com");
        for link in [
            "https://attacker.example/subscriptions/s",
            "https://management.azure.com.attacker.example/subscriptions/s",
            "http://management.azure.com/subscriptions/s",
        ] {
            match client.next_page(Some(link.to_string()), &HashSet::new()) {
                Err(ProviderError::UntrustedLink { link: rejected, endpoint }) => {
                    assert_eq!(rejected, link);
                    assert_eq!(endpoint, "https://management.azure.com");
                }
                other => panic!("expected untrusted link error for {}, got {:?}", link, other),
            }
        }
    }

    #[test]
    fn test_next_page_stops_on_repeated_link() {
        let client = client("https://management.azure.com");
        let link = "https://management.azure.com/subscriptions/s/providers/X?page=2".to_string();
        let visited: HashSet<String> = [link.clone()].into_iter().collect();
        assert!(client.next_page(Some(link), &visited).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fixed_token_is_used() {
        let client = client("https://management.azure.com");
        assert_eq!(client.token().await.unwrap(), "test-token");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let client = client("http://127.0.0.1:9");
        let err = client
            .has_diagnostics("/subscriptions/s/resourceGroups/rg/providers/X/y/z")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Http { .. }));
    }
}
