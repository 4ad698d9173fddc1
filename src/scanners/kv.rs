//! Key Vault rules

use std::sync::Arc;

use serde::Deserialize;

use super::{Resource, ResourceScanner, ResourceSource};
use crate::rules::constants::{GOVERNANCE, HIGH_AVAILABILITY, MONITORING_AND_LOGGING, SECURITY};
use crate::rules::rule::{caf_prefix, Check, Evaluation, Rule, RuleCatalog};
use crate::rules::Severity;

pub const SCANNER_NAME: &str = "kv";

/// A Key Vault as returned by the Resource Manager API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVault {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub location: Option<String>,
    pub properties: Option<VaultProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultProperties {
    pub sku: Option<VaultSku>,
    #[serde(default)]
    pub private_endpoint_connections: Vec<PrivateEndpointConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VaultSku {
    pub family: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrivateEndpointConnection {
    pub id: Option<String>,
}

impl Resource for KeyVault {
    const RESOURCE_TYPE: &'static str = "Microsoft.KeyVault/vaults";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

pub fn scanner(source: Arc<dyn ResourceSource<KeyVault>>) -> ResourceScanner<KeyVault> {
    ResourceScanner::new(SCANNER_NAME, rules(), source)
}

pub fn rules() -> RuleCatalog<KeyVault> {
    RuleCatalog::new(vec![
        Rule {
            name: "DiagnosticSettings",
            id: "kv-001",
            category: MONITORING_AND_LOGGING,
            subcategory: "Diagnostic Logs",
            description: "Key Vault should have diagnostic settings enabled",
            severity: Severity::Medium,
            check: Check::Diagnostics,
            url: "https://learn.microsoft.com/en-us/azure/key-vault/general/monitor-key-vault",
        },
        Rule {
            name: "AvailabilityZones",
            id: "kv-002",
            category: HIGH_AVAILABILITY,
            subcategory: "Availability Zones",
            description: "Key Vault should have availability zones enabled",
            severity: Severity::High,
            check: Check::Informational {
                violated: false,
                evidence: "true",
            },
            url: "https://learn.microsoft.com/en-us/azure/key-vault/general/disaster-recovery-guidance",
        },
        Rule {
            name: "SLA",
            id: "kv-003",
            category: HIGH_AVAILABILITY,
            subcategory: "SLA",
            description: "Key Vault should have a SLA",
            severity: Severity::High,
            check: Check::Informational {
                violated: false,
                evidence: "99.99%",
            },
            url: "https://www.azure.cn/en-us/support/sla/key-vault/",
        },
        Rule {
            name: "Private",
            id: "kv-004",
            category: SECURITY,
            subcategory: "Networking",
            description: "Key Vault should have private endpoints enabled",
            severity: Severity::High,
            check: Check::field(|vault: &KeyVault| match &vault.properties {
                Some(props) => {
                    Evaluation::compliant_if(!props.private_endpoint_connections.is_empty())
                }
                None => Evaluation::undetermined("properties not reported"),
            }),
            url: "https://learn.microsoft.com/en-us/azure/key-vault/general/private-link-service",
        },
        Rule {
            name: "SKU",
            id: "kv-005",
            category: HIGH_AVAILABILITY,
            subcategory: "SKU",
            description: "Key Vault SKU",
            severity: Severity::High,
            check: Check::field(|vault: &KeyVault| {
                match vault
                    .properties
                    .as_ref()
                    .and_then(|p| p.sku.as_ref())
                    .and_then(|s| s.name.as_deref())
                {
                    Some(name) => Evaluation::observed(name),
                    None => Evaluation::undetermined("sku not reported"),
                }
            }),
            url: "https://azure.microsoft.com/en-us/pricing/details/key-vault/",
        },
        Rule {
            name: "CAF",
            id: "kv-006",
            category: GOVERNANCE,
            subcategory: "Naming Convention (CAF)",
            description: "Key Vault Name should comply with naming conventions",
            severity: Severity::Low,
            check: Check::field(|vault: &KeyVault| caf_prefix(&vault.name, "kv")),
            url: "https://learn.microsoft.com/en-us/azure/cloud-adoption-framework/ready/azure-best-practices/resource-abbreviations",
        },
    ])
}
