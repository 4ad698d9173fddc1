//! Container Apps environment rules

use std::sync::Arc;

use serde::Deserialize;

use super::{Resource, ResourceScanner, ResourceSource};
use crate::rules::constants::{GOVERNANCE, HIGH_AVAILABILITY, MONITORING_AND_LOGGING, SECURITY};
use crate::rules::rule::{caf_prefix, Check, Evaluation, Rule, RuleCatalog};
use crate::rules::Severity;

pub const SCANNER_NAME: &str = "cae";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedEnvironment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub location: Option<String>,
    pub properties: Option<EnvironmentProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentProperties {
    pub zone_redundant: Option<bool>,
    pub vnet_configuration: Option<VnetConfiguration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnetConfiguration {
    pub internal: Option<bool>,
    pub infrastructure_subnet_id: Option<String>,
}

impl Resource for ManagedEnvironment {
    const RESOURCE_TYPE: &'static str = "Microsoft.App/managedEnvironments";

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

pub fn scanner(
    source: Arc<dyn ResourceSource<ManagedEnvironment>>,
) -> ResourceScanner<ManagedEnvironment> {
    ResourceScanner::new(SCANNER_NAME, rules(), source)
}

pub fn rules() -> RuleCatalog<ManagedEnvironment> {
    RuleCatalog::new(vec![
        Rule {
            name: "DiagnosticSettings",
            id: "cae-001",
            category: MONITORING_AND_LOGGING,
            subcategory: "Diagnostic Logs",
            description: "Container Apps Environment should have diagnostic settings enabled",
            severity: Severity::Medium,
            check: Check::Diagnostics,
            url: "https://learn.microsoft.com/en-us/azure/container-apps/log-options#diagnostic-settings",
        },
        Rule {
            name: "AvailabilityZones",
            id: "cae-002",
            category: HIGH_AVAILABILITY,
            subcategory: "Availability Zones",
            description: "Container Apps Environment should have availability zones enabled",
            severity: Severity::High,
            check: Check::field(|env: &ManagedEnvironment| match &env.properties {
                Some(props) => Evaluation::compliant_if(props.zone_redundant.unwrap_or(false)),
                None => Evaluation::undetermined("properties not reported"),
            }),
            url: "https://learn.microsoft.com/en-us/azure/container-apps/disaster-recovery",
        },
        Rule {
            name: "SLA",
            id: "cae-003",
            category: HIGH_AVAILABILITY,
            subcategory: "SLA",
            description: "Container Apps should have a SLA",
            severity: Severity::High,
            check: Check::Informational {
                violated: false,
                evidence: "99.95%",
            },
            url: "https://azure.microsoft.com/en-us/support/legal/sla/container-apps/v1_0/",
        },
        Rule {
            name: "Private",
            id: "cae-004",
            category: SECURITY,
            subcategory: "Networking",
            description: "Container Apps Environment should have private endpoints enabled",
            severity: Severity::High,
            check: Check::field(|env: &ManagedEnvironment| match &env.properties {
                Some(props) => Evaluation::compliant_if(
                    props
                        .vnet_configuration
                        .as_ref()
                        .and_then(|v| v.internal)
                        .unwrap_or(false),
                ),
                None => Evaluation::undetermined("properties not reported"),
            }),
            url: "https://learn.microsoft.com/en-us/azure/container-apps/vnet-custom-internal",
        },
        Rule {
            name: "CAF",
            id: "cae-005",
            category: GOVERNANCE,
            subcategory: "Naming Convention (CAF)",
            description: "Container Apps Environment Name should comply with naming conventions",
            severity: Severity::Low,
            check: Check::field(|env: &ManagedEnvironment| caf_prefix(&env.name, "cae")),
            url: "https://learn.microsoft.com/en-us/azure/cloud-adoption-framework/ready/azure-best-practices/resource-abbreviations",
        },
    ])
}
