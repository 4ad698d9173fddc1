//! Application Gateway rules

use std::sync::Arc;

use serde::Deserialize;

use super::{Resource, ResourceScanner, ResourceSource};
use crate::rules::constants::{GOVERNANCE, HIGH_AVAILABILITY, MONITORING_AND_LOGGING, SECURITY};
use crate::rules::rule::{caf_prefix, Check, Evaluation, Rule, RuleCatalog};
use crate::rules::Severity;

pub const SCANNER_NAME: &str = "agw";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGateway {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub location: Option<String>,
    #[serde(default)]
    pub zones: Vec<String>,
    pub properties: Option<GatewayProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayProperties {
    pub sku: Option<GatewaySku>,
    pub web_application_firewall_configuration: Option<FirewallConfiguration>,
    pub firewall_policy: Option<SubResource>,
    pub autoscale_configuration: Option<AutoscaleConfiguration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewaySku {
    pub name: Option<String>,
    pub tier: Option<String>,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirewallConfiguration {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubResource {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleConfiguration {
    pub min_capacity: Option<u32>,
    pub max_capacity: Option<u32>,
}

impl Resource for ApplicationGateway {
    const RESOURCE_TYPE: &'static str = "Microsoft.Network/applicationGateways";

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
    source: Arc<dyn ResourceSource<ApplicationGateway>>,
) -> ResourceScanner<ApplicationGateway> {
    ResourceScanner::new(SCANNER_NAME, rules(), source)
}

fn sku(gateway: &ApplicationGateway) -> Option<&GatewaySku> {
    gateway.properties.as_ref().and_then(|p| p.sku.as_ref())
}

fn waf_enabled(gateway: &ApplicationGateway) -> Evaluation {
    let Some(props) = &gateway.properties else {
        return Evaluation::undetermined("properties not reported");
    };
    let Some(tier) = props.sku.as_ref().and_then(|s| s.tier.as_deref()) else {
        return Evaluation::undetermined("sku tier not reported");
    };

    let configured = props
        .web_application_firewall_configuration
        .as_ref()
        .is_some_and(|w| w.enabled)
        || props
            .firewall_policy
            .as_ref()
            .is_some_and(|p| p.id.is_some());

    Evaluation::compliant_if(tier.starts_with("WAF") && configured)
}

pub fn rules() -> RuleCatalog<ApplicationGateway> {
    RuleCatalog::new(vec![
        Rule {
            name: "DiagnosticSettings",
            id: "agw-001",
            category: MONITORING_AND_LOGGING,
            subcategory: "Diagnostic Logs",
            description: "Application Gateway should have diagnostic settings enabled",
            severity: Severity::Medium,
            check: Check::Diagnostics,
            url: "https://learn.microsoft.com/en-us/azure/application-gateway/application-gateway-diagnostics",
        },
        Rule {
            name: "AvailabilityZones",
            id: "agw-002",
            category: HIGH_AVAILABILITY,
            subcategory: "Availability Zones",
            description: "Application Gateway should have availability zones enabled",
            severity: Severity::High,
            check: Check::field(|gateway: &ApplicationGateway| {
                Evaluation::compliant_if(gateway.zones.len() > 1)
            }),
            url: "https://learn.microsoft.com/en-us/azure/reliability/migrate-app-gateway-v2",
        },
        Rule {
            name: "SLA",
            id: "agw-003",
            category: HIGH_AVAILABILITY,
            subcategory: "SLA",
            description: "Application Gateway should have a SLA",
            severity: Severity::High,
            check: Check::Informational {
                violated: false,
                evidence: "99.95%",
            },
            url: "https://www.azure.cn/en-us/support/sla/application-gateway/",
        },
        Rule {
            name: "SKU",
            id: "agw-004",
            category: HIGH_AVAILABILITY,
            subcategory: "SKU",
            description: "Application Gateway SKU",
            severity: Severity::High,
            check: Check::field(|gateway: &ApplicationGateway| {
                match sku(gateway).and_then(|s| s.name.as_deref()) {
                    Some(name) => Evaluation::observed(name),
                    None => Evaluation::undetermined("sku not reported"),
                }
            }),
            url: "https://learn.microsoft.com/en-us/azure/application-gateway/understanding-pricing",
        },
        Rule {
            name: "CAF",
            id: "agw-005",
            category: GOVERNANCE,
            subcategory: "Naming Convention (CAF)",
            description: "Application Gateway Name should comply with naming conventions",
            severity: Severity::Low,
            check: Check::field(|gateway: &ApplicationGateway| caf_prefix(&gateway.name, "agw")),
            url: "https://learn.microsoft.com/en-us/azure/cloud-adoption-framework/ready/azure-best-practices/resource-abbreviations",
        },
        Rule {
            name: "WAF",
            id: "agw-006",
            category: SECURITY,
            subcategory: "Web Application Firewall",
            description: "Application Gateway should have a Web Application Firewall enabled",
            severity: Severity::High,
            check: Check::field(waf_enabled),
            url: "https://learn.microsoft.com/en-us/azure/web-application-firewall/ag/ag-overview",
        },
        Rule {
            name: "Autoscale",
            id: "agw-007",
            category: HIGH_AVAILABILITY,
            subcategory: "Autoscale",
            description: "Application Gateway should have autoscaling enabled",
            severity: Severity::Medium,
            check: Check::field(|gateway: &ApplicationGateway| match &gateway.properties {
                Some(props) => Evaluation::compliant_if(props.autoscale_configuration.is_some()),
                None => Evaluation::undetermined("properties not reported"),
            }),
            url: "https://learn.microsoft.com/en-us/azure/application-gateway/application-gateway-autoscaling-zone-redundant",
        },
    ])
}
