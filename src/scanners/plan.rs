//! App Service plan rules

use std::sync::Arc;

use serde::Deserialize;

use super::{Resource, ResourceScanner, ResourceSource};
use crate::rules::constants::{GOVERNANCE, HIGH_AVAILABILITY, MONITORING_AND_LOGGING};
use crate::rules::rule::{caf_prefix, Check, Evaluation, Rule, RuleCatalog};
use crate::rules::Severity;

pub const SCANNER_NAME: &str = "plan";

/// Tiers without a financially backed SLA
const NO_SLA_TIERS: &[&str] = &["Free", "Shared"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppServicePlan {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub location: Option<String>,
    pub sku: Option<PlanSku>,
    pub properties: Option<PlanProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanSku {
    pub name: Option<String>,
    pub tier: Option<String>,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProperties {
    pub zone_redundant: Option<bool>,
}

impl Resource for AppServicePlan {
    const RESOURCE_TYPE: &'static str = "Microsoft.Web/serverfarms";

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

pub fn scanner(source: Arc<dyn ResourceSource<AppServicePlan>>) -> ResourceScanner<AppServicePlan> {
    ResourceScanner::new(SCANNER_NAME, rules(), source)
}

fn sla(plan: &AppServicePlan) -> Evaluation {
    match plan.sku.as_ref().and_then(|s| s.tier.as_deref()) {
        Some(tier) if NO_SLA_TIERS.contains(&tier) => Evaluation::check(true, "None"),
        Some(_) => Evaluation::observed("99.95%"),
        None => Evaluation::undetermined("sku tier not reported"),
    }
}

pub fn rules() -> RuleCatalog<AppServicePlan> {
    RuleCatalog::new(vec![
        Rule {
            name: "DiagnosticSettings",
            id: "plan-001",
            category: MONITORING_AND_LOGGING,
            subcategory: "Diagnostic Logs",
            description: "App Service Plan should have diagnostic settings enabled",
            severity: Severity::Medium,
            check: Check::Diagnostics,
            url: "https://learn.microsoft.com/en-us/azure/app-service/troubleshoot-diagnostic-logs",
        },
        Rule {
            name: "AvailabilityZones",
            id: "plan-002",
            category: HIGH_AVAILABILITY,
            subcategory: "Availability Zones",
            description: "App Service Plan should have availability zones enabled",
            severity: Severity::High,
            check: Check::field(|plan: &AppServicePlan| match &plan.properties {
                Some(props) => Evaluation::compliant_if(props.zone_redundant.unwrap_or(false)),
                None => Evaluation::undetermined("properties not reported"),
            }),
            url: "https://learn.microsoft.com/en-us/azure/reliability/migrate-app-service",
        },
        Rule {
            name: "SLA",
            id: "plan-003",
            category: HIGH_AVAILABILITY,
            subcategory: "SLA",
            description: "App Service Plan should have a SLA",
            severity: Severity::High,
            check: Check::field(sla),
            url: "https://www.azure.cn/en-us/support/sla/app-service/",
        },
        Rule {
            name: "SKU",
            id: "plan-004",
            category: HIGH_AVAILABILITY,
            subcategory: "SKU",
            description: "App Service Plan SKU",
            severity: Severity::High,
            check: Check::field(|plan: &AppServicePlan| {
                match plan.sku.as_ref().and_then(|s| s.name.as_deref()) {
                    Some(name) => Evaluation::observed(name),
                    None => Evaluation::undetermined("sku not reported"),
                }
            }),
            url: "https://learn.microsoft.com/en-us/azure/app-service/overview-hosting-plans",
        },
        Rule {
            name: "CAF",
            id: "plan-005",
            category: GOVERNANCE,
            subcategory: "Naming Convention (CAF)",
            description: "App Service Plan Name should comply with naming conventions",
            severity: Severity::Low,
            check: Check::field(|plan: &AppServicePlan| caf_prefix(&plan.name, "asp")),
            url: "https://learn.microsoft.com/en-us/azure/cloud-adoption-framework/ready/azure-best-practices/resource-abbreviations",
        },
        Rule {
            name: "Instances",
            id: "plan-006",
            category: HIGH_AVAILABILITY,
            subcategory: "Instances",
            description: "App Service Plan should run more than one instance",
            severity: Severity::Medium,
            check: Check::field(|plan: &AppServicePlan| {
                match plan.sku.as_ref().and_then(|s| s.capacity) {
                    Some(capacity) => Evaluation::check(capacity < 2, capacity.to_string()),
                    None => Evaluation::undetermined("sku capacity not reported"),
                }
            }),
            url: "https://learn.microsoft.com/en-us/azure/app-service/manage-scale-up",
        },
    ])
}
