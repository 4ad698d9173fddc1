//! Registry of the scanners known to azqr

use std::collections::HashSet;
use std::sync::Arc;

use super::{agw, cae, kv, plan, Scanner};
use crate::error::ScanError;
use crate::providers::azure::{ArmSource, AzureClient};
use crate::rules::rule::RuleInfo;

/// Ordered set of scanners. Registration order is the order results are
/// reported in.
#[derive(Clone, Default)]
pub struct ScannerRegistry {
    scanners: Vec<Arc<dyn Scanner>>,
}

impl ScannerRegistry {
    /// Every built-in scanner, fetching through Azure Resource Manager
    pub fn azure(client: Arc<AzureClient>) -> Self {
        Self::from_scanners(vec![
            Arc::new(kv::scanner(Arc::new(ArmSource::<kv::KeyVault>::new(client.clone())))),
            Arc::new(agw::scanner(Arc::new(ArmSource::<agw::ApplicationGateway>::new(client.clone())))),
            Arc::new(cae::scanner(Arc::new(ArmSource::<cae::ManagedEnvironment>::new(client.clone())))),
            Arc::new(plan::scanner(Arc::new(ArmSource::<plan::AppServicePlan>::new(client)))),
        ])
    }

    pub fn from_scanners(scanners: Vec<Arc<dyn Scanner>>) -> Self {
        Self { scanners }
    }

    pub fn scanners(&self) -> &[Arc<dyn Scanner>] {
        &self.scanners
    }

    /// Keep only the named scanners; an empty selection keeps all of them
    pub fn select(&self, names: &[String]) -> Self {
        if names.is_empty() {
            return self.clone();
        }
        Self {
            scanners: self
                .scanners
                .iter()
                .filter(|s| names.iter().any(|n| n == s.name()))
                .cloned()
                .collect(),
        }
    }

    /// Rule metadata of every registered scanner, in registration order
    pub fn catalog(&self) -> Vec<RuleInfo> {
        self.scanners.iter().flat_map(|s| s.get_rules()).collect()
    }

    /// Rule ids must be unique across all scanners
    pub fn validate(&self) -> Result<(), ScanError> {
        validate_rule_ids(&self.scanners)
    }

    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }
}

/// Reject scanner sets in which two rules share an id
pub fn validate_rule_ids(scanners: &[Arc<dyn Scanner>]) -> Result<(), ScanError> {
    let mut seen = HashSet::new();
    for rule in scanners.iter().flat_map(|s| s.get_rules()) {
        if !seen.insert(rule.id.clone()) {
            return Err(ScanError::DuplicateRuleId { id: rule.id });
        }
    }
    Ok(())
}
