//! Shared per-scan state passed to every rule evaluation

use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{CacheStats, DiagnosticsCache, DiagnosticsLookup};
use crate::error::ScanError;

const DEFAULT_MAX_CONCURRENT_EVALUATIONS: usize = 16;

/// State shared by all scanners and rules during one scan invocation.
///
/// Created fresh by the orchestrator for each scan and dropped once results
/// are returned; caches never outlive the scan.
pub struct ScanContext {
    diagnostics: DiagnosticsCache,
    disabled_rules: HashSet<String>,
    max_concurrent_evaluations: usize,
}

impl ScanContext {
    pub fn new(lookup: Arc<dyn DiagnosticsLookup>) -> Self {
        Self {
            diagnostics: DiagnosticsCache::new(lookup),
            disabled_rules: HashSet::new(),
            max_concurrent_evaluations: DEFAULT_MAX_CONCURRENT_EVALUATIONS,
        }
    }

    /// Skip the given rule ids in every scanner
    pub fn with_disabled_rules(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.disabled_rules = ids.into_iter().collect();
        self
    }

    /// Bound the number of in-flight evaluations per scanner
    pub fn with_max_concurrent_evaluations(mut self, max: usize) -> Self {
        self.max_concurrent_evaluations = max.max(1);
        self
    }

    /// Whether the resource has diagnostic settings (memoized, single-flight)
    pub async fn has_diagnostics(&self, resource_id: &str) -> Result<bool, ScanError> {
        self.diagnostics.has_diagnostics(resource_id).await
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.contains(rule_id)
    }

    pub fn max_concurrent_evaluations(&self) -> usize {
        self.max_concurrent_evaluations
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.diagnostics.stats()
    }
}
