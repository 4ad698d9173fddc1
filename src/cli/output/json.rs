//! JSON output formatting

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CatalogRenderer, ReportRenderer};
use crate::error::AzqrError;
use crate::rules::results::{Outcome, ScanReport, ScanResult, ScannerFailure, Severity};
use crate::rules::rule::RuleInfo;
use crate::scanners::Scope;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    version: &'static str,
    scope: &'a Scope,
    generated_at: DateTime<Utc>,
    complete: bool,
    summary: Summary,
    results: &'a [ScanResult],
    failures: &'a [ScannerFailure],
    incomplete: &'a [String],
}

#[derive(Serialize)]
struct Summary {
    total: usize,
    passed: usize,
    violated: usize,
    undetermined: usize,
    high_violations: usize,
    medium_violations: usize,
    low_violations: usize,
}

#[derive(Serialize)]
struct CatalogOutput<'a> {
    version: &'static str,
    rules: &'a [RuleInfo],
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, report: &ScanReport) -> Result<String, AzqrError> {
        let output = ReportOutput {
            version: env!("CARGO_PKG_VERSION"),
            scope: &report.scope,
            generated_at: report.generated_at,
            complete: report.is_complete(),
            summary: Summary {
                total: report.total_count(),
                passed: report.count_by_outcome(Outcome::Passed),
                violated: report.count_by_outcome(Outcome::Violated),
                undetermined: report.count_by_outcome(Outcome::Undetermined),
                high_violations: report.count_violations(Severity::High),
                medium_violations: report.count_violations(Severity::Medium),
                low_violations: report.count_violations(Severity::Low),
            },
            results: report.results(),
            failures: report.failures(),
            incomplete: report.incomplete(),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

impl CatalogRenderer for JsonOutput {
    fn render_catalog(&self, rules: &[RuleInfo]) -> Result<String, AzqrError> {
        let output = CatalogOutput {
            version: env!("CARGO_PKG_VERSION"),
            rules,
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}
