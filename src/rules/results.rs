//! # Scan Result Structures
//!
//! This module defines the data structures produced by rule evaluation.
//!
//! ## Overview
//!
//! - [`Severity`] - Rule severity levels (Low, Medium, High)
//! - [`Outcome`] - Whether a rule passed, was violated, or could not be determined
//! - [`ScanResult`] - One evaluated (resource, rule) row
//! - [`ScanReport`] - Aggregated rows from one orchestrated scan
//!
//! ## Examples
//!
//! ```rust
//! use azqr::rules::results::{Outcome, ScanReport, Severity};
//! use azqr::scanners::Scope;
//!
//! let report = ScanReport::new(Scope::subscription("00000000-0000-0000-0000-000000000000"));
//!
//! assert!(report.is_clean());
//! assert_eq!(report.count_by_outcome(Outcome::Violated), 0);
//! assert_eq!(Severity::from_string("high"), Some(Severity::High));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rule::{Evaluation, RuleKind};
use crate::scanners::Scope;
use crate::utils::timing::ScanTiming;

/// Severity levels for rules.
///
/// - **High** - Affects availability or exposes the resource
/// - **Medium** - Reduces observability or operability
/// - **Low** - Governance and hygiene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Outcome of a single rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The resource satisfies the rule
    Passed,
    /// The resource does not satisfy the rule
    Violated,
    /// The rule could not be decided (lookup failure or missing metadata)
    Undetermined,
}

/// One evaluated (resource instance, rule) pair.
///
/// Rows are produced by scanners and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Name of the scanner that produced the row (e.g., "kv").
    pub scanner: String,

    /// Globally unique rule identifier (e.g., "kv-001").
    pub rule_id: String,

    /// Catalog key of the rule (e.g., "DiagnosticSettings").
    pub rule_name: String,

    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub severity: Severity,

    /// Whether the rule inspects the resource or reports a platform fact.
    pub kind: RuleKind,

    /// Full Azure resource identifier.
    pub resource_id: String,
    pub resource_name: String,

    /// Azure resource type (e.g., "Microsoft.KeyVault/vaults").
    pub resource_type: String,

    /// Resource group parsed from the resource identifier, when present.
    pub resource_group: Option<String>,

    pub location: Option<String>,

    pub outcome: Outcome,

    /// Human-readable value backing the outcome.
    pub evidence: String,

    pub reference_url: String,
}

impl ScanResult {
    /// Whether the rule was violated
    pub fn violated(&self) -> bool {
        self.outcome == Outcome::Violated
    }

    /// Whether the rule could not be decided
    pub fn is_undetermined(&self) -> bool {
        self.outcome == Outcome::Undetermined
    }

    /// Apply an evaluation to this row
    pub(crate) fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.outcome = evaluation.outcome;
        self.evidence = evaluation.evidence;
        self
    }
}

/// Extract the resource group segment from an ARM resource id.
pub fn resource_group_of(resource_id: &str) -> Option<String> {
    let mut segments = resource_id.split('/').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment.eq_ignore_ascii_case("resourceGroups") {
            return segments.next().map(str::to_string);
        }
    }
    None
}

/// A scanner that could not complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerFailure {
    pub scanner: String,
    pub message: String,
}

/// Aggregated results of one orchestrated scan.
///
/// Results keep the order defined by the orchestrator: scanner invocation
/// order, then rule catalog order, then resource enumeration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Scope the scan ran against.
    pub scope: Scope,

    /// When the report was created.
    pub generated_at: DateTime<Utc>,

    results: Vec<ScanResult>,

    /// Scanners whose fetch failed.
    failures: Vec<ScannerFailure>,

    /// Scanners that did not complete because the scan was cancelled.
    incomplete: Vec<String>,

    #[serde(skip)]
    timing: ScanTiming,
}

impl ScanReport {
    /// Create an empty report for a scope
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            generated_at: Utc::now(),
            results: Vec::new(),
            failures: Vec::new(),
            incomplete: Vec::new(),
            timing: ScanTiming::default(),
        }
    }

    /// Add multiple results
    pub fn add_results(&mut self, results: impl IntoIterator<Item = ScanResult>) {
        self.results.extend(results);
    }

    /// Record a scanner whose fetch failed
    pub fn add_failure(&mut self, scanner: impl Into<String>, message: impl Into<String>) {
        self.failures.push(ScannerFailure {
            scanner: scanner.into(),
            message: message.into(),
        });
    }

    /// Record a scanner that did not complete
    pub fn add_incomplete(&mut self, scanner: impl Into<String>) {
        self.incomplete.push(scanner.into());
    }

    pub fn results(&self) -> &[ScanResult] {
        &self.results
    }

    pub fn failures(&self) -> &[ScannerFailure] {
        &self.failures
    }

    pub fn incomplete(&self) -> &[String] {
        &self.incomplete
    }

    pub fn timing(&self) -> &ScanTiming {
        &self.timing
    }

    pub(crate) fn timing_mut(&mut self) -> &mut ScanTiming {
        &mut self.timing
    }

    /// Get results by outcome
    pub fn results_by_outcome(&self, outcome: Outcome) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(move |r| r.outcome == outcome)
    }

    /// Get results produced by one scanner
    pub fn results_by_scanner<'a>(
        &'a self,
        scanner: &'a str,
    ) -> impl Iterator<Item = &'a ScanResult> {
        self.results.iter().filter(move |r| r.scanner == scanner)
    }

    /// Count results by outcome
    pub fn count_by_outcome(&self, outcome: Outcome) -> usize {
        self.results_by_outcome(outcome).count()
    }

    /// Count violated results of a given severity
    pub fn count_violations(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter(|r| r.violated() && r.severity == severity)
            .count()
    }

    /// Check if any high-severity rule was violated
    pub fn has_high_severity_violations(&self) -> bool {
        self.count_violations(Severity::High) > 0
    }

    /// Check if every scanner ran to completion
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.incomplete.is_empty()
    }

    /// Check if nothing was violated or left undetermined
    pub fn is_clean(&self) -> bool {
        self.results.iter().all(|r| r.outcome == Outcome::Passed)
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }
}
