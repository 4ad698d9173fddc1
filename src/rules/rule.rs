//! Rule schema and evaluation
//!
//! A [`Rule`] is bound to the resource type of the scanner that owns it, so an
//! evaluation always receives the shape it expects. The [`Check`] attached to a
//! rule decides how it is evaluated:
//!
//! - [`Check::Field`] inspects the resource's own fields, no I/O
//! - [`Check::Diagnostics`] consults the per-scan diagnostics cache
//! - [`Check::Informational`] reports a fixed platform fact

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::context::ScanContext;
use super::results::{resource_group_of, Outcome, ScanResult, Severity};
use crate::scanners::Resource;

/// Whether a rule inspects the resource or reports a platform-level fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Computed,
    Informational,
}

/// Outcome plus evidence for one rule applied to one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub evidence: String,
}

impl Evaluation {
    /// Build an evaluation from a violated flag
    pub fn check(violated: bool, evidence: impl Into<String>) -> Self {
        Self {
            outcome: if violated {
                Outcome::Violated
            } else {
                Outcome::Passed
            },
            evidence: evidence.into(),
        }
    }

    /// Passed when `compliant` holds; the flag itself is the evidence
    pub fn compliant_if(compliant: bool) -> Self {
        Self::check(!compliant, compliant.to_string())
    }

    /// Never violated; surfaces an observed value
    pub fn observed(evidence: impl Into<String>) -> Self {
        Self::check(false, evidence)
    }

    /// The rule could not be decided
    pub fn undetermined(evidence: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Undetermined,
            evidence: evidence.into(),
        }
    }

    pub fn violated(&self) -> bool {
        self.outcome == Outcome::Violated
    }
}

/// Naming convention check: exact, case-sensitive prefix match.
pub fn caf_prefix(name: &str, prefix: &str) -> Evaluation {
    Evaluation::compliant_if(name.starts_with(prefix))
}

type FieldCheck<R> = Box<dyn Fn(&R) -> Evaluation + Send + Sync>;

/// How a rule is evaluated.
pub enum Check<R> {
    /// Inspect fields of the resource instance
    Field(FieldCheck<R>),
    /// Violated when the resource has no diagnostic settings
    Diagnostics,
    /// Fixed outcome, independent of the instance
    Informational {
        violated: bool,
        evidence: &'static str,
    },
}

impl<R> Check<R> {
    /// Box a field check
    pub fn field<F>(f: F) -> Self
    where
        F: Fn(&R) -> Evaluation + Send + Sync + 'static,
    {
        Check::Field(Box::new(f))
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Check::Informational { .. } => RuleKind::Informational,
            Check::Field(_) | Check::Diagnostics => RuleKind::Computed,
        }
    }
}

/// A named, versioned best-practice rule for resources of type `R`.
pub struct Rule<R> {
    /// Catalog key (e.g., "DiagnosticSettings")
    pub name: &'static str,
    /// Globally unique, stable identifier (e.g., "kv-001")
    pub id: &'static str,
    pub category: &'static str,
    pub subcategory: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub check: Check<R>,
    pub url: &'static str,
}

impl<R: Resource> Rule<R> {
    pub fn kind(&self) -> RuleKind {
        self.check.kind()
    }

    /// Evaluate the rule against one resource instance.
    ///
    /// Never fails: lookup errors and missing metadata become
    /// [`Outcome::Undetermined`] with the reason as evidence.
    pub async fn evaluate(&self, resource: &R, ctx: &ScanContext) -> Evaluation {
        match &self.check {
            Check::Field(f) => f(resource),
            Check::Informational { violated, evidence } => Evaluation::check(*violated, *evidence),
            Check::Diagnostics => {
                let resource_id = resource.id();
                if resource_id.is_empty() {
                    return Evaluation::undetermined("resource id not reported");
                }
                match ctx.has_diagnostics(resource_id).await {
                    Ok(has) => Evaluation::compliant_if(has),
                    Err(e) => {
                        warn!(rule = self.id, resource = resource.name(), error = %e, "Diagnostics lookup failed");
                        Evaluation::undetermined(e.to_string())
                    }
                }
            }
        }
    }

    /// Metadata view of the rule
    pub fn info(&self, scanner: &str) -> RuleInfo {
        RuleInfo {
            scanner: scanner.to_string(),
            name: self.name.to_string(),
            id: self.id.to_string(),
            category: self.category.to_string(),
            subcategory: self.subcategory.to_string(),
            description: self.description.to_string(),
            severity: self.severity,
            kind: self.kind(),
            url: self.url.to_string(),
        }
    }

    /// Build the result row for this rule and resource
    pub fn result_for(&self, scanner: &str, resource: &R, evaluation: Evaluation) -> ScanResult {
        ScanResult {
            scanner: scanner.to_string(),
            rule_id: self.id.to_string(),
            rule_name: self.name.to_string(),
            category: self.category.to_string(),
            subcategory: self.subcategory.to_string(),
            description: self.description.to_string(),
            severity: self.severity,
            kind: self.kind(),
            resource_id: resource.id().to_string(),
            resource_name: resource.name().to_string(),
            resource_type: R::RESOURCE_TYPE.to_string(),
            resource_group: resource_group_of(resource.id()),
            location: resource.location().map(str::to_string),
            outcome: Outcome::Passed,
            evidence: String::new(),
            reference_url: self.url.to_string(),
        }
        .with_evaluation(evaluation)
    }
}

/// Rule metadata, independent of the resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub scanner: String,
    pub name: String,
    pub id: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub severity: Severity,
    pub kind: RuleKind,
    pub url: String,
}

/// Ordered rule catalog for one resource type.
///
/// Iteration follows declaration order, which fixes the rule order of scan
/// results.
pub struct RuleCatalog<R> {
    rules: Vec<Rule<R>>,
}

impl<R: Resource> RuleCatalog<R> {
    pub fn new(rules: Vec<Rule<R>>) -> Self {
        Self { rules }
    }

    /// Look up a rule by catalog key
    pub fn get(&self, name: &str) -> Option<&Rule<R>> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<R>> {
        self.rules.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::StaticLookup;
    use crate::rules::context::ScanContext;
    use std::sync::Arc;

    struct Widget {
        id: String,
        name: String,
        replicas: u32,
    }

    impl Resource for Widget {
        const RESOURCE_TYPE: &'static str = "Test/widgets";

        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn widget(id: &str, name: &str, replicas: u32) -> Widget {
        Widget {
            id: id.to_string(),
            name: name.to_string(),
            replicas,
        }
    }

    fn catalog() -> RuleCatalog<Widget> {
        RuleCatalog::new(vec![
            Rule {
                name: "Replicas",
                id: "wd-001",
                category: "High Availability and Resiliency",
                subcategory: "Replicas",
                description: "Widget should run more than one replica",
                severity: Severity::High,
                check: Check::field(|w: &Widget| Evaluation::compliant_if(w.replicas > 1)),
                url: "https://example.com/replicas",
            },
            Rule {
                name: "DiagnosticSettings",
                id: "wd-002",
                category: "Monitoring and Logging",
                subcategory: "Diagnostic Logs",
                description: "Widget should have diagnostic settings enabled",
                severity: Severity::Medium,
                check: Check::Diagnostics,
                url: "https://example.com/diag",
            },
            Rule {
                name: "SLA",
                id: "wd-003",
                category: "High Availability and Resiliency",
                subcategory: "SLA",
                description: "Widget should have a SLA",
                severity: Severity::High,
                check: Check::Informational {
                    violated: false,
                    evidence: "99.9%",
                },
                url: "https://example.com/sla",
            },
        ])
    }

    fn context(with_diagnostics: &[&str]) -> ScanContext {
        ScanContext::new(Arc::new(StaticLookup::with_enabled(with_diagnostics)))
    }

    #[test]
    fn test_caf_prefix_is_case_sensitive() {
        assert_eq!(caf_prefix("kv-prod-01", "kv"), Evaluation::check(false, "true"));
        assert_eq!(caf_prefix("KV-prod-01", "kv"), Evaluation::check(true, "false"));
        assert_eq!(caf_prefix("prod-kv", "kv"), Evaluation::check(true, "false"));
        assert_eq!(caf_prefix("", "kv"), Evaluation::check(true, "false"));
    }

    #[test]
    fn test_rule_kinds() {
        let catalog = catalog();
        assert_eq!(catalog.get("Replicas").unwrap().kind(), RuleKind::Computed);
        assert_eq!(catalog.get("DiagnosticSettings").unwrap().kind(), RuleKind::Computed);
        assert_eq!(catalog.get("SLA").unwrap().kind(), RuleKind::Informational);
    }

    #[test]
    fn test_catalog_lookup_and_order() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.names(), vec!["Replicas", "DiagnosticSettings", "SLA"]);
        assert_eq!(catalog.get("DiagnosticSettings").unwrap().id, "wd-002");
        assert!(catalog.get("Missing").is_none());
    }

    #[tokio::test]
    async fn test_field_check() {
        let catalog = catalog();
        let ctx = context(&[]);
        let rule = catalog.get("Replicas").unwrap();

        let eval = rule.evaluate(&widget("/w/1", "wd-one", 3), &ctx).await;
        assert_eq!(eval, Evaluation::check(false, "true"));

        let eval = rule.evaluate(&widget("/w/2", "wd-two", 1), &ctx).await;
        assert_eq!(eval, Evaluation::check(true, "false"));
    }

    #[tokio::test]
    async fn test_diagnostics_check() {
        let catalog = catalog();
        let ctx = context(&["/w/1"]);
        let rule = catalog.get("DiagnosticSettings").unwrap();

        let eval = rule.evaluate(&widget("/w/1", "a", 1), &ctx).await;
        assert_eq!(eval, Evaluation::check(false, "true"));

        let eval = rule.evaluate(&widget("/w/2", "b", 1), &ctx).await;
        assert_eq!(eval, Evaluation::check(true, "false"));
    }

    #[tokio::test]
    async fn test_diagnostics_check_without_resource_id() {
        let catalog = catalog();
        let ctx = context(&[]);
        let rule = catalog.get("DiagnosticSettings").unwrap();

        let eval = rule.evaluate(&widget("", "a", 1), &ctx).await;
        assert_eq!(eval.outcome, Outcome::Undetermined);
        assert_eq!(eval.evidence, "resource id not reported");
    }

    #[tokio::test]
    async fn test_informational_check_ignores_instance() {
        let catalog = catalog();
        let ctx = context(&[]);
        let rule = catalog.get("SLA").unwrap();

        let first = rule.evaluate(&widget("/w/1", "a", 1), &ctx).await;
        let second = rule.evaluate(&widget("/w/2", "zzz", 9), &ctx).await;
        assert_eq!(first, Evaluation::check(false, "99.9%"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_result_for_copies_rule_metadata() {
        let catalog = catalog();
        let ctx = context(&[]);
        let rule = catalog.get("Replicas").unwrap();
        let resource = widget("/subscriptions/s/resourceGroups/rg-w/providers/Test/widgets/wd", "wd", 1);

        let eval = rule.evaluate(&resource, &ctx).await;
        let row = rule.result_for("wd", &resource, eval);

        assert_eq!(row.rule_id, "wd-001");
        assert_eq!(row.rule_name, "Replicas");
        assert_eq!(row.resource_type, "Test/widgets");
        assert_eq!(row.resource_group.as_deref(), Some("rg-w"));
        assert_eq!(row.kind, RuleKind::Computed);
        assert!(row.violated());
        assert_eq!(row.evidence, "false");
    }
}
