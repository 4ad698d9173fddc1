//! Rules module - rule schema, per-scan context, results and the scan
//! orchestrator

pub mod constants;
pub mod context;
pub mod engine;
pub mod results;
pub mod rule;

pub use context::ScanContext;
pub use engine::ScanOrchestrator;
pub use results::{Outcome, ScanReport, ScanResult, ScannerFailure, Severity};
pub use rule::{Check, Evaluation, Rule, RuleCatalog, RuleInfo, RuleKind};
