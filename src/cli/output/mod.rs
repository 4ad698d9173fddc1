//! Output formatting module for CLI

pub mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::error::AzqrError;
use crate::rules::results::ScanReport;
use crate::rules::rule::RuleInfo;

/// Trait for rendering scan reports
pub trait ReportRenderer {
    fn render_report(&self, report: &ScanReport) -> Result<String, AzqrError>;
}

/// Trait for rendering the rule catalog
pub trait CatalogRenderer {
    fn render_catalog(&self, rules: &[RuleInfo]) -> Result<String, AzqrError>;
}
