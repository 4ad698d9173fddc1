//! Terminal output formatting with colors

use colored::Colorize;

use super::{CatalogRenderer, ReportRenderer};
use crate::error::AzqrError;
use crate::rules::results::{Outcome, ScanReport, ScanResult, Severity};
use crate::rules::rule::{RuleInfo, RuleKind};

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, report: &ScanReport) -> String {
        let mut output = format!(
            "\n{} v{}\n\n{} {}\n",
            "azqr".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Subscription:".dimmed(),
            report.scope.subscription_id.white().bold(),
        );
        if let Some(rg) = &report.scope.resource_group {
            output.push_str(&format!("{} {}\n", "Resource group:".dimmed(), rg.yellow()));
        }
        output
    }

    fn section(&self, title: &str) -> String {
        format!("\n{}\n{}\n\n", "━".repeat(60).dimmed(), format!("  {}", title).bold())
    }

    fn format_results(&self, report: &ScanReport) -> String {
        let mut output = self.section("RESULTS");

        if report.results().is_empty() {
            output.push_str(&format!("  {}\n", "No resources found.".dimmed()));
            return output;
        }

        let mut current: Option<&str> = None;
        for result in report.results() {
            if current != Some(result.scanner.as_str()) {
                current = Some(result.scanner.as_str());
                output.push_str(&format!("{}\n", result.resource_type.bold()));
            }
            output.push_str(&self.format_result(result));
        }

        output
    }

    fn format_result(&self, result: &ScanResult) -> String {
        let marker = match result.outcome {
            Outcome::Passed => "✓".green(),
            Outcome::Violated => match result.severity {
                Severity::High => "✗".red().bold(),
                Severity::Medium => "✗".yellow(),
                Severity::Low => "✗".blue(),
            },
            Outcome::Undetermined => "?".magenta(),
        };

        format!(
            "  {} [{}] {} {} {}\n",
            marker,
            result.rule_id.cyan(),
            result.resource_name,
            "─".dimmed(),
            format!("{} ({})", result.description, result.evidence).dimmed()
        )
    }

    fn format_problems(&self, report: &ScanReport) -> String {
        if report.is_complete() {
            return String::new();
        }

        let mut output = self.section("INCOMPLETE");
        for failure in report.failures() {
            output.push_str(&format!(
                "  {} {} {}\n",
                "✗".red(),
                failure.scanner.cyan(),
                failure.message.dimmed()
            ));
        }
        for scanner in report.incomplete() {
            output.push_str(&format!("  {} {} {}\n", "…".yellow(), scanner.cyan(), "cancelled".dimmed()));
        }
        output
    }

    fn format_summary(&self, report: &ScanReport) -> String {
        let mut output = self.section("SUMMARY");

        output.push_str(&format!(
            "High: {} │ Medium: {} │ Low: {} │ Undetermined: {} │ Passed: {}\n",
            report.count_violations(Severity::High).to_string().red().bold(),
            report.count_violations(Severity::Medium).to_string().yellow().bold(),
            report.count_violations(Severity::Low).to_string().blue().bold(),
            report.count_by_outcome(Outcome::Undetermined).to_string().magenta(),
            report.count_by_outcome(Outcome::Passed).to_string().green(),
        ));

        if !report.timing().scanners().is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Duration:".dimmed(),
                report.timing().total_duration_formatted()
            ));
            for timing in report.timing().scanners() {
                output.push_str(&format!(
                    "  {} {} rows in {}\n",
                    timing.name.cyan(),
                    timing.result_count,
                    timing.duration_formatted()
                ));
            }
        }

        output
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, report: &ScanReport) -> Result<String, AzqrError> {
        let mut output = String::new();

        output.push_str(&self.format_header(report));
        output.push_str(&self.format_results(report));
        output.push_str(&self.format_problems(report));
        output.push_str(&self.format_summary(report));

        Ok(output)
    }
}

impl CatalogRenderer for TerminalOutput {
    fn render_catalog(&self, rules: &[RuleInfo]) -> Result<String, AzqrError> {
        let mut output = String::new();
        let mut current: Option<&str> = None;

        for rule in rules {
            if current != Some(rule.scanner.as_str()) {
                current = Some(rule.scanner.as_str());
                output.push_str(&self.section(&rule.scanner));
            }
            let kind = match rule.kind {
                RuleKind::Computed => "",
                RuleKind::Informational => " (informational)",
            };
            output.push_str(&format!(
                "  [{}] {:<8} {}{}\n",
                rule.id.cyan(),
                rule.severity.as_str(),
                rule.description,
                kind.dimmed()
            ));
        }

        Ok(output)
    }
}
