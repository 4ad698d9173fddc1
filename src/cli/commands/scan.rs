//! Scan command - evaluate the rule catalog against live Azure resources

use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use super::{OutputFormat, ScanArgs};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, ReportRenderer, TerminalOutput};
use crate::config::Config;
use crate::error::AzqrError;
use crate::providers::azure::AzureClient;
use crate::rules::constants::filter_valid_scanners;
use crate::rules::engine::ScanOrchestrator;
use crate::rules::results::ScanReport;
use crate::scanners::{ScannerRegistry, Scope};
use crate::utils::cancel::cancel_pair;

pub async fn execute(args: ScanArgs, config_path: Option<&Path>) -> Result<i32, AzqrError> {
    let config = match config_path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_or_default()?,
    };

    let scope = Scope {
        subscription_id: args.subscription.clone(),
        resource_group: args.resource_group.clone(),
    };
    scope.validate()?;

    let client = Arc::new(AzureClient::new(&config.azure)?);
    let registry = ScannerRegistry::azure(Arc::clone(&client));

    let mut orchestrator = ScanOrchestrator::new(client, config.clone());
    let services = args.services.unwrap_or_else(|| config.scan.services.clone());
    if !services.is_empty() {
        let services = filter_valid_scanners(services);
        if services.is_empty() {
            eprintln!("{} No valid services selected.", "Error:".red().bold());
            return Ok(exit_codes::INVALID_ARGS);
        }
        orchestrator.set_only_scanners(services);
    }
    if let Some(skip) = args.skip {
        orchestrator.set_skip_scanners(filter_valid_scanners(skip));
    }

    let (cancel, signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling scan");
            cancel.cancel();
        }
    });

    let report = orchestrator.run(registry.scanners(), &scope, &signal).await?;

    let renderer: Box<dyn ReportRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    let rendered = renderer.render_report(&report)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|e| AzqrError::FileWrite {
                path: path.display().to_string(),
                source: e,
            })?;
            eprintln!(
                "{} Report written to: {}",
                "Success:".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(exit_code_for(&report))
}

/// Exit code for a finished scan; an incomplete scan outranks violations
pub fn exit_code_for(report: &ScanReport) -> i32 {
    if !report.is_complete() {
        exit_codes::ERROR
    } else if report.has_high_severity_violations() {
        exit_codes::CRITICAL_ISSUES
    } else if !report.is_clean() {
        exit_codes::WARNINGS
    } else {
        exit_codes::SUCCESS
    }
}
