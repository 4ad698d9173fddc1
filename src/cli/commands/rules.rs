//! Rules command - print the rule catalog of the selected scanners

use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use super::{OutputFormat, RulesArgs};
use crate::cli::exit_codes;
use crate::cli::output::{CatalogRenderer, JsonOutput, TerminalOutput};
use crate::config::Config;
use crate::error::AzqrError;
use crate::providers::azure::AzureClient;
use crate::rules::constants::filter_valid_scanners;
use crate::scanners::ScannerRegistry;

pub async fn execute(args: RulesArgs, config_path: Option<&Path>) -> Result<i32, AzqrError> {
    let config = match config_path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_or_default()?,
    };

    // Listing the catalog never reaches Azure; the client only wires the sources
    let client = Arc::new(AzureClient::new(&config.azure)?);
    let registry = ScannerRegistry::azure(client);
    registry.validate()?;

    let requested = args.services.unwrap_or_default();
    let selected = if requested.is_empty() {
        registry
    } else {
        let services = filter_valid_scanners(requested);
        if services.is_empty() {
            eprintln!("{} No valid services selected.", "Error:".red().bold());
            return Ok(exit_codes::INVALID_ARGS);
        }
        registry.select(&services)
    };
    let catalog = selected.catalog();

    let renderer: Box<dyn CatalogRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    println!("{}", renderer.render_catalog(&catalog)?);

    Ok(exit_codes::SUCCESS)
}
