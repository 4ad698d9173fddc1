//! CLI commands module

pub mod rules;
pub mod scan;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Subscription id to scan
    #[arg(short, long, value_name = "SUBSCRIPTION_ID", env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription: String,

    /// Restrict the scan to one resource group
    #[arg(short = 'g', long, value_name = "NAME")]
    pub resource_group: Option<String>,

    /// Only run these scanners (kv, agw, cae, plan)
    #[arg(long, value_delimiter = ',')]
    pub services: Option<Vec<String>>,

    /// Skip these scanners
    #[arg(long, value_delimiter = ',')]
    pub skip: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the rules command
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Only list rules of these scanners
    #[arg(long, value_delimiter = ',')]
    pub services: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
