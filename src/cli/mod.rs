//! # CLI Module
//!
//! Command-line interface for azqr, built with `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Evaluate best-practice rules against a subscription or resource group |
//! | `rules` | List the rule catalog |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file (defaults to `.azqr.toml`)
//!
//! ## Examples
//!
//! ```bash
//! # Scan a subscription
//! azqr scan -s 3f2c1a9e-6b1d-4c1e-9d0a-2b7e5c8f1a23
//!
//! # Key Vaults and Application Gateways of one resource group, as JSON
//! azqr scan -s 3f2c1a9e-6b1d-4c1e-9d0a-2b7e5c8f1a23 -g rg-prod --services kv,agw -f json -o report.json
//!
//! # Show the rule catalog
//! azqr rules
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{RulesArgs, ScanArgs};

/// azqr - Azure best-practice rule evaluation
#[derive(Parser, Debug)]
#[command(name = "azqr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan Azure resources against the rule catalog
    Scan(ScanArgs),

    /// List the rules each scanner evaluates
    Rules(RulesArgs),
}
