//! azqr Library
//!
//! Evaluates Azure resources against best-practice rules. Each resource type
//! has a scanner carrying an ordered rule catalog; the
//! [`rules::ScanOrchestrator`] runs the selected scanners against a
//! subscription or resource group and returns one ordered [`rules::ScanReport`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use azqr::config::Config;
//! use azqr::providers::azure::AzureClient;
//! use azqr::rules::ScanOrchestrator;
//! use azqr::scanners::{ScannerRegistry, Scope};
//! use azqr::utils::CancelSignal;
//!
//! # async fn run() -> Result<(), azqr::AzqrError> {
//! let config = Config::load_or_default()?;
//! let client = Arc::new(AzureClient::new(&config.azure)?);
//! let registry = ScannerRegistry::azure(client.clone());
//!
//! let orchestrator = ScanOrchestrator::new(client, config);
//! let scope = Scope::subscription("3f2c1a9e-6b1d-4c1e-9d0a-2b7e5c8f1a23");
//! let report = orchestrator
//!     .run(registry.scanners(), &scope, &CancelSignal::never())
//!     .await?;
//! println!("{} rows", report.total_count());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod providers;
pub mod rules;
pub mod scanners;
pub mod utils;

pub use error::AzqrError;
