//! # Providers Module
//!
//! Integrations with external services. The only provider today is Azure
//! Resource Manager, reached over its REST API.
//!
//! ## Authentication
//!
//! [`azure::AzureClient`] acquires a bearer token on first use:
//!
//! 1. `AZURE_ACCESS_TOKEN` when set
//! 2. otherwise `az account get-access-token` (requires `az login`)
//!
//! ## Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use azqr::config::AzureSettings;
//! use azqr::providers::azure::AzureClient;
//!
//! let client = AzureClient::new(&AzureSettings::default()).expect("client");
//! let client = Arc::new(client.with_token("eyJ0eXAi..."));
//! ```

pub mod azure;
