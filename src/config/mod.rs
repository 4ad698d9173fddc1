//! Configuration module

pub mod loader;

pub use loader::Config;

use serde::{Deserialize, Serialize};

/// Per-rule override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether the rule is evaluated
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Scan tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Scanners running at the same time
    #[serde(default = "default_max_parallel_scanners")]
    pub max_parallel_scanners: usize,

    /// In-flight rule evaluations per scanner
    #[serde(default = "default_max_concurrent_evaluations")]
    pub max_concurrent_evaluations: usize,

    /// Scanner names to run; empty runs all of them
    #[serde(default)]
    pub services: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_parallel_scanners: default_max_parallel_scanners(),
            max_concurrent_evaluations: default_max_concurrent_evaluations(),
            services: Vec::new(),
        }
    }
}

fn default_max_parallel_scanners() -> usize {
    4
}

fn default_max_concurrent_evaluations() -> usize {
    16
}

/// Azure Resource Manager connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureSettings {
    /// ARM endpoint; change for sovereign clouds
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://management.azure.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}
