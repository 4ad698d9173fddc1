//! Configuration loader

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{AzqrError, ConfigError};

use super::{AzureSettings, RuleConfig, ScanSettings};

const CONFIG_FILENAME: &str = ".azqr.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub azure: AzureSettings,

    /// Rule overrides keyed by rule id
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Load `.azqr.toml` from the working directory, or the defaults
    pub fn load_or_default() -> Result<Self, AzqrError> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, AzqrError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.max_parallel_scanners == 0 {
            return Err(ConfigError::Invalid {
                message: "scan.max_parallel_scanners must be at least 1".to_string(),
            });
        }
        if self.scan.max_concurrent_evaluations == 0 {
            return Err(ConfigError::Invalid {
                message: "scan.max_concurrent_evaluations must be at least 1".to_string(),
            });
        }
        if self.azure.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "azure.request_timeout_secs must be at least 1".to_string(),
            });
        }
        if !self.azure.endpoint.starts_with("https://") && !self.azure.endpoint.starts_with("http://") {
            return Err(ConfigError::Invalid {
                message: format!("azure.endpoint '{}' is not an http(s) URL", self.azure.endpoint),
            });
        }
        Ok(())
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules.get(rule_id).map(|r| r.enabled).unwrap_or(true)
    }

    /// Ids of every rule switched off in the configuration
    pub fn disabled_rules(&self) -> HashSet<String> {
        self.rules
            .iter()
            .filter(|(_, rule)| !rule.enabled)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.max_parallel_scanners, 4);
        assert_eq!(config.scan.max_concurrent_evaluations, 16);
        assert!(config.scan.services.is_empty());
        assert_eq!(config.azure.endpoint, "https://management.azure.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_document() {
        let config = Config::from_toml(
            r#"
[scan]
max_parallel_scanners = 2
services = ["kv", "agw"]

[azure]
endpoint = "https://management.usgovcloudapi.net"

[rules."kv-006"]
enabled = false
"#,
        )
        .unwrap();

        assert_eq!(config.scan.max_parallel_scanners, 2);
        assert_eq!(config.scan.max_concurrent_evaluations, 16);
        assert_eq!(config.scan.services, vec!["kv", "agw"]);
        assert_eq!(config.azure.request_timeout_secs, 30);
        assert!(!config.is_rule_enabled("kv-006"));
        assert!(config.is_rule_enabled("kv-001"));
        assert_eq!(config.disabled_rules(), HashSet::from(["kv-006".to_string()]));
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let err = Config::from_toml("[scan]\nmax_parallel_scanners = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let err = Config::from_toml("[azure]\nendpoint = \"management.azure.com\"\n").unwrap_err();
        assert!(err.to_string().contains("azure.endpoint"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Config::from_toml("[scan\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[rules.\"agw-005\"]\nenabled = false").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert!(!config.is_rule_enabled("agw-005"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load_from_file(Path::new("/nonexistent/.azqr.toml")).unwrap_err();
        assert!(matches!(err, AzqrError::Config(ConfigError::FileRead { .. })));
    }
}
