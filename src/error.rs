//! Error types for azqr
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.

use thiserror::Error;

/// Main error type for azqr
#[derive(Error, Debug)]
pub enum AzqrError {
    /// Scan-related errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Azure API errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write a report or other output file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        /// Path that could not be written
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors that occur while scanning resources
#[derive(Error, Debug)]
pub enum ScanError {
    /// The subscription/resource-group scope is malformed
    #[error("Invalid scan scope: {reason}")]
    InvalidScope {
        /// Why the scope was rejected
        reason: String,
    },

    /// Two rules in the catalog share the same id
    #[error("Rule id '{id}' is registered more than once")]
    DuplicateRuleId {
        /// The duplicated rule id
        id: String,
    },

    /// The resource enumeration call for a scanner failed
    #[error("Failed to fetch resources for scanner '{scanner}': {source}")]
    Fetch {
        /// Name of the scanner whose fetch failed
        scanner: String,
        /// The underlying provider error
        source: ProviderError,
    },

    /// The remote diagnostic-settings lookup failed
    #[error("Diagnostic settings lookup failed for '{resource_id}': {message}")]
    RemoteLookup {
        /// Resource whose lookup failed
        resource_id: String,
        /// Error reported by the remote query
        message: String,
    },
}

/// Errors from the Azure Resource Manager collaborator
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No usable credentials could be obtained
    #[error("Not authenticated: {message}")]
    Authentication {
        /// Details of the authentication failure
        message: String,
    },

    /// The HTTP request could not be sent or completed
    #[error("Request to '{url}' failed: {source}")]
    Http {
        /// Requested URL
        url: String,
        /// The underlying HTTP client error
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("Request to '{url}' returned status {status}: {body}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The API response could not be decoded
    #[error("Failed to parse response from '{url}': {message}")]
    Parse {
        /// Requested URL
        url: String,
        /// Decoder message
        message: String,
    },

    /// A paging link pointed away from the configured endpoint
    #[error("Refusing to follow nextLink '{link}' outside '{endpoint}'")]
    UntrustedLink {
        /// The link returned by the API
        link: String,
        /// The configured ARM endpoint
        endpoint: String,
    },

    /// An external command failed
    #[error("Command failed: {command}")]
    CommandFailed {
        /// The command line that failed
        command: String,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration value is out of range
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// What is wrong with the value
        message: String,
    },
}

impl From<toml::de::Error> for AzqrError {
    fn from(err: toml::de::Error) -> Self {
        AzqrError::Config(ConfigError::Parse(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::RemoteLookup {
            resource_id: "/subscriptions/x/kv".to_string(),
            message: "throttled".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Diagnostic settings lookup failed for '/subscriptions/x/kv': throttled"
        );
    }

    #[test]
    fn test_fetch_error_wraps_provider_error() {
        let err = ScanError::Fetch {
            scanner: "kv".to_string(),
            source: ProviderError::Status {
                url: "https://management.azure.com/x".to_string(),
                status: 403,
                body: "Forbidden".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.contains("'kv'"));
        assert!(message.contains("403"));
    }

    #[test]
    fn test_conversion_into_azqr_error() {
        let err: AzqrError = ScanError::InvalidScope {
            reason: "empty subscription id".to_string(),
        }
        .into();
        assert!(matches!(err, AzqrError::Scan(ScanError::InvalidScope { .. })));
    }
}
