//! Subscription / resource-group boundary of a scan

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScanError;

lazy_static! {
    static ref SUBSCRIPTION_ID: Regex =
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("subscription id pattern is valid");
    static ref RESOURCE_GROUP: Regex =
        Regex::new(r"^[-\w.()]{1,90}$").expect("resource group pattern is valid");
}

/// The boundary within which scanners enumerate resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub subscription_id: String,
    pub resource_group: Option<String>,
}

impl Scope {
    /// Scope covering a whole subscription
    pub fn subscription(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: None,
        }
    }

    /// Scope covering one resource group
    pub fn resource_group(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: Some(resource_group.into()),
        }
    }

    /// Reject malformed scopes before any remote call is made
    pub fn validate(&self) -> Result<(), ScanError> {
        if !SUBSCRIPTION_ID.is_match(&self.subscription_id) {
            return Err(ScanError::InvalidScope {
                reason: format!(
                    "subscription id '{}' is not a GUID",
                    self.subscription_id
                ),
            });
        }

        if let Some(rg) = &self.resource_group {
            if !RESOURCE_GROUP.is_match(rg) || rg.ends_with('.') {
                return Err(ScanError::InvalidScope {
                    reason: format!("resource group name '{}' is invalid", rg),
                });
            }
        }

        Ok(())
    }

    /// ARM path prefix for this scope
    pub fn arm_path(&self) -> String {
        match &self.resource_group {
            Some(rg) => format!(
                "/subscriptions/{}/resourceGroups/{}",
                self.subscription_id, rg
            ),
            None => format!("/subscriptions/{}", self.subscription_id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource_group {
            Some(rg) => write!(f, "{}/{}", self.subscription_id, rg),
            None => write!(f, "{}", self.subscription_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUB: &str = "3f2c1a9e-6b1d-4c1e-9d0a-2b7e5c8f1a23";

    #[test]
    fn test_valid_scopes() {
        assert!(Scope::subscription(SUB).validate().is_ok());
        assert!(Scope::resource_group(SUB, "rg-prod_01").validate().is_ok());
        assert!(Scope::resource_group(SUB, "rg.(legacy)").validate().is_ok());
    }

    #[test]
    fn test_invalid_subscription() {
        for bad in ["", "not-a-guid", "3f2c1a9e6b1d4c1e9d0a2b7e5c8f1a23", "/subscriptions/x"] {
            let err = Scope::subscription(bad).validate().unwrap_err();
            assert!(matches!(err, ScanError::InvalidScope { .. }), "{}", bad);
        }
    }

    #[test]
    fn test_invalid_resource_group() {
        assert!(Scope::resource_group(SUB, "").validate().is_err());
        assert!(Scope::resource_group(SUB, "ends-with-dot.").validate().is_err());
        assert!(Scope::resource_group(SUB, "has/slash").validate().is_err());
        assert!(Scope::resource_group(SUB, "a".repeat(91)).validate().is_err());
    }

    #[test]
    fn test_arm_path() {
        assert_eq!(
            Scope::subscription(SUB).arm_path(),
            format!("/subscriptions/{}", SUB)
        );
        assert_eq!(
            Scope::resource_group(SUB, "rg").arm_path(),
            format!("/subscriptions/{}/resourceGroups/rg", SUB)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Scope::resource_group(SUB, "rg").to_string(), format!("{}/rg", SUB));
    }
}
