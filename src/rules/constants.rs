//! Rule category names and scanner-name validation

use colored::Colorize;

pub const MONITORING_AND_LOGGING: &str = "Monitoring and Logging";
pub const HIGH_AVAILABILITY: &str = "High Availability and Resiliency";
pub const SECURITY: &str = "Security";
pub const GOVERNANCE: &str = "Governance";

/// Valid scanner names for the --services option
pub const VALID_SCANNERS: &[&str] = &["kv", "agw", "cae", "plan"];

/// Check if a scanner name is valid
pub fn is_valid_scanner(name: &str) -> bool {
    VALID_SCANNERS.contains(&name)
}

/// Filter a list of scanner names, returning only valid ones and printing warnings for invalid ones
pub fn filter_valid_scanners(names: Vec<String>) -> Vec<String> {
    let mut valid = Vec::new();
    for name in names {
        if is_valid_scanner(&name) {
            valid.push(name);
        } else {
            eprintln!(
                "{} Unknown service '{}' ignored. Valid services: {}",
                "Warning:".yellow(),
                name.cyan(),
                VALID_SCANNERS.join(", ").dimmed()
            );
        }
    }
    valid
}
