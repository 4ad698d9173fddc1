//! Exit codes for the CLI
//!
//! | Code | Constant | Meaning |
//! |------|----------|---------|
//! | 0 | `SUCCESS` | Every rule passed |
//! | 1 | `CRITICAL_ISSUES` | At least one high-severity rule violated |
//! | 2 | `WARNINGS` | Other violations, or rules left undetermined |
//! | 3 | `ERROR` | Runtime error, or a scanner failed or was cancelled |
//! | 4 | `INVALID_ARGS` | Malformed scope, unknown services, bad configuration |

use crate::error::{AzqrError, ScanError};

pub const SUCCESS: i32 = 0;

pub const CRITICAL_ISSUES: i32 = 1;

pub const WARNINGS: i32 = 2;

pub const ERROR: i32 = 3;

pub const INVALID_ARGS: i32 = 4;

/// Exit code for a command that returned an error
pub fn for_error(error: &AzqrError) -> i32 {
    match error {
        AzqrError::Scan(ScanError::InvalidScope { .. }) | AzqrError::Config(_) => INVALID_ARGS,
        _ => ERROR,
    }
}
