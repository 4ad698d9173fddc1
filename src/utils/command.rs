//! External command execution
//!
//! Used to shell out to the Azure CLI when no token is supplied directly.

use std::process::Command;

/// Captured output of a finished process
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `program` with `args` and capture trimmed stdout/stderr
///
/// # Errors
///
/// Returns the I/O error when the process cannot be started.
pub fn execute_command(program: &str, args: &[&str]) -> std::io::Result<CommandOutput> {
    let output = Command::new(program).args(args).output()?;

    Ok(CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Run a command and return its stdout, or a message describing the failure
pub fn execute_command_checked(program: &str, args: &[&str]) -> Result<String, String> {
    let output = execute_command(program, args)
        .map_err(|e| format!("Failed to execute '{}': {}", program, e))?;

    if output.success() {
        Ok(output.stdout)
    } else {
        Err(format!(
            "'{}' exited with code {}: {}",
            program, output.exit_code, output.stderr
        ))
    }
}
