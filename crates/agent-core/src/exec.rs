//! Bounded command execution shared by the `execute` tool and dynamic tools.

use agent_types::ToolError;
use crate::ports::ShellPort;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Missing or non-positive values select the default; values above the
/// maximum are clamped to it.
pub fn clamp_timeout(requested: Option<i64>) -> u64 {
    match requested {
        Some(secs) if secs > 0 => (secs as u64).min(MAX_TIMEOUT_SECS),
        _ => DEFAULT_TIMEOUT_SECS,
    }
}

/// Run a command through the shell port and render the captured result as
/// pretty JSON (`stdout`, `stderr`, `exit_code`).
pub async fn run_command(
    shell: &dyn ShellPort,
    command: &str,
    timeout_secs: u64,
) -> Result<String, ToolError> {
    if command.trim().is_empty() {
        return Err(ToolError::EmptyCommand);
    }

    log::debug!("running command with {}s deadline: {}", timeout_secs, command);
    let result = shell.execute(command, timeout_secs).await?;
    log::debug!("command exited with {}", result.exit_code);

    Ok(serde_json::to_string_pretty(&result)?)
}
