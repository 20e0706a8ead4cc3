//! Shell adapter — runs commands as child processes of the agent.
//!
//! POSIX hosts use `bash -c <command>`, Windows uses `cmd /C <command>`.
//! Output is captured in full; the child is killed when the deadline passes.
//!
//! On Unix the shell leads its own process group and the whole group is
//! killed on timeout, so pipelines and background jobs die with it. On
//! Windows only `cmd` itself is killed.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use agent_core::ports::ShellPort;
use agent_types::{ToolError, tool::CommandResult};

/// Shell adapter backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct ProcessShell;

impl ProcessShell {
    pub fn new() -> Self {
        Self
    }

    fn command(command: &str) -> Command {
        let (program, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("bash", "-c") };
        let mut cmd = Command::new(program);
        cmd.arg(flag)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the future on timeout must not leave the child running
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }
}

/// Kill every process in the group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    // SAFETY: killpg takes no pointers; a stale group id only yields ESRCH
    let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
    if rc != 0 {
        log::debug!("killpg {}: {}", pid, std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

#[async_trait(?Send)]
impl ShellPort for ProcessShell {
    async fn execute(&self, command: &str, timeout_secs: u64) -> Result<CommandResult, ToolError> {
        let child = Self::command(command)
            .spawn()
            .map_err(|e| ToolError::Launch(e.to_string()))?;

        // Taken before waiting: the pid is gone once the child is reaped
        let pid = child.id();

        let output = match tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            child.wait_with_output(),
        )
        .await
        {
            Ok(output) => output.map_err(|e| ToolError::Launch(e.to_string()))?,
            Err(_) => {
                log::warn!("command exceeded {}s: {}", timeout_secs, command);
                if let Some(pid) = pid {
                    kill_process_group(pid);
                }
                return Err(ToolError::Timeout(timeout_secs));
            }
        };

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // Killed by a signal: no exit code
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
