//! Command Execution
//!
//! `run_command` launches a process in the workspace root and returns its
//! standard output. In `Argv` mode the command string is split into words
//! and the program is started directly, so shell metacharacters are passed
//! through literally. `Shell` mode hands the whole string to the platform
//! shell and allows pipes and redirection.
//!
//! There is no timeout here: the dispatcher's deadline drops the future.
//! On unix the child leads its own process group and the whole group is
//! killed on drop, so anything a shell forked goes down with it. Elsewhere
//! `kill_on_drop` reaches the direct child only.

use std::process::{self, Stdio};

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use nexus_agent_core::OperationName;

use super::HandlerResult;
use crate::context::ToolExecutionContext;
use crate::executor::ToolOutcome;

/// How `run_command` turns its string into a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandMode {
    /// Split with shell quoting rules and exec the program directly
    #[default]
    Argv,
    /// `sh -c` (`cmd /C` on Windows)
    Shell,
}

pub async fn run_command(ctx: &ToolExecutionContext, command: &str) -> HandlerResult {
    let mut std_cmd = build_command(ctx.command_mode, command)?;
    std_cmd
        .current_dir(ctx.guard.root())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        std_cmd.process_group(0);
    }
    let mut cmd = Command::from(std_cmd);
    cmd.kill_on_drop(true);

    tracing::debug!("run_command ({:?}): {}", ctx.command_mode, command);
    let child = cmd
        .spawn()
        .map_err(|e| format!("could not start command: {}", e))?;
    let mut group = ProcessGroup::new(child.id());
    let output = child
        .wait_with_output()
        .await
        .map_err(|e| format!("could not collect command output: {}", e))?;
    group.release();

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code().unwrap_or(-1);
        return Err(format!(
            "exit code {}\n{}",
            exit_code,
            truncate_output(stderr, ctx.output_limit)
        ));
    }

    if stdout.is_empty() {
        return Ok(ToolOutcome::succeeded(
            OperationName::RunCommand,
            "command completed with no output",
        ));
    }
    Ok(ToolOutcome::ok(truncate_output(stdout, ctx.output_limit)))
}

fn build_command(mode: CommandMode, command: &str) -> Result<process::Command, String> {
    match mode {
        CommandMode::Argv => {
            let words =
                shell_words::split(command).map_err(|e| format!("could not split command: {}", e))?;
            let (program, args) = words
                .split_first()
                .ok_or_else(|| "command is empty".to_string())?;
            let mut cmd = process::Command::new(program);
            cmd.args(args);
            Ok(cmd)
        }
        CommandMode::Shell => {
            if command.trim().is_empty() {
                return Err("command is empty".to_string());
            }
            #[cfg(windows)]
            let (shell, shell_arg) = ("cmd", "/C");
            #[cfg(not(windows))]
            let (shell, shell_arg) = ("sh", "-c");

            let mut cmd = process::Command::new(shell);
            cmd.arg(shell_arg).arg(command);
            Ok(cmd)
        }
    }
}

/// Kills a child's process group when dropped before `release`.
struct ProcessGroup {
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }

    fn release(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        let Some(pgid) = self.pgid.take() else {
            return;
        };
        #[cfg(unix)]
        {
            let Ok(pgid) = libc::pid_t::try_from(pgid) else {
                return;
            };
            tracing::debug!("Killing process group {}", pgid);
            // SAFETY: kill(2) has no memory-safety preconditions.
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
        #[cfg(not(unix))]
        let _ = pgid;
    }
}

/// Cut `text` to at most `limit` characters, marking the cut.
fn truncate_output(mut text: String, limit: usize) -> String {
    if let Some((cut, _)) = text.char_indices().nth(limit) {
        text.truncate(cut);
        text.push_str("\n\n... (output truncated)");
    }
    text
}
