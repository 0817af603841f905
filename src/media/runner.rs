use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::Result;
use super::{CommandOutput, CommandRunner, MediaCommand};

/// Runs media commands as child processes.
///
/// No timeout is applied: a tool that never exits blocks the caller
/// indefinitely. If the program is interrupted mid-encode the output file
/// may be left truncated or empty.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &MediaCommand) -> Result<CommandOutput> {
        debug!("Executing media processing command: {}", command);
        debug!("Description: {}", command.description);

        let output = Command::new(&command.binary_path)
            .args(&command.args)
            .kill_on_drop(true)
            .output()
            .await?;

        debug!("{} exited with {}", command.binary_path, output.status);

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
