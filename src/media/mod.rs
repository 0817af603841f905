// Media toolchain access
//
// Everything the converter needs from ffmpeg/ffprobe goes through here:
// - Commands: argument builders for the version check, duration probe and encode
// - Runner: executes a command and hands back exit status and captured output
// - Probe: parsing of ffprobe's JSON format section

pub mod commands;
pub mod probe;
pub mod runner;

use async_trait::async_trait;

pub use commands::*;
pub use probe::*;
pub use runner::*;

use crate::error::Result;

/// Captured result of one external command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
impl CommandOutput {
    pub(crate) fn ok<S: Into<String>>(stdout: S) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub(crate) fn failed<S: Into<String>>(stderr: S) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Executes external media commands.
///
/// The call completes only once the child has exited. `Err` means the
/// process could not be started at all; a non-zero exit is reported through
/// [`CommandOutput::success`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &MediaCommand) -> Result<CommandOutput>;
}

/// Factory for creating command runner instances
pub struct CommandRunnerFactory;

impl CommandRunnerFactory {
    /// Create the runner that spawns real processes
    pub fn create_runner() -> Box<dyn CommandRunner> {
        Box::new(runner::ProcessRunner::new())
    }
}
