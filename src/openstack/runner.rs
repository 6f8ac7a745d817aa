//! Process execution seam.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{CommandError, Result};

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub status: Option<i32>,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns true if the process exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.status, Some(0))
    }
}

/// Runs external programs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and extra environment `envs`, waiting for
    /// it to exit.
    async fn run(&self, program: &str, args: &[String], envs: &[(String, String)]) -> Result<CommandOutput>;
}

/// [`CommandRunner`] spawning real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], envs: &[(String, String)]) -> Result<CommandOutput> {
        debug!("Spawning {program} {}", args.join(" "));

        let output = Command::new(program)
            .args(args)
            .env_remove("OS_REGION_NAME")
            .envs(envs.iter().map(|(key, value)| (key.as_str(), value.as_str())))
            .output()
            .await
            .map_err(|e| CommandError::Spawn {
                command: format!("{program} {}", args.join(" ")),
                message: e.to_string(),
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
