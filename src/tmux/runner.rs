//! tmux command execution.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::TmuxError;

/// Runs one tmux command and returns its stdout. Mockable in tests.
#[async_trait]
pub trait TmuxRunner: Send + Sync {
    async fn run(&self, args: &[&str]) -> Result<String, TmuxError>;
}

/// Spawns the tmux binary, optionally on a named server socket.
#[derive(Debug, Clone)]
pub struct TmuxCommand {
    bin: String,
    socket_name: Option<String>,
}

impl TmuxCommand {
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            socket_name: None,
        }
    }

    #[must_use]
    pub fn with_socket_name(mut self, name: Option<String>) -> Self {
        self.socket_name = name;
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin);
        if let Some(name) = &self.socket_name {
            cmd.args(["-L", name]);
        }
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Default for TmuxCommand {
    fn default() -> Self {
        Self::new("tmux")
    }
}

#[async_trait]
impl TmuxRunner for TmuxCommand {
    async fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        let output = self.command(args).output().await?;
        if !output.status.success() {
            return Err(TmuxError::CommandFailed {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
