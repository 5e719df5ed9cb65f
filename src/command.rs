use std::io::ErrorKind;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

use crate::error::{HardsubError, Result};

/// External tool invocation: binary, arguments and a description for messages
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
    failure: fn(String) -> HardsubError,
}

impl ToolCommand {
    /// Create a new command; non-zero exits become [`HardsubError::Media`]
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
            failure: HardsubError::Media,
        }
    }

    /// Error constructor used when the tool exits with a failure status
    pub fn on_failure(mut self, failure: fn(String) -> HardsubError) -> Self {
        self.failure = failure;
        self
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add a path argument
    pub fn path<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Shell-like rendering for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.binary_path.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(&self.args).stdin(Stdio::null());
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> HardsubError {
        if e.kind() == ErrorKind::NotFound {
            HardsubError::ToolNotFound(self.binary_path.clone())
        } else {
            HardsubError::Io(e)
        }
    }

    /// Run with captured output; the raw output is returned even on failure
    pub async fn output(&self) -> Result<Output> {
        debug!("Executing command: {}", self.command_line());
        debug!("Description: {}", self.description);

        self.command()
            .output()
            .await
            .map_err(|e| self.spawn_error(e))
    }

    /// Run with captured output, failing with the tool's stderr
    pub async fn execute(&self) -> Result<()> {
        self.stdout().await.map(|_| ())
    }

    /// Run with captured output and return stdout
    pub async fn stdout(&self) -> Result<String> {
        let output = self.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err((self.failure)(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run attached to the terminal so the tool can draw its own progress
    pub async fn execute_inherited(&self) -> Result<()> {
        debug!("Executing command: {}", self.command_line());

        let status = self
            .command()
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            return Err((self.failure)(format!(
                "{} failed with {}",
                self.description, status
            )));
        }

        Ok(())
    }

    /// Run with all output discarded; only the exit status matters
    pub async fn execute_quiet(&self) -> Result<()> {
        debug!("Executing command: {}", self.command_line());

        let status = self
            .command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            return Err((self.failure)(format!(
                "{} failed with {}",
                self.description, status
            )));
        }

        Ok(())
    }
}
