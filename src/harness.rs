use crate::error::{ReleaseError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs the project's test suite before anything is tagged
pub trait TestHarness {
    /// Human-readable description of what will run
    fn describe(&self) -> String;

    /// True when there is nothing to run
    fn is_empty(&self) -> bool {
        self.describe().trim().is_empty()
    }

    fn run(&self) -> Result<()>;
}

/// Runs one shell command in the workspace root
pub struct ShellHarness {
    command: String,
    workdir: PathBuf,
}

impl ShellHarness {
    pub fn new(command: impl Into<String>, workdir: impl AsRef<Path>) -> Self {
        ShellHarness {
            command: command.into(),
            workdir: workdir.as_ref().to_path_buf(),
        }
    }
}

impl TestHarness for ShellHarness {
    fn describe(&self) -> String {
        self.command.clone()
    }

    /// Execute the command with inherited stdio
    ///
    /// # Returns
    /// * `Ok(())` if the command exits with code 0
    /// * `Err(TestFailed)` for any other exit code
    /// * `Err(Io)` if the shell cannot be started or the workdir is missing
    fn run(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        if !self.workdir.is_dir() {
            return Err(ReleaseError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("test working directory not found: {}", self.workdir.display()),
            )));
        }

        tracing::info!(command = %self.command, workdir = %self.workdir.display(), "running tests");

        let status = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.workdir)
            .status()?;

        if !status.success() {
            return Err(ReleaseError::TestFailed {
                command: self.command.clone(),
                code: status.code().unwrap_or(-1),
            });
        }

        Ok(())
    }
}
