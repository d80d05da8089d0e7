//! GitHub release publishing via the `gh` CLI

use std::cell::RefCell;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use crate::error::{ReleaseError, Result};

/// Everything needed to create one GitHub release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Existing, pushed tag the release points at
    pub tag: String,
    pub title: String,
    pub notes: String,
    pub prerelease: bool,
}

/// Creates releases on the hosting service
pub trait ReleasePublisher {
    fn create_release(&self, request: &ReleaseRequest) -> Result<()>;
}

/// Publishes through `gh release create`. Authentication is whatever `gh` picks up
/// (`GH_TOKEN`, `GITHUB_TOKEN` or a stored login).
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    repository: Option<String>,
}

impl GhCli {
    pub fn new(repository: Option<String>) -> Self {
        GhCli {
            program: "gh".to_string(),
            repository,
        }
    }

    /// Use a different executable, e.g. a wrapper script
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments passed after the program name. The notes are read from stdin.
    pub fn release_args(&self, request: &ReleaseRequest) -> Vec<String> {
        let mut args = vec![
            "release".to_string(),
            "create".to_string(),
            request.tag.clone(),
            "--title".to_string(),
            request.title.clone(),
            "--notes-file".to_string(),
            "-".to_string(),
            "--verify-tag".to_string(),
        ];
        if request.prerelease {
            args.push("--prerelease".to_string());
        }
        if let Some(repo) = &self.repository {
            args.push("--repo".to_string());
            args.push(repo.clone());
        }
        args
    }
}

impl ReleasePublisher for GhCli {
    fn create_release(&self, request: &ReleaseRequest) -> Result<()> {
        tracing::debug!(tag = %request.tag, program = %self.program, "creating GitHub release");

        let mut child = Command::new(&self.program)
            .args(self.release_args(request))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReleaseError::publish(format!("Failed to execute {}: {}", self.program, e))
            })?;

        // written from a separate thread so a full stdout pipe cannot block the notes
        let writer = child.stdin.take().map(|mut stdin| {
            let notes = request.notes.clone().into_bytes();
            thread::spawn(move || stdin.write_all(&notes))
        });

        let output = child.wait_with_output()?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // the program exited without reading everything; its status decides
                Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(ReleaseError::publish(format!(
                        "Failed to send release notes to {}",
                        self.program
                    )))
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::publish(format!(
                "{} release create {} exited with code {}: {}",
                self.program,
                request.tag,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Publisher that only records requests
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    requests: RefCell<Vec<ReleaseRequest>>,
    fail_on: Option<String>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when asked to publish this tag
    pub fn failing_on(tag: impl Into<String>) -> Self {
        RecordingPublisher {
            requests: RefCell::new(Vec::new()),
            fail_on: Some(tag.into()),
        }
    }

    pub fn requests(&self) -> Vec<ReleaseRequest> {
        self.requests.borrow().clone()
    }
}

impl ReleasePublisher for RecordingPublisher {
    fn create_release(&self, request: &ReleaseRequest) -> Result<()> {
        if self.fail_on.as_deref() == Some(request.tag.as_str()) {
            return Err(ReleaseError::publish(format!(
                "release for {} rejected",
                request.tag
            )));
        }
        self.requests.borrow_mut().push(request.clone());
        Ok(())
    }
}
