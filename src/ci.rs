//! GitHub Actions integration: step outputs and the job summary.
//!
//! Both files are append-only and named by the runner through `GITHUB_OUTPUT` and
//! `GITHUB_STEP_SUMMARY`. Outside Actions the variables are unset and writes are skipped.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;

/// Step output and summary sinks for the current job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CiOutputs {
    output_file: Option<PathBuf>,
    summary_file: Option<PathBuf>,
}

impl CiOutputs {
    /// Sinks taken from `GITHUB_OUTPUT` and `GITHUB_STEP_SUMMARY`
    pub fn from_env() -> Self {
        let path = |key: &str| {
            std::env::var_os(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        CiOutputs {
            output_file: path("GITHUB_OUTPUT"),
            summary_file: path("GITHUB_STEP_SUMMARY"),
        }
    }

    /// Sinks writing to explicit files
    pub fn new(output_file: Option<PathBuf>, summary_file: Option<PathBuf>) -> Self {
        CiOutputs {
            output_file,
            summary_file,
        }
    }

    /// Sinks that drop everything
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.output_file.is_some() || self.summary_file.is_some()
    }

    /// Set a step output.
    pub fn set_output(&self, key: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_file else {
            tracing::debug!(key, "GITHUB_OUTPUT not set, skipping step output");
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(format_output(key, value).as_bytes())?;
        Ok(())
    }

    /// Append markdown to the job summary.
    pub fn append_summary(&self, markdown: &str) -> Result<()> {
        let Some(path) = &self.summary_file else {
            tracing::debug!("GITHUB_STEP_SUMMARY not set, skipping summary");
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(markdown.as_bytes())?;
        if !markdown.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Encode one output entry. Multi-line values use the heredoc form with a delimiter that
/// does not occur in the value.
pub fn format_output(key: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{}={}\n", key, value);
    }

    let mut delimiter = String::from("GOWORK_RELEASE_EOF");
    while value.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }

    let mut entry = format!("{}<<{}\n{}", key, delimiter, value);
    if !value.ends_with('\n') {
        entry.push('\n');
    }
    entry.push_str(&delimiter);
    entry.push('\n');
    entry
}

/// True when running under a CI service.
pub fn running_in_ci() -> bool {
    ["CI", "GITHUB_ACTIONS"]
        .iter()
        .any(|key| std::env::var(key).map(|v| v == "true").unwrap_or(false))
}
