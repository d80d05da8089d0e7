//! Changelog generation from commit history.
//!
//! Rendered changelogs look like:
//!
//! ```text
//! ## What's Changed
//!
//! * feat: add gin adapter (1a2b3c4)
//! * fix: handle empty body (5d6e7f8)
//!
//! ## Contributors
//!
//! * Alice
//! * Bob
//!
//! **Full Changelog**: https://github.com/owner/repo/compare/v0.1.0...v0.2.0
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::domain::ReleaseVersion;
use crate::error::Result;
use crate::git::CommitInfo;

/// One changelog line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub subject: String,
    pub short_hash: String,
}

impl ChangelogEntry {
    pub fn render(&self) -> String {
        format!("* {} ({})", self.subject, self.short_hash)
    }
}

/// Commits and contributors between the previous release and HEAD
#[derive(Debug, Clone, PartialEq)]
pub struct Changelog {
    pub version: ReleaseVersion,
    pub previous_tag: Option<String>,
    pub entries: Vec<ChangelogEntry>,
    pub contributors: Vec<String>,
    pub compare_url: Option<String>,
}

impl Changelog {
    /// Build a changelog from commits listed newest first.
    ///
    /// `repository` is an `owner/name` slug; with a previous tag it yields a compare link.
    pub fn build(
        version: &ReleaseVersion,
        previous_tag: Option<&str>,
        commits: &[CommitInfo],
        repository: Option<&str>,
    ) -> Self {
        let entries = commits
            .iter()
            .map(|c| ChangelogEntry {
                subject: c.subject.clone(),
                short_hash: c.short_hash.clone(),
            })
            .collect();

        let contributors: BTreeSet<String> = commits
            .iter()
            .map(|c| c.author.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        let compare_url = match (repository, previous_tag) {
            (Some(repo), Some(prev)) => Some(format!(
                "https://github.com/{}/compare/{}...{}",
                repo, prev, version
            )),
            _ => None,
        };

        Changelog {
            version: version.clone(),
            previous_tag: previous_tag.map(str::to_string),
            entries,
            contributors: contributors.into_iter().collect(),
            compare_url,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Markdown body used for the release notes and `changelog.md`.
    pub fn render(&self) -> String {
        let mut out = String::from("## What's Changed\n\n");

        if self.entries.is_empty() {
            out.push_str("No changes since the previous release.\n");
        } else {
            for entry in &self.entries {
                out.push_str(&entry.render());
                out.push('\n');
            }
        }

        if !self.contributors.is_empty() {
            out.push_str("\n## Contributors\n\n");
            for contributor in &self.contributors {
                out.push_str(&format!("* {}\n", contributor));
            }
        }

        if let Some(url) = &self.compare_url {
            out.push_str(&format!("\n**Full Changelog**: {}\n", url));
        }

        out
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        tracing::info!(path = %path.display(), entries = self.entries.len(), "wrote changelog");
        Ok(())
    }
}
