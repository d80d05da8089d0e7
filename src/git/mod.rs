//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a release
//! needs, with a real implementation and a mock for tests.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation that records what it was asked to do
//!
//! Release stages depend on the [Repository] trait rather than concrete implementations.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Commit information used for changelog generation
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The abbreviated hash, as `git log --format=%h` prints it
    pub short_hash: String,
    /// First line of the commit message
    pub subject: String,
    /// The commit author name
    pub author: String,
}

impl CommitInfo {
    /// Build from a full hash and message, deriving the 7-character short hash and subject.
    pub fn new(hash: impl Into<String>, message: &str, author: impl Into<String>) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();
        CommitInfo {
            hash,
            short_hash,
            subject: subject_line(message),
            author: author.into(),
        }
    }
}

/// First line of a commit message, trimmed.
pub fn subject_line(message: &str) -> String {
    message.lines().next().unwrap_or("").trim().to_string()
}

/// Identity recorded on annotated tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagger {
    pub name: String,
    pub email: String,
}

/// Common git operation trait for abstraction
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map underlying errors
/// (like `git2::Error`) to the appropriate [crate::error::ReleaseError] variants.
pub trait Repository {
    /// Get all tag names in the repository, sorted alphabetically.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Whether a tag with exactly this name exists.
    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_tags()?.iter().any(|t| t == name))
    }

    /// Commits reachable from HEAD but not from `since_tag`, newest first.
    ///
    /// With `since_tag` set to None, returns the whole history of HEAD.
    fn commits_since(&self, since_tag: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// Create an annotated tag on HEAD.
    ///
    /// # Returns
    /// * `Ok(String)` - Object id of the new tag object
    /// * `Err` - If the tag already exists or HEAD cannot be resolved
    fn create_annotated_tag(&self, name: &str, message: &str, tagger: &Tagger) -> Result<String>;

    /// Push the named tags to a remote in one operation.
    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()>;

    /// Fetch all tags from a remote so collision checks see released tags.
    fn fetch_tags(&self, remote: &str) -> Result<()>;
}
