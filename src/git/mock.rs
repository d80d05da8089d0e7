use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository, Tagger};
use std::cell::RefCell;
use std::collections::HashMap;

/// A push the mock was asked to perform
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPush {
    pub remote: String,
    pub tags: Vec<String>,
}

/// Mock repository for testing without actual git operations
///
/// History is linear. Commits are added oldest first; a tag marks the commit that was
/// HEAD when the tag was added.
#[derive(Default)]
pub struct MockRepository {
    commits: RefCell<Vec<CommitInfo>>,
    tag_marks: RefCell<HashMap<String, usize>>,
    created: RefCell<Vec<(String, String)>>,
    pushes: RefCell<Vec<RecordedPush>>,
    fetches: RefCell<Vec<String>>,
    push_error: Option<String>,
    fetch_error: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit on top of HEAD
    pub fn add_commit(&mut self, hash: &str, message: &str, author: &str) {
        self.commits
            .get_mut()
            .push(CommitInfo::new(hash, message, author));
    }

    /// Tag the current HEAD
    pub fn add_tag(&mut self, name: impl Into<String>) {
        let mark = self.commits.get_mut().len();
        self.tag_marks.get_mut().insert(name.into(), mark);
    }

    /// Make every push fail with the given message
    pub fn fail_pushes(&mut self, message: impl Into<String>) {
        self.push_error = Some(message.into());
    }

    /// Make every fetch fail with the given message
    pub fn fail_fetches(&mut self, message: impl Into<String>) {
        self.fetch_error = Some(message.into());
    }

    /// Tags created through the trait, with their messages, in creation order
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.created.borrow().clone()
    }

    pub fn pushes(&self) -> Vec<RecordedPush> {
        self.pushes.borrow().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self.tag_marks.borrow().keys().cloned().collect();
        tags.sort();
        Ok(tags)
    }

    fn commits_since(&self, since_tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let commits = self.commits.borrow();
        let start = match since_tag {
            Some(tag) => *self
                .tag_marks
                .borrow()
                .get(tag)
                .ok_or_else(|| ReleaseError::tag(format!("Tag '{}' not found", tag)))?,
            None => 0,
        };

        Ok(commits[start..].iter().rev().cloned().collect())
    }

    fn create_annotated_tag(&self, name: &str, message: &str, _tagger: &Tagger) -> Result<String> {
        let mut marks = self.tag_marks.borrow_mut();
        if marks.contains_key(name) {
            return Err(ReleaseError::TagCollision(vec![name.to_string()]));
        }
        marks.insert(name.to_string(), self.commits.borrow().len());
        self.created
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(format!("mock-tag-{}", name))
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()> {
        if let Some(message) = &self.push_error {
            return Err(ReleaseError::remote(message.clone()));
        }
        self.pushes.borrow_mut().push(RecordedPush {
            remote: remote.to_string(),
            tags: tag_names.iter().map(|t| t.to_string()).collect(),
        });
        Ok(())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        if let Some(message) = &self.fetch_error {
            return Err(ReleaseError::remote(message.clone()));
        }
        self.fetches.borrow_mut().push(remote.to_string());
        Ok(())
    }
}
