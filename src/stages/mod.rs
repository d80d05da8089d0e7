//! The three release stages: Validate, Test and Release.
//!
//! Each stage is a plain function over the [Repository], [ReleasePublisher] and
//! [TestHarness](crate::harness::TestHarness) seams, so the whole pipeline runs against mocks in tests.

pub mod release;
pub mod testing;
pub mod validate;

pub use release::{
    release, render_summary, ReleaseAction, ReleaseOptions, ReleaseReport, ReleaseStep,
};
pub use testing::run_tests;
pub use validate::{validate, ValidatedRelease};

use std::path::Path;

use crate::config::Config;
use crate::git::Repository;
use crate::github::ReleasePublisher;

/// Everything the Validate and Release stages read from or act on
pub struct ReleaseContext<'a, R: Repository, P: ReleasePublisher> {
    pub config: &'a Config,
    /// Workspace root: holds the manifest and receives the changelog
    pub root: &'a Path,
    pub repo: &'a R,
    pub publisher: &'a P,
}

impl<'a, R: Repository, P: ReleasePublisher> ReleaseContext<'a, R, P> {
    pub fn new(config: &'a Config, root: &'a Path, repo: &'a R, publisher: &'a P) -> Self {
        ReleaseContext {
            config,
            root,
            repo,
            publisher,
        }
    }
}
