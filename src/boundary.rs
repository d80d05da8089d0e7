use std::fmt;

/// Non-fatal conditions met while preparing a release.
/// These are reported to the user but never stop the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No earlier release tag exists, so the changelog covers the whole history
    NoPreviousRelease { version: String },
    /// HEAD is the commit the previous release points at
    NoNewCommits { previous_tag: String },
    /// The manifest lists no module matching the filter
    NoModulesDiscovered { manifest: String, filter: String },
    /// Remote tags could not be fetched; collision checks use local tags only
    FetchFailed { remote: String, reason: String },
    /// The test stage did not run
    TestsSkipped { reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoPreviousRelease { version } => write!(
                f,
                "No previous release tag found; changelog for {} covers the full history",
                version
            ),
            BoundaryWarning::NoNewCommits { previous_tag } => {
                write!(f, "No new commits since tag '{}'", previous_tag)
            }
            BoundaryWarning::NoModulesDiscovered { manifest, filter } => write!(
                f,
                "No modules matching '{}' in {}; only the root module will be tagged",
                filter, manifest
            ),
            BoundaryWarning::FetchFailed { remote, reason } => write!(
                f,
                "Could not fetch tags from remote '{}': {}. Using local tags",
                remote, reason
            ),
            BoundaryWarning::TestsSkipped { reason } => {
                write!(f, "Test stage skipped: {}", reason)
            }
        }
    }
}
