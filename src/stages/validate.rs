use std::path::Path;

use crate::boundary::BoundaryWarning;
use crate::config::WorkspaceConfig;
use crate::domain::{ModulePath, ReleaseVersion, TagPlan};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::workspace::load_modules;

/// Output of the Validate stage, consumed by Release
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRelease {
    pub version: ReleaseVersion,
    pub modules: Vec<ModulePath>,
    pub plan: TagPlan,
    pub warnings: Vec<BoundaryWarning>,
}

impl ValidatedRelease {
    /// Module paths joined by spaces, as exported in the `modules` step output
    pub fn modules_output(&self) -> String {
        self.modules
            .iter()
            .map(ModulePath::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Validate the version, discover modules and check every planned tag is free.
///
/// The version format is checked before anything is read from disk, so an invalid
/// version fails even outside a workspace.
///
/// # Errors
/// * `InvalidVersion` - the version does not match `vX.Y.Z[-pre]`
/// * `Manifest` - the workspace manifest is missing or unreadable
/// * `TagCollision` - the root tag or any module tag already exists
pub fn validate<R: Repository>(
    version: &str,
    repo: &R,
    root: &Path,
    workspace: &WorkspaceConfig,
) -> Result<ValidatedRelease> {
    let version = ReleaseVersion::parse(version)?;
    tracing::debug!(%version, "version format ok");

    let modules = load_modules(root, &workspace.manifest, &workspace.module_filter)?;
    tracing::debug!(count = modules.len(), "discovered modules");

    let mut warnings = Vec::new();
    if modules.is_empty() {
        warnings.push(BoundaryWarning::NoModulesDiscovered {
            manifest: workspace.manifest.clone(),
            filter: workspace.module_filter.clone(),
        });
    }

    let plan = TagPlan::new(&version, &modules);
    let existing = repo.list_tags()?;
    let collisions = plan.find_collisions(&existing);
    if !collisions.is_empty() {
        return Err(ReleaseError::TagCollision(collisions));
    }

    Ok(ValidatedRelease {
        version,
        modules,
        plan,
        warnings,
    })
}
