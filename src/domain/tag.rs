use crate::domain::{ModulePath, ReleaseVersion};
use std::collections::HashSet;

/// A tag that will be created for one release target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTag {
    /// None for the root module.
    pub module: Option<ModulePath>,
    pub name: String,
}

impl PlannedTag {
    /// Message stored in the annotated tag.
    pub fn message(&self, version: &ReleaseVersion) -> String {
        match &self.module {
            Some(module) => format!("Release {} {}", module, version),
            None => format!("Release {}", version),
        }
    }

    /// Title used for the GitHub release.
    pub fn release_title(&self, version: &ReleaseVersion) -> String {
        match &self.module {
            Some(module) => format!("{} {}", module, version),
            None => version.to_string(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.module.is_none()
    }
}

/// Every tag a release creates: `vX.Y.Z` for the root module, then `<module>/vX.Y.Z`
/// for each discovered module in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPlan {
    pub version: ReleaseVersion,
    tags: Vec<PlannedTag>,
}

impl TagPlan {
    pub fn new(version: &ReleaseVersion, modules: &[ModulePath]) -> Self {
        let mut tags = vec![PlannedTag {
            module: None,
            name: version.to_string(),
        }];
        tags.extend(modules.iter().filter(|m| !m.is_root()).map(|module| PlannedTag {
            module: Some(module.clone()),
            name: format!("{}/{}", module, version),
        }));

        TagPlan {
            version: version.clone(),
            tags,
        }
    }

    pub fn root(&self) -> &PlannedTag {
        &self.tags[0]
    }

    pub fn modules(&self) -> &[PlannedTag] {
        &self.tags[1..]
    }

    /// All planned tags, root first.
    pub fn tags(&self) -> &[PlannedTag] {
        &self.tags
    }

    pub fn names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// Planned tags that already exist, by exact name.
    pub fn find_collisions(&self, existing: &[String]) -> Vec<String> {
        let existing: HashSet<&str> = existing.iter().map(String::as_str).collect();
        self.tags
            .iter()
            .filter(|t| existing.contains(t.name.as_str()))
            .map(|t| t.name.clone())
            .collect()
    }
}

/// Finds the release the changelog should start from.
///
/// Considers root release tags only (valid version, no module prefix) and picks the
/// highest one that precedes `current`. Once `current` is tagged this is the
/// second-most-recent release.
///
/// Returns None when `current` has no semver view (e.g. "v01.2.3"), since no tag can be
/// ordered against it.
pub fn previous_release_tag(existing: &[String], current: &ReleaseVersion) -> Option<String> {
    let current_semver = current.to_semver()?;

    existing
        .iter()
        .filter(|tag| tag.as_str() != current.as_str() && !tag.contains('/'))
        .filter_map(|tag| {
            let version = ReleaseVersion::parse(tag).ok()?.to_semver()?;
            Some((version, tag))
        })
        .filter(|(version, _)| *version < current_semver)
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, tag)| tag.clone())
}
