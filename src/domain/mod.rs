//! Domain logic - pure release rules independent of git and GitHub

pub mod module;
pub mod tag;
pub mod version;

pub use module::ModulePath;
pub use tag::{previous_release_tag, PlannedTag, TagPlan};
pub use version::ReleaseVersion;
