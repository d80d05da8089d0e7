use std::fmt;
use std::path::PathBuf;

use crate::boundary::BoundaryWarning;
use crate::changelog::Changelog;
use crate::domain::{previous_release_tag, PlannedTag, ReleaseVersion, TagPlan};
use crate::error::{ReleaseError, Result};
use crate::git::{Repository, Tagger};
use crate::github::{ReleasePublisher, ReleaseRequest};
use crate::stages::{ReleaseContext, ValidatedRelease};
use crate::ui;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseOptions {
    /// Report every action without creating, pushing or publishing anything
    pub dry_run: bool,
}

/// One side effect of the Release stage
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseAction {
    CreateTag { tag: String, message: String },
    PushTags { remote: String, tags: Vec<String> },
    WriteChangelog { path: PathBuf, entries: usize },
    PublishRelease { tag: String, title: String, prerelease: bool },
}

/// An action and whether it actually happened
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseStep {
    pub action: ReleaseAction,
    pub performed: bool,
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.action, self.performed) {
            (ReleaseAction::CreateTag { tag, message }, true) => {
                write!(f, "Created tag {} ({})", tag, message)
            }
            (ReleaseAction::CreateTag { tag, message }, false) => {
                write!(f, "Would create tag {} ({})", tag, message)
            }
            (ReleaseAction::PushTags { remote, tags }, true) => {
                write!(f, "Pushed {} tags to {}", tags.len(), remote)
            }
            (ReleaseAction::PushTags { remote, tags }, false) => {
                write!(f, "Would push {} to {}", tags.join(", "), remote)
            }
            (ReleaseAction::WriteChangelog { path, entries }, true) => {
                write!(f, "Wrote changelog to {} ({} commits)", path.display(), entries)
            }
            (ReleaseAction::WriteChangelog { path, entries }, false) => write!(
                f,
                "Would write changelog to {} ({} commits)",
                path.display(),
                entries
            ),
            (ReleaseAction::PublishRelease { tag, title, prerelease }, performed) => {
                let kind = if *prerelease { "pre-release" } else { "release" };
                if performed {
                    write!(f, "Published {} '{}' for {}", kind, title, tag)
                } else {
                    write!(f, "Would publish {} '{}' for {}", kind, title, tag)
                }
            }
        }
    }
}

/// What the Release stage did, or would have done
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub version: ReleaseVersion,
    pub plan: TagPlan,
    pub dry_run: bool,
    pub steps: Vec<ReleaseStep>,
    pub changelog: Changelog,
    pub changelog_path: PathBuf,
    pub releases: Vec<ReleaseRequest>,
    pub warnings: Vec<BoundaryWarning>,
}

impl ReleaseReport {
    fn record(&mut self, action: ReleaseAction, performed: bool) {
        let step = ReleaseStep { action, performed };
        if performed {
            ui::display_success(&step.to_string());
        } else {
            ui::display_dry_run(&step.to_string());
        }
        self.steps.push(step);
    }

    /// Tags created, or planned in dry-run mode
    pub fn tags(&self) -> Vec<&str> {
        self.plan.names()
    }

    /// Every step rendered as a progress line
    pub fn messages(&self) -> Vec<String> {
        self.steps.iter().map(ToString::to_string).collect()
    }
}

/// Tag, push, write the changelog and publish releases.
///
/// Tag collisions are checked again before the first tag is created because tags may
/// have appeared since validation (e.g. while tests ran). In dry-run mode the changelog is
/// still generated and written; nothing else touches the repository or the remote.
pub fn release<R: Repository, P: ReleasePublisher>(
    validated: &ValidatedRelease,
    ctx: &ReleaseContext<'_, R, P>,
    options: &ReleaseOptions,
) -> Result<ReleaseReport> {
    let version = &validated.version;
    let plan = &validated.plan;
    let git = &ctx.config.git;
    let perform = !options.dry_run;

    let existing = ctx.repo.list_tags()?;
    let collisions = plan.find_collisions(&existing);
    if !collisions.is_empty() {
        return Err(ReleaseError::TagCollision(collisions));
    }

    let previous_tag = previous_release_tag(&existing, version);
    let commits = ctx.repo.commits_since(previous_tag.as_deref())?;
    let repository = ctx.config.release.resolved_repository();
    let changelog = Changelog::build(
        version,
        previous_tag.as_deref(),
        &commits,
        repository.as_deref(),
    );

    let mut warnings = Vec::new();
    match &previous_tag {
        None => warnings.push(BoundaryWarning::NoPreviousRelease {
            version: version.to_string(),
        }),
        Some(tag) if changelog.is_empty() => warnings.push(BoundaryWarning::NoNewCommits {
            previous_tag: tag.clone(),
        }),
        Some(_) => {}
    }

    let mut report = ReleaseReport {
        version: version.clone(),
        plan: plan.clone(),
        dry_run: options.dry_run,
        steps: Vec::new(),
        changelog,
        changelog_path: ctx.root.join(&ctx.config.release.changelog_file),
        releases: Vec::new(),
        warnings,
    };

    let tagger = Tagger {
        name: git.tagger_name.clone(),
        email: git.tagger_email.clone(),
    };
    for tag in plan.tags() {
        let message = tag.message(version);
        if perform {
            let oid = ctx.repo.create_annotated_tag(&tag.name, &message, &tagger)?;
            tracing::debug!(tag = %tag.name, %oid, "created annotated tag");
        }
        report.record(
            ReleaseAction::CreateTag {
                tag: tag.name.clone(),
                message,
            },
            perform,
        );
    }

    let names = plan.names();
    if perform {
        ctx.repo.push_tags(&git.remote, &names)?;
    }
    report.record(
        ReleaseAction::PushTags {
            remote: git.remote.clone(),
            tags: names.iter().map(|n| n.to_string()).collect(),
        },
        perform,
    );

    report.changelog.write_to(&report.changelog_path)?;
    let write = ReleaseAction::WriteChangelog {
        path: report.changelog_path.clone(),
        entries: report.changelog.entries.len(),
    };
    report.record(write, true);

    let notes = report.changelog.render();
    for tag in plan.tags() {
        let request = ReleaseRequest {
            tag: tag.name.clone(),
            title: tag.release_title(version),
            notes: if tag.is_root() || !ctx.config.release.module_notes {
                notes.clone()
            } else {
                module_notes(tag, version, repository.as_deref())
            },
            prerelease: version.is_prerelease(),
        };

        if perform {
            ctx.publisher.create_release(&request)?;
        }
        report.record(
            ReleaseAction::PublishRelease {
                tag: request.tag.clone(),
                title: request.title.clone(),
                prerelease: request.prerelease,
            },
            perform,
        );
        report.releases.push(request);
    }

    Ok(report)
}

/// Short notes for a module release pointing at the root release.
fn module_notes(tag: &PlannedTag, version: &ReleaseVersion, repository: Option<&str>) -> String {
    let module = tag
        .module
        .as_ref()
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let root = match repository {
        Some(repo) => format!(
            "[{v}](https://github.com/{repo}/releases/tag/{v})",
            v = version,
            repo = repo
        ),
        None => version.to_string(),
    };

    format!(
        "Release of `{}` at {}.\n\nSee the {} release for the full changelog.\n",
        module, version, root
    )
}

/// Markdown for the job summary.
pub fn render_summary(report: &ReleaseReport) -> String {
    let mut out = format!("## Release {}\n\n", report.version);

    if report.dry_run {
        out.push_str("> **Dry run**: nothing was tagged, pushed or published.\n\n");
    }

    out.push_str("| Module | Tag | Release |\n| --- | --- | --- |\n");
    for tag in report.plan.tags() {
        let module = tag
            .module
            .as_ref()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "(root)".to_string());
        out.push_str(&format!(
            "| {} | `{}` | {} |\n",
            module,
            tag.name,
            tag.release_title(&report.version)
        ));
    }

    out.push('\n');
    match &report.changelog.previous_tag {
        Some(prev) => out.push_str(&format!(
            "{} commits since {}.\n",
            report.changelog.entries.len(),
            prev
        )),
        None => out.push_str(&format!(
            "{} commits (first release).\n",
            report.changelog.entries.len()
        )),
    }

    out
}
