//! Main workflow orchestration logic
//!
//! Runs Validate, Test and Release in order and hands their results to the user and to
//! GitHub Actions. Kept free of clap so the workflow can be driven programmatically.

use crate::boundary::BoundaryWarning;
use crate::changelog::Changelog;
use crate::ci::CiOutputs;
use crate::config::Config;
use crate::domain::{previous_release_tag, ReleaseVersion};
use crate::error::Result;
use crate::git::Repository;
use crate::github::ReleasePublisher;
use crate::harness::TestHarness;
use crate::stages::{self, ReleaseContext, ReleaseOptions, ReleaseReport};
use crate::ui;

/// Arguments for the release workflow
///
/// Mirrors the CLI flags in a form that does not depend on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowArgs {
    /// Version to release, e.g. "v1.2.3"
    pub version: String,

    /// Preview mode - report actions without tagging, pushing or publishing
    pub dry_run: bool,

    /// Do not run the test harness
    pub skip_tests: bool,

    /// Skip the confirmation prompt
    pub assume_yes: bool,

    /// Fetch remote tags before validating
    pub fetch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Released,
    DryRun,
    /// The user declined the confirmation prompt; nothing was tagged
    Cancelled,
}

/// Result of a completed workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub status: WorkflowStatus,
    pub version: String,
    pub modules: Vec<String>,
    /// Present unless cancelled
    pub report: Option<ReleaseReport>,
}

/// Fetch tags from `remote`, turning failure into a warning.
pub fn fetch_remote_tags<R: Repository>(repo: &R, remote: &str) -> Option<BoundaryWarning> {
    ui::display_status(&format!("Fetching tags from {}...", remote));
    match repo.fetch_tags(remote) {
        Ok(()) => {
            ui::display_success(&format!("Fetched tags from {}", remote));
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "tag fetch failed");
            Some(BoundaryWarning::FetchFailed {
                remote: remote.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Build the changelog for `version` without touching the repository.
pub fn generate_changelog<R: Repository>(
    repo: &R,
    version: &str,
    config: &Config,
) -> Result<Changelog> {
    let version = ReleaseVersion::parse(version)?;
    let existing = repo.list_tags()?;
    let previous = previous_release_tag(&existing, &version);
    let commits = repo.commits_since(previous.as_deref())?;
    let repository = config.release.resolved_repository();

    Ok(Changelog::build(
        &version,
        previous.as_deref(),
        &commits,
        repository.as_deref(),
    ))
}

/// Main release workflow
///
/// Orchestrates the whole pipeline:
/// 1. Optionally fetch remote tags
/// 2. Validate the version, discover modules and check for tag collisions
/// 3. Run the test harness unless skipped
/// 4. Ask for confirmation unless dry-run or `assume_yes`
/// 5. Tag, push, write the changelog and publish releases
/// 6. Export step outputs and append the job summary
///
/// `confirm` is called with the prompt text when confirmation is needed.
pub fn run_workflow<R, P, H, C>(
    args: &WorkflowArgs,
    ctx: &ReleaseContext<'_, R, P>,
    harness: &H,
    outputs: &CiOutputs,
    confirm: C,
) -> Result<WorkflowResult>
where
    R: Repository,
    P: ReleasePublisher,
    H: TestHarness + ?Sized,
    C: FnOnce(&str) -> Result<bool>,
{
    if args.fetch {
        if let Some(warning) = fetch_remote_tags(ctx.repo, &ctx.config.git.remote) {
            ui::display_boundary_warning(&warning);
        }
    }

    // Validate
    ui::display_status(&format!("Validating release {}...", args.version));
    let validated = stages::validate(&args.version, ctx.repo, ctx.root, &ctx.config.workspace)?;
    for warning in &validated.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_modules(&validated.modules);
    ui::display_tag_plan(&validated.plan);

    outputs.set_output("version", validated.version.as_str())?;
    outputs.set_output("modules", &validated.modules_output())?;

    // Test
    if args.skip_tests {
        ui::display_boundary_warning(&BoundaryWarning::TestsSkipped {
            reason: "--skip-tests given".to_string(),
        });
    } else {
        ui::display_status(&format!("Running tests: {}", harness.describe()));
        match stages::run_tests(harness)? {
            Some(warning) => ui::display_boundary_warning(&warning),
            None => ui::display_success("Tests passed"),
        }
    }

    let modules: Vec<String> = validated
        .modules
        .iter()
        .map(|m| m.as_str().to_string())
        .collect();

    if !args.dry_run && !args.assume_yes {
        let prompt = format!(
            "Create and push {} tags for {}?",
            validated.plan.tags().len(),
            validated.version
        );
        if !confirm(&prompt)? {
            println!("Operation cancelled by user.");
            return Ok(WorkflowResult {
                status: WorkflowStatus::Cancelled,
                version: validated.version.to_string(),
                modules,
                report: None,
            });
        }
    }

    // Release
    let options = ReleaseOptions {
        dry_run: args.dry_run,
    };
    let report = stages::release(&validated, ctx, &options)?;
    for warning in &report.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_changelog_preview(&report.changelog);

    outputs.set_output("changelog", &report.changelog.render())?;
    outputs.append_summary(&stages::render_summary(&report))?;

    let status = if args.dry_run {
        ui::display_success(&format!("Dry run of {} complete", validated.version));
        WorkflowStatus::DryRun
    } else {
        ui::display_success(&format!(
            "Released {} ({} tags)",
            validated.version,
            report.tags().len()
        ));
        WorkflowStatus::Released
    };

    Ok(WorkflowResult {
        status,
        version: validated.version.to_string(),
        modules,
        report: Some(report),
    })
}
