// tests/integration_test.rs
//
// End-to-end checks against real repositories built with git2 and against the binary.
use std::path::Path;
use std::process::Command;

use git2::{Repository as Git2Repo, Signature, Time};
use gowork_release::ci::CiOutputs;
use gowork_release::cli::{generate_changelog, run_workflow, WorkflowArgs, WorkflowStatus};
use gowork_release::config::Config;
use gowork_release::git::{Git2Repository, Repository, Tagger};
use gowork_release::github::RecordingPublisher;
use gowork_release::harness::ShellHarness;
use gowork_release::stages::ReleaseContext;
use serial_test::serial;

const MANIFEST: &str = "go 1.22\n\nuse (\n\t.\n\t./extra/fuegogin\n\t./extra/sql\n)\n";

/// Commit `file` with `message`; `seconds` keeps commit times strictly increasing.
fn commit(repo: &Git2Repo, file: &str, message: &str, author: &str, seconds: i64) -> git2::Oid {
    let workdir = repo.workdir().unwrap();
    std::fs::write(workdir.join(file), message).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let sig = Signature::new(author, "dev@example.com", &Time::new(1_700_000_000 + seconds, 0)).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn tagger() -> Tagger {
    Tagger {
        name: "Release Bot".to_string(),
        email: "release-bot@example.com".to_string(),
    }
}

/// A workspace repository with one released version (v0.1.0) and two commits after it.
fn released_workspace(dir: &Path) -> Git2Repo {
    let repo = Git2Repo::init(dir).unwrap();
    commit(&repo, "go.work", MANIFEST, "Ewen", 0);
    Git2Repository::open(dir)
        .unwrap()
        .create_annotated_tag("v0.1.0", "Release v0.1.0", &tagger())
        .unwrap();
    commit(&repo, "a.go", "feat: add gin adapter", "Dylan", 10);
    commit(&repo, "b.go", "fix: handle empty body\n\nLong description.", "Ewen", 20);
    repo
}

#[test]
fn test_commits_since_previous_tag() {
    let dir = tempfile::tempdir().unwrap();
    let raw = released_workspace(dir.path());
    let repo = Git2Repository::open(dir.path()).unwrap();

    let commits = repo.commits_since(Some("v0.1.0")).unwrap();
    let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["fix: handle empty body", "feat: add gin adapter"]);

    let head = raw.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(commits[0].hash, head.id().to_string());
    assert!(head.id().to_string().starts_with(&commits[0].short_hash));
    assert!(commits[0].short_hash.len() >= 7);

    let all = repo.commits_since(None).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn test_generate_changelog_from_real_history() {
    let dir = tempfile::tempdir().unwrap();
    released_workspace(dir.path());
    let repo = Git2Repository::open(dir.path()).unwrap();

    let mut config = Config::default();
    config.release.repository = Some("go-fuego/fuego".to_string());
    let changelog = generate_changelog(&repo, "v0.2.0", &config).unwrap();

    assert_eq!(changelog.previous_tag.as_deref(), Some("v0.1.0"));
    assert_eq!(changelog.contributors, vec!["Dylan", "Ewen"]);

    let rendered = changelog.render();
    let fix = &changelog.entries[0];
    assert!(rendered.contains(&format!("* fix: handle empty body ({})", fix.short_hash)));
    assert!(rendered.ends_with(
        "**Full Changelog**: https://github.com/go-fuego/fuego/compare/v0.1.0...v0.2.0\n"
    ));
}

#[test]
fn test_release_pushes_tags_to_remote() {
    let dir = tempfile::tempdir().unwrap();
    let remote_dir = tempfile::tempdir().unwrap();
    let remote = Git2Repo::init_bare(remote_dir.path()).unwrap();

    let raw = released_workspace(dir.path());
    raw.remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    let config = Config::default();
    let repo = Git2Repository::open(dir.path()).unwrap();
    let publisher = RecordingPublisher::new();
    let ctx = ReleaseContext::new(&config, dir.path(), &repo, &publisher);
    let harness = ShellHarness::new("test -f go.work", dir.path());

    let args = WorkflowArgs {
        version: "v0.2.0".to_string(),
        assume_yes: true,
        ..Default::default()
    };
    let result = run_workflow(&args, &ctx, &harness, &CiOutputs::disabled(), |_| Ok(true)).unwrap();
    assert_eq!(result.status, WorkflowStatus::Released);

    let mut pushed: Vec<String> = remote
        .tag_names(None)
        .unwrap()
        .iter()
        .flatten()
        .map(str::to_string)
        .collect();
    pushed.sort();
    assert_eq!(
        pushed,
        vec!["extra/fuegogin/v0.2.0", "extra/sql/v0.2.0", "v0.2.0"]
    );

    // annotated, with the release message and tagger
    let tag = raw
        .find_reference("refs/tags/extra/sql/v0.2.0")
        .unwrap()
        .peel_to_tag()
        .unwrap();
    assert_eq!(tag.message().map(str::trim), Some("Release extra/sql v0.2.0"));
    assert_eq!(tag.tagger().unwrap().name(), Some("github-actions[bot]"));

    let changelog = std::fs::read_to_string(dir.path().join("changelog.md")).unwrap();
    assert!(changelog.contains("* feat: add gin adapter ("));
}

#[test]
fn test_second_release_of_same_version_collides() {
    let dir = tempfile::tempdir().unwrap();
    released_workspace(dir.path());
    let repo = Git2Repository::open(dir.path()).unwrap();
    repo.create_annotated_tag("extra/fuegogin/v0.2.0", "stale", &tagger())
        .unwrap();

    let config = Config::default();
    let publisher = RecordingPublisher::new();
    let ctx = ReleaseContext::new(&config, dir.path(), &repo, &publisher);
    let harness = ShellHarness::new("true", dir.path());
    let args = WorkflowArgs {
        version: "v0.2.0".to_string(),
        dry_run: true,
        ..Default::default()
    };

    let err = run_workflow(&args, &ctx, &harness, &CiOutputs::disabled(), |_| Ok(true)).unwrap_err();
    assert_eq!(err.to_string(), "Tag already exists: extra/fuegogin/v0.2.0");
    assert!(!repo.tag_exists("v0.2.0").unwrap());
}

// ============================================================================
// Binary
// ============================================================================

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gowork-release"))
}

#[test]
fn test_help() {
    let output = bin().arg("--help").output().expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("gowork-release"));
    assert!(stdout.contains("validate"));
    assert!(stdout.contains("run"));
}

#[test]
fn test_invalid_version_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .args(["validate", "1.2.3", "--repo-dir"])
        .arg(dir.path())
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR:"));
    assert!(stderr.contains("Invalid version '1.2.3'"));
}

#[test]
fn test_modules_command_lists_extra_modules() {
    let dir = tempfile::tempdir().unwrap();
    released_workspace(dir.path());

    let output = bin()
        .arg("modules")
        .arg("--repo-dir")
        .arg(dir.path())
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "extra/fuegogin\nextra/sql\n"
    );
}

#[test]
#[serial]
fn test_dry_run_binary_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    released_workspace(dir.path());
    let outputs = tempfile::tempdir().unwrap();
    let output_file = outputs.path().join("output");
    let summary_file = outputs.path().join("summary");

    let output = bin()
        .args(["run", "v0.2.0", "--dry-run", "--skip-tests", "--repo-dir"])
        .arg(dir.path())
        .env("GITHUB_OUTPUT", &output_file)
        .env("GITHUB_STEP_SUMMARY", &summary_file)
        .env_remove("GITHUB_REPOSITORY")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Would create tag v0.2.0"));
    assert!(stdout.contains("Would create tag extra/sql/v0.2.0"));
    assert!(stdout.contains("Would push"));

    let step_outputs = std::fs::read_to_string(output_file).unwrap();
    assert!(step_outputs.starts_with("version=v0.2.0\nmodules=extra/fuegogin extra/sql\n"));
    assert!(std::fs::read_to_string(summary_file).unwrap().contains("**Dry run**"));

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.list_tags().unwrap(), vec!["v0.1.0"]);
}
