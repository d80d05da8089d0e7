use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use gowork_release::ci::{self, CiOutputs};
use gowork_release::cli::{self, WorkflowArgs, WorkflowStatus};
use gowork_release::config::{self, Config};
use gowork_release::domain::ReleaseVersion;
use gowork_release::git::Git2Repository;
use gowork_release::github::GhCli;
use gowork_release::harness::ShellHarness;
use gowork_release::stages::{self, ReleaseContext};
use gowork_release::{telemetry, ui, workspace};

#[derive(Parser)]
#[command(
    name = "gowork-release",
    version,
    about = "Validate, test, tag and publish every module of a Go workspace"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Repository directory (defaults to the current directory)")]
    repo_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Fetch tags from the remote before checking for collisions")]
    fetch: bool,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, help = "Log output format")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Check the version format and that no release tag exists yet
    Validate { version: String },

    /// List the workspace modules that get their own tag
    Modules,

    /// Run the configured test command
    Test,

    /// Print the changelog since the previous release
    Changelog {
        version: String,

        #[arg(short, long, help = "Write to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Tag, push and publish without running tests
    Release {
        version: String,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompts")]
        yes: bool,
    },

    /// Validate, test and release
    Run {
        version: String,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(long, help = "Do not run the test command")]
        skip_tests: bool,

        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompts")]
        yes: bool,
    },
}

impl Command {
    fn version(&self) -> Option<&str> {
        match self {
            Command::Validate { version }
            | Command::Changelog { version, .. }
            | Command::Release { version, .. }
            | Command::Run { version, .. } => Some(version.as_str()),
            Command::Modules | Command::Test => None,
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    telemetry::init_tracing(matches!(args.log_format, LogFormat::Json), level);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // reject a malformed version before touching the repository
    if let Some(version) = args.command.version() {
        ReleaseVersion::parse(version)?;
    }

    let config = config::load_config(args.config.as_deref())?;
    let repo_dir = match &args.repo_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match args.command {
        Command::Modules => {
            let root = workspace_root(&repo_dir)?;
            let modules = workspace::load_modules(
                &root,
                &config.workspace.manifest,
                &config.workspace.module_filter,
            )?;
            for module in modules {
                println!("{}", module);
            }
            Ok(())
        }
        Command::Test => {
            let root = workspace_root(&repo_dir)?;
            let harness = ShellHarness::new(&config.test.command, &root);
            match stages::run_tests(&harness)? {
                Some(warning) => ui::display_boundary_warning(&warning),
                None => ui::display_success("Tests passed"),
            }
            Ok(())
        }
        Command::Validate { version } => {
            let repo = open_repository(&repo_dir, &config, args.fetch)?;
            let root = repo_root(&repo)?;
            let validated = stages::validate(&version, &repo, &root, &config.workspace)?;
            for warning in &validated.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_modules(&validated.modules);
            ui::display_tag_plan(&validated.plan);

            let outputs = CiOutputs::from_env();
            outputs.set_output("version", validated.version.as_str())?;
            outputs.set_output("modules", &validated.modules_output())?;
            ui::display_success(&format!("{} is ready to release", validated.version));
            Ok(())
        }
        Command::Changelog { version, output } => {
            let repo = open_repository(&repo_dir, &config, args.fetch)?;
            let changelog = cli::generate_changelog(&repo, &version, &config)?;
            match output {
                Some(path) => {
                    changelog.write_to(&path)?;
                    ui::display_success(&format!("Wrote changelog to {}", path.display()));
                }
                None => print!("{}", changelog.render()),
            }
            Ok(())
        }
        Command::Release {
            version,
            dry_run,
            yes,
        } => release(
            &repo_dir,
            &config,
            WorkflowArgs {
                version,
                dry_run,
                skip_tests: true,
                assume_yes: yes,
                fetch: args.fetch,
            },
        ),
        Command::Run {
            version,
            dry_run,
            skip_tests,
            yes,
        } => release(
            &repo_dir,
            &config,
            WorkflowArgs {
                version,
                dry_run,
                skip_tests,
                assume_yes: yes,
                fetch: args.fetch,
            },
        ),
    }
}

fn release(repo_dir: &Path, config: &Config, mut workflow: WorkflowArgs) -> Result<()> {
    // fetching happens inside the workflow
    let repo = open_repository(repo_dir, config, false)?;
    let root = repo_root(&repo)?;
    let publisher = GhCli::new(config.release.resolved_repository());
    let harness = ShellHarness::new(&config.test.command, &root);
    let ctx = ReleaseContext::new(config, &root, &repo, &publisher);

    // nobody can answer a prompt in CI
    workflow.assume_yes |= ci::running_in_ci();

    let result = cli::run_workflow(
        &workflow,
        &ctx,
        &harness,
        &CiOutputs::from_env(),
        ui::confirm_action,
    )?;

    if result.status == WorkflowStatus::Cancelled {
        tracing::info!(version = %result.version, "release cancelled");
    }
    Ok(())
}

fn open_repository(repo_dir: &Path, config: &Config, fetch: bool) -> Result<Git2Repository> {
    let repo = Git2Repository::open(repo_dir)
        .with_context(|| format!("Not a git repository: {}", repo_dir.display()))?;

    if fetch {
        if let Some(warning) = cli::fetch_remote_tags(&repo, &config.git.remote) {
            ui::display_boundary_warning(&warning);
        }
    }
    Ok(repo)
}

fn repo_root(repo: &Git2Repository) -> Result<PathBuf> {
    repo.workdir()
        .map(Path::to_path_buf)
        .context("Bare repositories are not supported")
}

/// The git work tree containing `dir`, or `dir` itself outside a repository.
fn workspace_root(dir: &Path) -> Result<PathBuf> {
    match Git2Repository::open(dir) {
        Ok(repo) => repo_root(&repo),
        Err(_) => Ok(dir.to_path_buf()),
    }
}
