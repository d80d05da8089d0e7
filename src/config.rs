use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// File name looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "gowork-release.toml";

/// Represents the complete configuration for gowork-release.
///
/// Contains workspace discovery settings, git identity, the test command and release options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub test: TestConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_manifest() -> String {
    "go.work".to_string()
}

fn default_module_filter() -> String {
    "extra/".to_string()
}

/// Where to find the workspace manifest and which modules get their own tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WorkspaceConfig {
    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default = "default_module_filter")]
    pub module_filter: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            manifest: default_manifest(),
            module_filter: default_module_filter(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tagger_name() -> String {
    "github-actions[bot]".to_string()
}

fn default_tagger_email() -> String {
    "41898282+github-actions[bot]@users.noreply.github.com".to_string()
}

/// Git remote and the identity used for annotated tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tagger_name")]
    pub tagger_name: String,

    #[serde(default = "default_tagger_email")]
    pub tagger_email: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            tagger_name: default_tagger_name(),
            tagger_email: default_tagger_email(),
        }
    }
}

fn default_test_command() -> String {
    "go test ./...".to_string()
}

/// The single command that runs the project's test harness.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TestConfig {
    #[serde(default = "default_test_command")]
    pub command: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            command: default_test_command(),
        }
    }
}

fn default_changelog_file() -> String {
    "changelog.md".to_string()
}

/// Release publishing options.
///
/// `repository` is an `owner/name` slug. When empty, `GITHUB_REPOSITORY` is used.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_changelog_file")]
    pub changelog_file: String,

    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default = "default_true")]
    pub module_notes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            changelog_file: default_changelog_file(),
            repository: None,
            module_notes: true,
        }
    }
}

impl ReleaseConfig {
    /// Repository slug from the config, falling back to `GITHUB_REPOSITORY`.
    pub fn resolved_repository(&self) -> Option<String> {
        self.repository
            .clone()
            .filter(|r| !r.trim().is_empty())
            .or_else(|| std::env::var("GITHUB_REPOSITORY").ok())
            .filter(|r| !r.trim().is_empty())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gowork-release.toml` in current directory
/// 3. `.gowork-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        read_config_file(Path::new(CONFIG_FILE_NAME))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            tracing::debug!("no config file found, using defaults");
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses a TOML configuration string.
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)
        .map_err(|e| ReleaseError::config(format!("invalid TOML: {}", e)))?;

    if config.workspace.module_filter.trim().is_empty() {
        return Err(ReleaseError::config(
            "workspace.module_filter must not be empty",
        ));
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "loading config");
    fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })
}
