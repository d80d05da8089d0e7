use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const VERSION_PATTERN: &str = r"^v[0-9]+\.[0-9]+\.[0-9]+(?:-([a-zA-Z0-9.-]+))?$";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

/// A release version as given on the command line (e.g. "v1.2.3", "v2.0.0-rc.1").
///
/// The original string is kept verbatim because it becomes part of every tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    raw: String,
    prerelease: Option<String>,
}

impl ReleaseVersion {
    /// Validate and parse a version string.
    pub fn parse(input: &str) -> Result<Self> {
        let captures = version_regex()
            .captures(input)
            .ok_or_else(|| ReleaseError::InvalidVersion(input.to_string()))?;

        Ok(ReleaseVersion {
            raw: input.to_string(),
            prerelease: captures.get(1).map(|m| m.as_str().to_string()),
        })
    }

    /// Returns true for input that would pass `parse`.
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Pre-release suffix without the leading '-'.
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Semver view for precedence comparisons. None when the string is not strict semver,
    /// e.g. "v01.2.3" passes validation but has a leading zero.
    pub fn to_semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.raw[1..]).ok()
    }
}

impl FromStr for ReleaseVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
