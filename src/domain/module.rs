use std::fmt;

/// Path of a workspace sub-module relative to the repository root (e.g. "extra/fuegogin").
///
/// Go module tags are prefixed with this path, so it is normalised to the form git expects:
/// no surrounding whitespace, no leading "./" and no trailing "/".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(String);

impl ModulePath {
    pub fn new(path: &str) -> Self {
        let mut trimmed = path.trim();
        while let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        }
        ModulePath(trimmed.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The workspace root itself ("." in go.work).
    pub fn is_root(&self) -> bool {
        self.0.is_empty() || self.0 == "."
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
