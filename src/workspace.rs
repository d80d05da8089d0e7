//! Module discovery from a `go.work` workspace manifest.
//!
//! Only `use` directives are read, in both forms:
//!
//! ```text
//! use ./extra/sql
//!
//! use (
//!     .
//!     ./extra/fuegogin // trailing comments are ignored
//! )
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::domain::ModulePath;
use crate::error::{ReleaseError, Result};

/// Returns every path listed by `use` directives, in file order.
pub fn parse_use_directives(manifest: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut in_use_block = false;

    for raw_line in manifest.lines() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if in_use_block {
            // the closing paren may share a line with the last path: "./extra/b)"
            let (entry, closes) = match line.strip_suffix(')') {
                Some(rest) => (rest.trim(), true),
                None => (line, false),
            };
            if !entry.is_empty() {
                paths.push(unquote(entry).to_string());
            }
            if closes {
                in_use_block = false;
            }
            continue;
        }

        let Some(rest) = line.strip_prefix("use") else {
            continue;
        };
        // "user ..." or "used" are not directives
        if !rest.is_empty() && !rest.starts_with(|c: char| c.is_whitespace() || c == '(') {
            continue;
        }

        let rest = rest.trim();
        if let Some(block) = rest.strip_prefix('(') {
            let block = block.trim();
            // one-line block: use ( ./a )
            if let Some(inner) = block.strip_suffix(')') {
                paths.extend(inner.split_whitespace().map(|p| unquote(p).to_string()));
            } else {
                if !block.is_empty() {
                    paths.push(unquote(block).to_string());
                }
                in_use_block = true;
            }
        } else if !rest.is_empty() {
            paths.push(unquote(rest).to_string());
        }
    }

    paths
}

/// Modules whose path contains `filter`, whitespace-trimmed, in manifest order.
///
/// A path listed twice is reported once, at its first position.
pub fn discover_modules(manifest: &str, filter: &str) -> Vec<ModulePath> {
    let mut seen = HashSet::new();

    parse_use_directives(manifest)
        .iter()
        .map(|p| ModulePath::new(p))
        .filter(|m| !m.is_root() && m.as_str().contains(filter))
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

/// Reads the manifest at `root/manifest` and discovers the modules to release.
pub fn load_modules(root: &Path, manifest: &str, filter: &str) -> Result<Vec<ModulePath>> {
    let path = root.join(manifest);
    let content = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::manifest(format!("cannot read {}: {}", path.display(), e))
    })?;

    let modules = discover_modules(&content, filter);
    tracing::debug!(
        manifest = %path.display(),
        count = modules.len(),
        "discovered workspace modules"
    );
    Ok(modules)
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn unquote(s: &str) -> &str {
    s.trim()
        .trim_start_matches(['"', '`'])
        .trim_end_matches(['"', '`'])
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUEGO_WORK: &str = "go 1.22.2

use (
\t.
\t./examples/basic
\t./examples/petstore
\t./extra/fuegoecho
\t./extra/fuegogin
\t./extra/markdown
\t./extra/sql
\t./extra/sqlite3
)
";

    #[test]
    fn test_parse_block() {
        let paths = parse_use_directives(FUEGO_WORK);
        assert_eq!(paths.len(), 8);
        assert_eq!(paths[0], ".");
        assert_eq!(paths[7], "./extra/sqlite3");
    }

    #[test]
    fn test_discover_filters_extra_in_order() {
        let modules = discover_modules(FUEGO_WORK, "extra/");
        let names: Vec<&str> = modules.iter().map(|m| m.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "extra/fuegoecho",
                "extra/fuegogin",
                "extra/markdown",
                "extra/sql",
                "extra/sqlite3"
            ]
        );
    }

    #[test]
    fn test_single_line_directives_and_comments() {
        let manifest = "go 1.21\n\
            use ./extra/b // second\n\
            use \"./extra/a\"\n\
            // use ./extra/commented\n\
            replace example.com/extra/x => ./extra/x\n";
        let modules = discover_modules(manifest, "extra/");
        let names: Vec<&str> = modules.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["extra/b", "extra/a"]);
    }

    #[test]
    fn test_one_line_block() {
        let paths = parse_use_directives("use ( ./extra/a ./extra/b )\n");
        assert_eq!(paths, vec!["./extra/a", "./extra/b"]);
    }

    #[test]
    fn test_block_closed_on_last_path_line() {
        let manifest = "use (\n\t./extra/a\n\t./extra/b)\n\nreplace example.com/extra/x => ./extra/x\n";
        let modules = discover_modules(manifest, "extra/");
        let names: Vec<&str> = modules.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["extra/a", "extra/b"]);
    }

    #[test]
    fn test_whitespace_trimmed_and_deduplicated() {
        let manifest = "use (\n   ./extra/sql   \r\n./extra/sql\n\t./extra/gin\t\n)\n";
        let modules = discover_modules(manifest, "extra/");
        let names: Vec<&str> = modules.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["extra/sql", "extra/gin"]);
    }

    #[test]
    fn test_no_modules() {
        assert!(discover_modules("go 1.22\n\nuse .\n", "extra/").is_empty());
        assert!(discover_modules("", "extra/").is_empty());
    }

    #[test]
    fn test_identifier_starting_with_use_is_ignored() {
        assert!(parse_use_directives("user ./extra/x\n").is_empty());
    }

    #[test]
    fn test_load_modules_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_modules(dir.path(), "go.work", "extra/").unwrap_err();
        assert!(matches!(err, ReleaseError::Manifest(_)));
    }

    #[test]
    fn test_load_modules_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("go.work"), FUEGO_WORK).unwrap();
        let modules = load_modules(dir.path(), "go.work", "extra/").unwrap();
        assert_eq!(modules.len(), 5);
    }
}
