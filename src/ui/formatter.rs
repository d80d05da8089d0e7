//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::changelog::Changelog;
use crate::domain::{ModulePath, TagPlan};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a dry-run action in cyan so it stands apart from real changes.
pub fn display_dry_run(message: &str) {
    println!("{} {}", style("◦").cyan(), style(message).cyan());
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Module list shown after validation.
pub fn format_modules(modules: &[ModulePath]) -> String {
    let mut out = format!("\n{}\n", style("Workspace modules:").bold());
    if modules.is_empty() {
        out.push_str("  (none)\n");
    }
    for module in modules {
        out.push_str(&format!("  - {}\n", module));
    }
    out
}

/// Display the modules discovered in the workspace manifest.
pub fn display_modules(modules: &[ModulePath]) {
    print!("{}", format_modules(modules));
}

pub fn format_tag_plan(plan: &TagPlan) -> String {
    let mut out = format!(
        "\n{}\n",
        style(format!("Tags for {}:", plan.version)).bold()
    );
    for tag in plan.tags() {
        out.push_str(&format!("  {}\n", style(&tag.name).green()));
    }
    out
}

/// Display every tag a release will create.
pub fn display_tag_plan(plan: &TagPlan) {
    print!("{}", format_tag_plan(plan));
}

/// The first lines of a changelog.
///
/// Shows at most 10 entries and a count of the remaining ones.
pub fn format_changelog_preview(changelog: &Changelog) -> String {
    let since = changelog
        .previous_tag
        .as_deref()
        .unwrap_or("the beginning of history");
    let mut out = format!(
        "\n{}\n",
        style(format!(
            "{} commits since {}:",
            changelog.entries.len(),
            since
        ))
        .underlined()
    );

    for entry in changelog.entries.iter().take(10) {
        out.push_str(&format!("  {}\n", entry.render()));
    }

    if changelog.entries.len() > 10 {
        out.push_str(&format!(
            "  ... and {} more commits\n",
            changelog.entries.len() - 10
        ));
    }
    out
}

pub fn display_changelog_preview(changelog: &Changelog) {
    print!("{}", format_changelog_preview(changelog));
}
