//! User interface module - reporting workflow results.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Turning a [WorkflowResult] into terminal output

use crate::cli::{Command, WorkflowResult};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_status, display_success, display_version,
    format_changelog_outcome, format_version_change,
};

/// Report the outcome of a command.
///
/// Warnings and status lines go to stderr, the final version to stdout.
pub fn report(command: &Command, result: &WorkflowResult, dry_run: bool) {
    for warning in &result.warnings {
        display_boundary_warning(warning);
    }

    if let Command::Check = command {
        display_success(&format!(
            "OK: version '{}' is canonical PEP 440 (no local segment).",
            result.version
        ));
        display_version(&result.version);
        return;
    }

    let change = format_version_change(result.previous.as_deref(), &result.version);
    match (&result.source, dry_run) {
        (Some(source), true) => display_status(&format!("[dry-run] {} ({})", change, source)),
        (None, true) => display_status(&format!("[dry-run] {}", change)),
        (Some(source), false) => display_success(&format!("{} written to {}", change, source)),
        (None, false) => display_success(&change),
    }

    if let Some(message) = result.changelog.as_ref().and_then(format_changelog_outcome) {
        display_status(&message);
    }

    display_version(&result.version);
}
