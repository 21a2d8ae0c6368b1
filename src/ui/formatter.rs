//! Pure formatting functions for UI output.
//!
//! Decorated messages go to stderr; stdout only ever carries the resulting version so
//! the tool can be used in scripts (`NEW=$(bump-version bump patch)`).

use crate::boundary::BoundaryWarning;
use crate::changelog::ChangelogOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("\x1b[33m→\x1b[0m {}", message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", warning);
}

/// Print the resulting version, undecorated, on stdout.
pub fn display_version(version: &str) {
    println!("{}", version);
}

/// Describe a version change.
///
/// # Arguments
/// * `previous` - Version before the command (None if no source held one)
/// * `new_version` - Version after the command
pub fn format_version_change(previous: Option<&str>, new_version: &str) -> String {
    match previous {
        Some(old) => format!("\x1b[31m{}\x1b[0m -> \x1b[32m{}\x1b[0m", old, new_version),
        None => format!("\x1b[32m{}\x1b[0m", new_version),
    }
}

/// Describe a changelog outcome; `None` when there is nothing worth saying.
pub fn format_changelog_outcome(outcome: &ChangelogOutcome) -> Option<String> {
    match outcome {
        ChangelogOutcome::Inserted { .. } => {
            Some("Inserted new version header into changelog".to_string())
        }
        ChangelogOutcome::WouldInsert { entry } => {
            Some(format!("[dry-run] Would update changelog with:\n{}", entry))
        }
        ChangelogOutcome::AlreadyPresent => {
            Some("Changelog already has a section for this version".to_string())
        }
        // Reported as a boundary warning
        ChangelogOutcome::Missing { .. } => None,
        ChangelogOutcome::Skipped => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_version_change() {
        let msg = format_version_change(Some("1.0.0"), "1.1.0");
        assert!(msg.contains("1.0.0"));
        assert!(msg.contains("1.1.0"));
        assert!(msg.contains("->"));

        let initial = format_version_change(None, "0.1.0");
        assert!(!initial.contains("->"));
    }

    #[test]
    fn test_format_changelog_outcome() {
        let dry = format_changelog_outcome(&ChangelogOutcome::WouldInsert {
            entry: "## [1.0.0] - 2026-10-19".to_string(),
        })
        .unwrap();
        assert!(dry.starts_with("[dry-run]"));
        assert!(dry.contains("## [1.0.0]"));

        assert!(format_changelog_outcome(&ChangelogOutcome::Skipped).is_none());
        assert!(format_changelog_outcome(&ChangelogOutcome::Missing {
            path: "CHANGELOG.md".to_string()
        })
        .is_none());
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
