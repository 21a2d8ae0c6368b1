use std::fmt;

/// Non-fatal conditions hit while updating a version.
/// These should be reported to the user but do not fail the command.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The changelog file does not exist, so no section was added
    ChangelogNotFound { path: String },
    /// `set` found no current version; the first writable source receives it
    NoExistingVersion { searched: String },
    /// The transition produced the version already stored
    VersionUnchanged { version: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::ChangelogNotFound { path } => {
                write!(f, "{} not found; skipping changelog update", path)
            }
            BoundaryWarning::NoExistingVersion { searched } => {
                write!(
                    f,
                    "No existing version found in {}; writing to the first writable source",
                    searched
                )
            }
            BoundaryWarning::VersionUnchanged { version } => {
                write!(f, "Version is already '{}'; nothing to change", version)
            }
        }
    }
}
