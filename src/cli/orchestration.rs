//! Command workflow orchestration
//!
//! Maps one user command onto the version sources, the state machine and the
//! changelog. Argument parsing stays in main.rs so the workflow can be driven
//! programmatically (and with mock sources in tests) without clap.

use tracing::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::changelog::{Changelog, ChangelogOutcome};
use crate::domain::{parse_canonical, Transition};
use crate::error::{Result, VersionkitError};
use crate::source::{SourceKind, SourceSet};

/// A user intent
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate the stored version
    Check,
    /// Replace the stored version with an explicit one
    Set { version: String },
    /// Apply a transition to the stored version
    Apply(Transition),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Check => "check",
            Command::Set { .. } => "set",
            Command::Apply(transition) => transition.name(),
        }
    }
}

/// Arguments for one workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowArgs {
    pub command: Command,

    /// Validate and report without writing anything
    pub dry_run: bool,
}

/// Result of a successful workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Version found in the sources before the command ran
    pub previous: Option<String>,

    /// Canonical version after the command
    pub version: String,

    /// Source read (check), written, or that would be written (dry run)
    pub source: Option<SourceKind>,

    /// Whether the version source was written
    pub written: bool,

    /// Changelog outcome; `None` for commands that don't touch it
    pub changelog: Option<ChangelogOutcome>,

    pub warnings: Vec<BoundaryWarning>,
}

/// Run one command end to end.
///
/// 1. Read the current version (all commands except `set` require one)
/// 2. Validate it, or the explicit `set` value, as canonical PEP 440 without `+local`
/// 3. Compute the next version
/// 4. Unless `dry_run`, write it back to the source it came from
/// 5. Make sure the changelog has a section for it
///
/// # Errors
/// Every failure is terminal: nothing is written once an error is returned.
pub fn run_workflow(
    args: &WorkflowArgs,
    sources: &SourceSet,
    changelog: &dyn Changelog,
) -> Result<WorkflowResult> {
    debug!(command = args.command.name(), dry_run = args.dry_run, "running command");

    match &args.command {
        Command::Check => {
            let located = sources.locate()?;
            let parsed = parse_canonical(&located.value)?;
            Ok(WorkflowResult {
                previous: Some(located.value),
                version: parsed.to_string(),
                source: Some(located.kind),
                written: false,
                changelog: None,
                warnings: Vec::new(),
            })
        }
        Command::Set { version } => {
            let parsed = parse_canonical(version.trim())?;
            let mut warnings = Vec::new();
            let (previous, hint) = match sources.locate() {
                Ok(located) => (Some(located.value), Some(located.kind)),
                Err(VersionkitError::VersionSourceNotFound { searched }) => {
                    warnings.push(BoundaryWarning::NoExistingVersion { searched });
                    (None, None)
                }
                Err(e) => return Err(e),
            };
            commit(
                parsed.to_string(),
                previous,
                hint,
                warnings,
                args.dry_run,
                sources,
                changelog,
            )
        }
        Command::Apply(transition) => {
            let located = sources.locate()?;
            let current = parse_canonical(&located.value)?;
            let next = transition.apply(&current)?;
            debug!(from = %current, to = %next, transition = transition.name(), "computed transition");
            commit(
                next.to_string(),
                Some(located.value),
                Some(located.kind),
                Vec::new(),
                args.dry_run,
                sources,
                changelog,
            )
        }
    }
}

fn commit(
    version: String,
    previous: Option<String>,
    hint: Option<SourceKind>,
    mut warnings: Vec<BoundaryWarning>,
    dry_run: bool,
    sources: &SourceSet,
    changelog: &dyn Changelog,
) -> Result<WorkflowResult> {
    if previous.as_deref() == Some(version.as_str()) {
        warnings.push(BoundaryWarning::VersionUnchanged {
            version: version.clone(),
        });
    }

    let source = if dry_run {
        hint
    } else {
        let kind = sources.write(&version, hint)?;
        info!(%version, source = %kind, "wrote version");
        Some(kind)
    };

    let outcome = changelog.ensure_version(&version, dry_run)?;
    if let ChangelogOutcome::Missing { path } = &outcome {
        warnings.push(BoundaryWarning::ChangelogNotFound { path: path.clone() });
    }

    Ok(WorkflowResult {
        previous,
        version,
        source,
        written: !dry_run,
        changelog: Some(outcome),
        warnings,
    })
}
