//! Version state machine
//!
//! Each [`Transition`] maps the currently stored identifier onto a new one. Nothing is
//! mutated in place: the current identifier is read, a new one is assembled and
//! re-validated through the canonical grammar.

use crate::domain::prerelease::{PreRelease, PreReleaseTag};
use crate::domain::version::{ensure_semver_base, ReleasePart, VersionIdentifier};
use crate::error::{Result, VersionkitError};

/// How a `.devN` / `.postN` counter is updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMode {
    /// Set the counter to an explicit value
    Set(u64),
    /// Increment the counter, starting from 0 when absent
    Bump,
    /// Keep an active counter, or start one at 1
    Activate,
}

impl CounterMode {
    /// Build a mode from the `--set N` / `--bump` flag pair.
    ///
    /// # Errors
    /// `InvalidArgumentCombination` when both flags are given or `N` is negative.
    pub fn from_flags(set: Option<i64>, bump: bool, counter: &str) -> Result<Self> {
        match (set, bump) {
            (Some(_), true) => Err(VersionkitError::invalid_arguments(format!(
                "--set and --bump are mutually exclusive for {}",
                counter
            ))),
            (Some(n), false) => u64::try_from(n).map(CounterMode::Set).map_err(|_| {
                VersionkitError::invalid_arguments(format!(
                    "{} number must be >= 0 (got {})",
                    counter, n
                ))
            }),
            (None, true) => Ok(CounterMode::Bump),
            (None, false) => Ok(CounterMode::Activate),
        }
    }

    /// Next counter value; `None` when a bump would overflow
    fn next(&self, current: Option<u64>) -> Option<u64> {
        match self {
            CounterMode::Set(n) => Some(*n),
            CounterMode::Bump => current.unwrap_or(0).checked_add(1),
            // A zero counter counts as inactive
            CounterMode::Activate => match current {
                Some(n) if n > 0 => Some(n),
                _ => Some(1),
            },
        }
    }
}

/// A named transition over the stored version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Drop pre, post and dev segments
    Finalize,
    /// Bump a release part and drop pre, post and dev segments
    Bump(ReleasePart),
    /// Start or advance a pre-release; drops post and dev
    Prerelease { tag: PreReleaseTag, start: bool },
    /// Update the dev counter; keeps pre, drops post
    Dev(CounterMode),
    /// Update the post counter; drops pre and dev
    Post(CounterMode),
}

impl Transition {
    /// Apply this transition, returning the next identifier.
    ///
    /// The epoch and release base of `current` are carried over except where a bump
    /// replaces the base.
    ///
    /// # Example
    /// ```ignore
    /// let current = parse_canonical("1.0.0rc1.dev2")?;
    /// let next = Transition::Post(CounterMode::Bump).apply(&current)?;
    /// assert_eq!(next.to_string(), "1.0.0.post1");
    /// ```
    pub fn apply(&self, current: &VersionIdentifier) -> Result<VersionIdentifier> {
        if let Some(local) = current.local() {
            return Err(VersionkitError::LocalSegmentNotAllowed {
                version: current.to_string(),
                local: local.to_string(),
            });
        }

        let epoch = current.epoch();
        let base = ensure_semver_base(current);

        match *self {
            Transition::Finalize => VersionIdentifier::assemble(epoch, base, None, None, None),
            Transition::Bump(part) => {
                let bumped = base
                    .bump(part)
                    .map_err(|_| VersionkitError::overflow(current.to_string(), part.as_str()))?;
                VersionIdentifier::assemble(epoch, bumped, None, None, None)
            }
            Transition::Prerelease { tag, start } => {
                let pre = match current.pre() {
                    Some(pre) if !start && pre.tag == tag => pre.increment().map_err(|_| {
                        VersionkitError::overflow(current.to_string(), tag.as_str())
                    })?,
                    _ => PreRelease::start(tag),
                };
                VersionIdentifier::assemble(epoch, base, Some(pre), None, None)
            }
            Transition::Dev(mode) => {
                let dev = mode
                    .next(current.dev())
                    .ok_or_else(|| VersionkitError::overflow(current.to_string(), "dev"))?;
                VersionIdentifier::assemble(epoch, base, current.pre(), None, Some(dev))
            }
            Transition::Post(mode) => {
                let post = mode
                    .next(current.post())
                    .ok_or_else(|| VersionkitError::overflow(current.to_string(), "post"))?;
                VersionIdentifier::assemble(epoch, base, None, Some(post), None)
            }
        }
    }

    /// Command name used in output and logs
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Finalize => "finalize",
            Transition::Bump(_) => "bump",
            Transition::Prerelease { .. } => "prerelease",
            Transition::Dev(_) => "dev",
            Transition::Post(_) => "post",
        }
    }
}
