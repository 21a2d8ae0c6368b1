//! Pre-release segment handling for PEP 440 versions
//!
//! A pre-release is a tag (alpha, beta, release candidate) immediately followed by
//! a number, e.g. `a1`, `b2`, `rc3`. See https://peps.python.org/pep-0440/#pre-releases

use crate::error::{Result, VersionkitError};
use std::fmt;
use std::str::FromStr;

/// Pre-release tag in its canonical spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreReleaseTag {
    /// Alpha pre-release (`a`)
    Alpha,
    /// Beta pre-release (`b`)
    Beta,
    /// Release candidate (`rc`)
    ReleaseCandidate,
}

impl PreReleaseTag {
    /// Canonical spelling of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            PreReleaseTag::Alpha => "a",
            PreReleaseTag::Beta => "b",
            PreReleaseTag::ReleaseCandidate => "rc",
        }
    }
}

impl FromStr for PreReleaseTag {
    type Err = VersionkitError;

    /// Accepts every spelling the grammar allows: `a`/`alpha`, `b`/`beta`,
    /// `c`/`rc`/`pre`/`preview`, in any case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "alpha" => Ok(PreReleaseTag::Alpha),
            "b" | "beta" => Ok(PreReleaseTag::Beta),
            "c" | "rc" | "pre" | "preview" => Ok(PreReleaseTag::ReleaseCandidate),
            _ => Err(VersionkitError::invalid_format(
                s,
                "unknown pre-release tag (expected a, b or rc)",
            )),
        }
    }
}

impl fmt::Display for PreReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-release segment: a tag and its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreRelease {
    pub tag: PreReleaseTag,
    pub number: u64,
}

impl PreRelease {
    pub fn new(tag: PreReleaseTag, number: u64) -> Self {
        PreRelease { tag, number }
    }

    /// First pre-release of a cycle: `<tag>1`
    pub fn start(tag: PreReleaseTag) -> Self {
        PreRelease::new(tag, 1)
    }

    /// Next pre-release with the same tag
    ///
    /// # Errors
    /// `NumberOverflow` when the number is already `u64::MAX`.
    pub fn increment(&self) -> Result<Self> {
        let number = self
            .number
            .checked_add(1)
            .ok_or_else(|| VersionkitError::overflow(self.to_string(), self.tag.as_str()))?;
        Ok(PreRelease::new(self.tag, number))
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag, self.number)
    }
}
