//! Version source abstraction layer
//!
//! The current version lives in one of several project metadata files. Each format is
//! handled by an adapter implementing [VersionSource]; a [SourceSet] probes them in
//! priority order and writes the new version back to the one that held it.
//!
//! # Overview
//!
//! - [pyproject::PyProjectSource]: `project.version` / `tool.poetry.version` in `pyproject.toml`
//! - [setup_cfg::SetupCfgSource]: `version = ...` in `setup.cfg`
//! - [version_txt::VersionTxtSource]: a single-line `version.txt`
//! - [mock::MockSource]: in-memory source for testing
//!
//! ```rust
//! # use versionkit::source::{SourceKind, SourceSet};
//! # use std::path::Path;
//! # fn example() -> versionkit::Result<()> {
//! let sources = SourceSet::from_kinds(Path::new("."), &SourceKind::default_order());
//! let located = sources.locate()?;
//! sources.write("1.2.0", Some(located.kind))?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod pyproject;
pub mod setup_cfg;
pub mod version_txt;

pub use mock::MockSource;
pub use pyproject::PyProjectSource;
pub use setup_cfg::SetupCfgSource;
pub use version_txt::VersionTxtSource;

use crate::error::{Result, VersionkitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Identifies a supported version source format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "pyproject", alias = "pyproject.toml")]
    PyProject,
    #[serde(rename = "setup.cfg")]
    SetupCfg,
    #[serde(rename = "version.txt")]
    VersionTxt,
}

impl SourceKind {
    /// Probe order used when no configuration overrides it
    pub fn default_order() -> Vec<SourceKind> {
        vec![
            SourceKind::PyProject,
            SourceKind::SetupCfg,
            SourceKind::VersionTxt,
        ]
    }

    /// File name of this source relative to the project root
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::PyProject => "pyproject.toml",
            SourceKind::SetupCfg => "setup.cfg",
            SourceKind::VersionTxt => "version.txt",
        }
    }

    /// Build the file-backed adapter for this kind under `root`
    pub fn open(&self, root: &Path) -> Box<dyn VersionSource> {
        let path = root.join(self.file_name());
        match self {
            SourceKind::PyProject => Box::new(PyProjectSource::new(path)),
            SourceKind::SetupCfg => Box::new(SetupCfgSource::new(path)),
            SourceKind::VersionTxt => Box::new(VersionTxtSource::new(path)),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Read/write port for one location holding the version string
///
/// Implementations only deal with their own file format; callers never inspect file
/// contents. Missing files are not errors: they read as `None`.
pub trait VersionSource: Send + Sync {
    /// Format of this source
    fn kind(&self) -> SourceKind;

    /// Human readable location (usually a path) for messages
    fn location(&self) -> String;

    /// Read the raw version string
    ///
    /// # Returns
    /// * `Ok(Some(String))` - The version field exists and is non-empty
    /// * `Ok(None)` - The file or field doesn't exist
    /// * `Err` - The file exists but cannot be read or parsed
    fn try_read(&self) -> Result<Option<String>>;

    /// Replace the version string, preserving everything else in the file
    ///
    /// # Returns
    /// * `Ok(true)` - The new version was written
    /// * `Ok(false)` - This source has nowhere to put a version
    /// * `Err` - An I/O error occurred
    fn try_write(&self, new_version: &str) -> Result<bool>;
}

/// A version read from a source, together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedVersion {
    pub value: String,
    pub kind: SourceKind,
    pub location: String,
}

/// Ordered collection of version sources
pub struct SourceSet {
    sources: Vec<Box<dyn VersionSource>>,
}

impl SourceSet {
    /// Create a set probing `sources` in the given order
    pub fn new(sources: Vec<Box<dyn VersionSource>>) -> Self {
        SourceSet { sources }
    }

    /// File-backed sources under `root`, in the order of `kinds`
    pub fn from_kinds(root: &Path, kinds: &[SourceKind]) -> Self {
        SourceSet::new(kinds.iter().map(|kind| kind.open(root)).collect())
    }

    /// Locations probed, in order, for error messages
    pub fn describe(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.location())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Find the first source holding a version.
    ///
    /// # Errors
    /// `VersionSourceNotFound` when no source yields a value.
    pub fn locate(&self) -> Result<LocatedVersion> {
        for source in &self.sources {
            debug!(source = %source.location(), "probing version source");
            if let Some(value) = source.try_read()? {
                debug!(source = %source.location(), %value, "found version");
                return Ok(LocatedVersion {
                    value,
                    kind: source.kind(),
                    location: source.location(),
                });
            }
        }
        Err(VersionkitError::VersionSourceNotFound {
            searched: self.describe(),
        })
    }

    /// Write `new_version` back.
    ///
    /// With a `hint`, only the source of that kind is written: the version must land
    /// where it was read from. Without one, sources are tried in priority order and the
    /// first that accepts the value wins.
    ///
    /// # Returns
    /// The kind of the source that was written.
    pub fn write(&self, new_version: &str, hint: Option<SourceKind>) -> Result<SourceKind> {
        if let Some(kind) = hint {
            let source = self
                .sources
                .iter()
                .find(|s| s.kind() == kind)
                .ok_or_else(|| {
                    VersionkitError::write_failed(kind.to_string(), "source is not configured")
                })?;
            debug!(source = %source.location(), %new_version, "writing version");
            return if source.try_write(new_version)? {
                Ok(kind)
            } else {
                Err(VersionkitError::write_failed(
                    source.location(),
                    "no version field to replace",
                ))
            };
        }

        for source in &self.sources {
            debug!(source = %source.location(), %new_version, "trying to write version");
            if source.try_write(new_version)? {
                return Ok(source.kind());
            }
        }
        Err(VersionkitError::write_failed(
            self.describe(),
            "no source accepted the version",
        ))
    }
}
