use crate::error::Result;
use crate::source::{SourceKind, VersionSource};
use std::fs;
use std::path::PathBuf;

/// `version.txt`: the whole file is the version
pub struct VersionTxtSource {
    path: PathBuf,
}

impl VersionTxtSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VersionTxtSource { path: path.into() }
    }
}

impl VersionSource for VersionTxtSource {
    fn kind(&self) -> SourceKind {
        SourceKind::VersionTxt
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn try_read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let trimmed = content.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    /// Always succeeds, creating the file if needed
    fn try_write(&self, new_version: &str) -> Result<bool> {
        fs::write(&self.path, format!("{}\n", new_version))?;
        Ok(true)
    }
}
