use crate::error::Result;
use crate::source::{SourceKind, VersionSource};
use regex::{Captures, Regex};
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(?P<prefix>[ \t]*version[ \t]*=[ \t]*)(?P<value>[^\s#]+)")
        .expect("setup.cfg version pattern is a valid regex")
});

/// `setup.cfg`: the first `version = <value>` line, in any section
pub struct SetupCfgSource {
    path: PathBuf,
}

impl SetupCfgSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SetupCfgSource { path: path.into() }
    }
}

impl VersionSource for SetupCfgSource {
    fn kind(&self) -> SourceKind {
        SourceKind::SetupCfg
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn try_read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(VERSION_RE
            .captures(&text)
            .map(|caps| caps["value"].trim().to_string()))
    }

    fn try_write(&self, new_version: &str) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let text = fs::read_to_string(&self.path)?;
        if !VERSION_RE.is_match(&text) {
            return Ok(false);
        }
        let updated = VERSION_RE.replacen(&text, 1, |caps: &Captures| {
            format!("{}{}", &caps["prefix"], new_version)
        });
        fs::write(&self.path, updated.as_bytes())?;
        Ok(true)
    }
}
