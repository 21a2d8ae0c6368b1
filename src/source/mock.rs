use crate::error::Result;
use crate::source::{SourceKind, VersionSource};
use std::sync::Mutex;

/// In-memory version source for testing without touching the filesystem
pub struct MockSource {
    kind: SourceKind,
    value: Mutex<Option<String>>,
    writable: bool,
    writes: Mutex<Vec<String>>,
}

impl MockSource {
    /// A source that holds no version yet
    pub fn empty(kind: SourceKind) -> Self {
        MockSource {
            kind,
            value: Mutex::new(None),
            writable: true,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// A source holding `version`
    pub fn with_version(kind: SourceKind, version: impl Into<String>) -> Self {
        let source = MockSource::empty(kind);
        *source.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(version.into());
        source
    }

    /// Refuse every write, like a file without a version field
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Current value
    pub fn value(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Every value written so far, oldest first
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl VersionSource for MockSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn location(&self) -> String {
        format!("mock:{}", self.kind)
    }

    fn try_read(&self) -> Result<Option<String>> {
        Ok(self.value())
    }

    fn try_write(&self, new_version: &str) -> Result<bool> {
        if !self.writable {
            return Ok(false);
        }
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(new_version.to_string());
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(new_version.to_string());
        Ok(true)
    }
}
