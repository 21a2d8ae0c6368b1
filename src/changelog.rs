//! CHANGELOG.md maintenance
//!
//! Inserts a dated `## [<version>] - <date>` section for a new version while keeping
//! the title/details block at the top and an optional leading `## [Unreleased]`
//! section ahead of all releases.
//!
//! Insertion rules:
//! - a header already naming the version: nothing to do
//! - first `##` header is `[Unreleased]`: insert after its block (before the next `##`
//!   header, or at the end of the file)
//! - otherwise: insert before the first `##` header
//! - no `##` header at all: append

use crate::error::Result;
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

static H2_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##[ \t]*(?P<title>\[[^\]\n]*\]|[^#\s][^\n]*?)[ \t]*\r?$")
        .expect("changelog header pattern is a valid regex")
});

/// Default body placed under a new version header
pub const DEFAULT_PLACEHOLDER: &str = "- _Describe changes here._";

/// What happened (or would happen) to the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogOutcome {
    /// No changelog file exists
    Missing { path: String },
    /// Disabled in configuration
    Skipped,
    /// A section for the version is already present
    AlreadyPresent,
    /// Dry run: the entry that would be inserted
    WouldInsert { entry: String },
    /// The entry was written
    Inserted { entry: String },
}

/// Port for recording a new version in a changelog
pub trait Changelog {
    /// Make sure the changelog has a section for `version`.
    ///
    /// In `dry_run` mode the insertion is computed and reported but not written.
    fn ensure_version(&self, version: &str, dry_run: bool) -> Result<ChangelogOutcome>;
}

/// Render the header and placeholder body for a version section
pub fn render_entry(version: &str, date: NaiveDate, placeholder: &str) -> String {
    format!(
        "## [{}] - {}\n\n{}\n\n",
        version,
        date.format("%Y-%m-%d"),
        placeholder
    )
}

/// Whether a `## <version>` or `## [<version>]` header exists
pub fn has_version(text: &str, version: &str) -> bool {
    let escaped = regex::escape(version);
    match Regex::new(&format!(r"(?m)^##[ \t]*(\[{0}\]|{0})(\s|$)", escaped)) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

/// Byte offset at which a new version section goes; `None` when there is no `##` header
fn insertion_point(text: &str) -> Option<usize> {
    let headers: Vec<_> = H2_RE.captures_iter(text).collect();
    let first = headers.first()?;

    let title = first["title"].trim().to_lowercase();
    let at = if title == "[unreleased]" || title == "unreleased" {
        headers
            .get(1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len())
    } else {
        first.get(0).map(|m| m.start()).unwrap_or(text.len())
    };
    Some(at)
}

/// Insert `entry` for `version` into changelog `text`.
///
/// Returns `None` when the version already has a section. Bytes outside the inserted
/// span are preserved. Without any `##` header the entry is appended on the next line;
/// otherwise a blank line is added before it when the preceding text does not already
/// end with one.
pub fn insert_version_section(text: &str, version: &str, entry: &str) -> Option<String> {
    if has_version(text, version) {
        return None;
    }

    let mut out = String::with_capacity(text.len() + entry.len() + 2);

    let Some(at) = insertion_point(text) else {
        out.push_str(text);
        if !text.is_empty() && !text.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(entry);
        return Some(out);
    };

    let (before, after) = text.split_at(at);
    out.push_str(before);
    if !before.is_empty() {
        if !before.ends_with('\n') {
            out.push('\n');
        }
        if !out.ends_with("\n\n") {
            out.push('\n');
        }
    }
    out.push_str(entry);
    out.push_str(after);
    Some(out)
}

/// File-backed Markdown changelog
pub struct MarkdownChangelog {
    path: PathBuf,
    placeholder: String,
    date: Option<NaiveDate>,
    enabled: bool,
}

impl MarkdownChangelog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        MarkdownChangelog {
            path: path.into(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            date: None,
            enabled: true,
        }
    }

    /// Body text placed under new headers
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Pin the release date instead of using today's local date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    fn release_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Changelog for MarkdownChangelog {
    fn ensure_version(&self, version: &str, dry_run: bool) -> Result<ChangelogOutcome> {
        if !self.enabled {
            return Ok(ChangelogOutcome::Skipped);
        }
        if !self.path.exists() {
            debug!(path = %self.path.display(), "changelog not found");
            return Ok(ChangelogOutcome::Missing {
                path: self.path.display().to_string(),
            });
        }

        let text = fs::read_to_string(&self.path)?;
        let entry = render_entry(version, self.release_date(), &self.placeholder);

        let Some(updated) = insert_version_section(&text, version, &entry) else {
            debug!(%version, "changelog already has a section for this version");
            return Ok(ChangelogOutcome::AlreadyPresent);
        };

        let entry = entry.trim_end().to_string();
        if dry_run {
            return Ok(ChangelogOutcome::WouldInsert { entry });
        }

        fs::write(&self.path, updated)?;
        debug!(path = %self.path.display(), %version, "inserted changelog section");
        Ok(ChangelogOutcome::Inserted { entry })
    }
}
