use crate::error::Result;
use crate::source::{SourceKind, VersionSource};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

static VERSION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?P<prefix>\s*version\s*=\s*)(?:"[^"]*"|(?P<single>'[^']*'))(?P<suffix>\s*(?:#.*)?)$"#)
        .expect("version line pattern is a valid regex")
});

/// `pyproject.toml`: PEP 621 `[project]` first, then `[tool.poetry]`
pub struct PyProjectSource {
    path: PathBuf,
}

impl PyProjectSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PyProjectSource { path: path.into() }
    }
}

impl VersionSource for PyProjectSource {
    fn kind(&self) -> SourceKind {
        SourceKind::PyProject
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn try_read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let doc: toml::Table = toml::from_str(&fs::read_to_string(&self.path)?)?;

        let project = doc
            .get("project")
            .and_then(|p| p.get("version"))
            .and_then(|v| v.as_str());
        let poetry = doc
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|p| p.get("version"))
            .and_then(|v| v.as_str());

        Ok(project
            .filter(|v| !v.is_empty())
            .or(poetry.filter(|v| !v.is_empty()))
            .map(str::to_string))
    }

    fn try_write(&self, new_version: &str) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let text = fs::read_to_string(&self.path)?;

        let updated = replace_in_section(&text, "project", new_version)
            .or_else(|| replace_in_section(&text, "tool.poetry", new_version));

        match updated {
            Some(new_text) => {
                fs::write(&self.path, new_text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Replace the first `version = "..."` line inside `[section]`.
///
/// Returns `None` when the section has no such line. Line endings, quoting style and
/// every other line are kept as they are.
fn replace_in_section(text: &str, section: &str, new_version: &str) -> Option<String> {
    let header = format!("[{}]", section);
    let mut out = String::with_capacity(text.len() + new_version.len());
    let mut in_section = false;
    let mut replaced = false;

    for line in text.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);
        let trimmed = body.trim();

        if trimmed.starts_with('[') {
            in_section = trimmed == header;
        } else if in_section && !replaced {
            if let Some(caps) = VERSION_LINE_RE.captures(body) {
                let quote = if caps.name("single").is_some() { '\'' } else { '"' };
                out.push_str(&caps["prefix"]);
                out.push(quote);
                out.push_str(new_version);
                out.push(quote);
                out.push_str(&caps["suffix"]);
                out.push_str(ending);
                replaced = true;
                continue;
            }
        }
        out.push_str(line);
    }

    replaced.then_some(out)
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
