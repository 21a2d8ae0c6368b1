use crate::changelog::DEFAULT_PLACEHOLDER;
use crate::error::{Result, VersionkitError};
use crate::source::SourceKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the complete configuration for versionkit.
///
/// Contains the project layout (where version sources live and in which order they are
/// probed) and changelog settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_sources() -> Vec<SourceKind> {
    SourceKind::default_order()
}

/// Where the version lives.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Directory containing the version sources
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Version sources in probe order
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceKind>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            root: default_root(),
            sources: default_sources(),
        }
    }
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_enabled() -> bool {
    true
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

/// Changelog behaviour.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    /// Changelog file; relative paths resolve against the project root
    #[serde(default = "default_changelog_path")]
    pub path: PathBuf,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Body inserted under each new version header
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
            enabled: default_enabled(),
            placeholder: default_placeholder(),
        }
    }
}

impl Config {
    /// Check settings that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.project.sources.is_empty() {
            return Err(VersionkitError::config(
                "project.sources must list at least one version source",
            ));
        }
        for (i, kind) in self.project.sources.iter().enumerate() {
            if self.project.sources[..i].contains(kind) {
                return Err(VersionkitError::config(format!(
                    "version source '{}' is listed more than once",
                    kind
                )));
            }
        }
        Ok(())
    }

    /// Changelog path resolved against `root`
    pub fn changelog_path(&self, root: &Path) -> PathBuf {
        if self.changelog.path.is_absolute() {
            self.changelog.path.clone()
        } else {
            root.join(&self.changelog.path)
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versionkit.toml` in current directory
/// 3. `.versionkit.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            VersionkitError::config(format!("cannot read config file '{}': {}", path, e))
        })?
    } else if Path::new("./versionkit.toml").exists() {
        fs::read_to_string("./versionkit.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".versionkit.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}
