use thiserror::Error;

/// Unified error type for versionkit operations
#[derive(Error, Debug)]
pub enum VersionkitError {
    #[error("'{input}' is not PEP 440 compliant: {reason}")]
    InvalidVersionFormat { input: String, reason: String },

    #[error("'{input}' is not canonical PEP 440 form. Use '{canonical}'.")]
    NonCanonicalForm { input: String, canonical: String },

    #[error("Local versions '+{local}' are not allowed for public releases ('{version}')")]
    LocalSegmentNotAllowed { version: String, local: String },

    #[error("Could not find version in {searched}")]
    VersionSourceNotFound { searched: String },

    #[error("Failed to write new version to {location}: {reason}")]
    VersionSourceWriteFailed { location: String, reason: String },

    #[error("Cannot increment {part} of '{version}': the number would overflow")]
    NumberOverflow { version: String, part: String },

    #[error("Invalid arguments: {0}")]
    InvalidArgumentCombination(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in versionkit
pub type Result<T> = std::result::Result<T, VersionkitError>;

impl VersionkitError {
    /// Create a format error for an unparseable version string
    pub fn invalid_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        VersionkitError::InvalidVersionFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a write failure for a located version source
    pub fn write_failed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        VersionkitError::VersionSourceWriteFailed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create an overflow error for a counter or release part at its maximum
    pub fn overflow(version: impl Into<String>, part: impl Into<String>) -> Self {
        VersionkitError::NumberOverflow {
            version: version.into(),
            part: part.into(),
        }
    }

    /// Create an argument validation error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        VersionkitError::InvalidArgumentCombination(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionkitError::Config(msg.into())
    }
}
