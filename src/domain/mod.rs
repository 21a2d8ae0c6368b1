//! Domain logic - version grammar and transitions, independent of file formats

pub mod prerelease;
pub mod transition;
pub mod version;

pub use prerelease::{PreRelease, PreReleaseTag};
pub use transition::{CounterMode, Transition};
pub use version::{
    build_version, ensure_semver_base, parse_canonical, ReleasePart, SemverBase,
    VersionIdentifier,
};
