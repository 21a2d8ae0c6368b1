//! PEP 440 version identifiers
//!
//! Parsing follows the permissive grammar from
//! <https://peps.python.org/pep-0440/#appendix-b-parsing-version-strings-with-regular-expressions>,
//! and serialization always produces the normalized (canonical) spelling. A string is
//! canonical iff parsing and re-serializing it reproduces it exactly.

use crate::domain::prerelease::{PreRelease, PreReleaseTag};
use crate::error::{Result, VersionkitError};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

const VERSION_PATTERN: &str = r"(?xi)
^\s*
v?
(?:(?P<epoch>[0-9]+)!)?
(?P<release>[0-9]+(?:\.[0-9]+)*)
(?P<pre_field>
    [-_\.]?
    (?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)
    [-_\.]?
    (?P<pre_n>[0-9]+)?
)?
(?P<post_field>
    (?:-(?P<post_n1>[0-9]+))
    |
    (?:
        [-_\.]?
        (?P<post_l>post|rev|r)
        [-_\.]?
        (?P<post_n2>[0-9]+)?
    )
)?
(?P<dev_field>
    [-_\.]?
    (?P<dev_l>dev)
    [-_\.]?
    (?P<dev_n>[0-9]+)?
)?
(?:\+(?P<local>[a-z0-9]+(?:[-_\.][a-z0-9]+)*))?
\s*$";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VERSION_PATTERN).expect("version grammar is a valid regex"));

/// A parsed PEP 440 version.
///
/// Values are immutable; transitions build new identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionIdentifier {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<PreRelease>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

impl VersionIdentifier {
    /// Parse any spelling the grammar accepts, without enforcing canonical form.
    ///
    /// Use [`parse_canonical`] for user-facing validation.
    ///
    /// # Example
    /// ```ignore
    /// let v = VersionIdentifier::parse("1.0-RC.1")?;
    /// assert_eq!(v.to_string(), "1.0rc1");
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let captures = VERSION_RE.captures(text).ok_or_else(|| {
            VersionkitError::invalid_format(text, "does not match the version grammar")
        })?;
        Self::from_captures(text, &captures)
    }

    fn from_captures(text: &str, captures: &Captures) -> Result<Self> {
        let number = |name: &str| -> Result<Option<u64>> {
            captures
                .name(name)
                .map(|m| {
                    m.as_str().parse::<u64>().map_err(|e| {
                        VersionkitError::invalid_format(
                            text,
                            format!("'{}' is not a valid number: {}", m.as_str(), e),
                        )
                    })
                })
                .transpose()
        };

        let epoch = number("epoch")?.unwrap_or(0);

        let release = captures
            .name("release")
            .map(|m| m.as_str())
            .unwrap_or_default()
            .split('.')
            .map(|segment| {
                segment.parse::<u64>().map_err(|e| {
                    VersionkitError::invalid_format(
                        text,
                        format!("release segment '{}': {}", segment, e),
                    )
                })
            })
            .collect::<Result<Vec<u64>>>()?;

        // Implicit pre-release, post-release and dev-release numbers are 0
        let pre = match captures.name("pre_l") {
            Some(tag) => Some(PreRelease::new(
                tag.as_str().parse::<PreReleaseTag>()?,
                number("pre_n")?.unwrap_or(0),
            )),
            None => None,
        };

        let post = if captures.name("post_field").is_some() {
            Some(number("post_n1")?.or(number("post_n2")?).unwrap_or(0))
        } else {
            None
        };

        let dev = if captures.name("dev_field").is_some() {
            Some(number("dev_n")?.unwrap_or(0))
        } else {
            None
        };

        let local = captures.name("local").map(|m| normalize_local(m.as_str()));

        Ok(VersionIdentifier {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Assemble an identifier from structured parts and run it back through the
    /// canonical grammar.
    pub(crate) fn assemble(
        epoch: u64,
        base: SemverBase,
        pre: Option<PreRelease>,
        post: Option<u64>,
        dev: Option<u64>,
    ) -> Result<Self> {
        let mut text = String::new();
        if epoch != 0 {
            text.push_str(&format!("{}!", epoch));
        }
        text.push_str(&base.to_string());
        if let Some(pre) = pre {
            text.push_str(&pre.to_string());
        }
        if let Some(post) = post {
            text.push_str(&format!(".post{}", post));
        }
        if let Some(dev) = dev {
            text.push_str(&format!(".dev{}", dev));
        }
        parse_canonical(&text)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn pre(&self) -> Option<PreRelease> {
        self.pre
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }
}

/// Lowercase, unify separators to `.`, and strip leading zeros from numeric parts.
fn normalize_local(local: &str) -> String {
    local
        .split(['-', '_', '.'])
        .map(|part| {
            if part.chars().all(|c| c.is_ascii_digit()) {
                let trimmed = part.trim_start_matches('0');
                if trimmed.is_empty() {
                    "0".to_string()
                } else {
                    trimmed.to_string()
                }
            } else {
                part.to_ascii_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Canonical serialization
impl fmt::Display for VersionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release = self
            .release
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&release)?;
        if let Some(pre) = &self.pre {
            write!(f, "{}", pre)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}

/// Parse a version and require it to be canonical and free of a local segment.
///
/// # Errors
/// * `InvalidVersionFormat` - the text does not match the grammar
/// * `NonCanonicalForm` - the text parses but is not spelled canonically
/// * `LocalSegmentNotAllowed` - the text is canonical but carries `+local`
pub fn parse_canonical(text: &str) -> Result<VersionIdentifier> {
    let parsed = VersionIdentifier::parse(text)?;
    let canonical = parsed.to_string();
    if canonical != text {
        return Err(VersionkitError::NonCanonicalForm {
            input: text.to_string(),
            canonical,
        });
    }
    if let Some(local) = parsed.local() {
        return Err(VersionkitError::LocalSegmentNotAllowed {
            version: canonical.clone(),
            local: local.to_string(),
        });
    }
    Ok(parsed)
}

/// Release triple used by every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemverBase {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemverBase {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemverBase {
            major,
            minor,
            patch,
        }
    }

    /// Bump one release part, zeroing the parts below it
    ///
    /// # Errors
    /// `NumberOverflow` when the bumped part is already `u64::MAX`.
    pub fn bump(&self, part: ReleasePart) -> Result<Self> {
        let next = |n: u64| {
            n.checked_add(1)
                .ok_or_else(|| VersionkitError::overflow(self.to_string(), part.as_str()))
        };
        Ok(match part {
            ReleasePart::Major => SemverBase::new(next(self.major)?, 0, 0),
            ReleasePart::Minor => SemverBase::new(self.major, next(self.minor)?, 0),
            ReleasePart::Patch => SemverBase::new(self.major, self.minor, next(self.patch)?),
        })
    }
}

impl fmt::Display for SemverBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Release part selected for a bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePart {
    Major,
    Minor,
    Patch,
}

impl ReleasePart {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleasePart::Major => "major",
            ReleasePart::Minor => "minor",
            ReleasePart::Patch => "patch",
        }
    }
}

/// Pad the release sequence with zeros to three parts and truncate to exactly three.
pub fn ensure_semver_base(id: &VersionIdentifier) -> SemverBase {
    let part = |i: usize| id.release.get(i).copied().unwrap_or(0);
    SemverBase::new(part(0), part(1), part(2))
}

/// Build canonical version text from a release triple and optional segments.
///
/// The result never carries an epoch or a local segment.
pub fn build_version(
    base: SemverBase,
    pre: Option<PreRelease>,
    post: Option<u64>,
    dev: Option<u64>,
) -> Result<String> {
    VersionIdentifier::assemble(0, base, pre, post, dev).map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(input: &str) -> String {
        match parse_canonical(input) {
            Err(VersionkitError::NonCanonicalForm { canonical, .. }) => canonical,
            other => panic!("expected NonCanonicalForm for '{}', got {:?}", input, other),
        }
    }

    #[test]
    fn test_canonical_round_trip() {
        for v in [
            "1.2.3",
            "0.1",
            "2",
            "1.0.0a1",
            "1.0.0b2",
            "1.0.0rc10",
            "1.0.0.post0",
            "1.0.0.dev0",
            "1.0.0rc1.post2.dev3",
            "1!2.0.0",
            "2024.10.19",
        ] {
            let parsed = parse_canonical(v).unwrap();
            assert_eq!(parsed.to_string(), v);
        }
    }

    #[test]
    fn test_parse_fields() {
        let v = parse_canonical("1.2.3rc4.post5.dev6").unwrap();
        assert_eq!(v.epoch(), 0);
        assert_eq!(v.release(), &[1, 2, 3]);
        assert_eq!(
            v.pre(),
            Some(PreRelease::new(PreReleaseTag::ReleaseCandidate, 4))
        );
        assert_eq!(v.post(), Some(5));
        assert_eq!(v.dev(), Some(6));
        assert_eq!(v.local(), None);
    }

    #[test]
    fn test_invalid_format() {
        for v in ["", "abc", "1.2.3-", "1..2", "1.0.0+", "1.0.0 beta", "1.0.0~1"] {
            assert!(
                matches!(
                    parse_canonical(v),
                    Err(VersionkitError::InvalidVersionFormat { .. })
                ),
                "'{}' should be rejected as invalid",
                v
            );
        }
    }

    #[test]
    fn test_non_canonical_suggestions() {
        assert_eq!(suggestion("v1.0.0"), "1.0.0");
        assert_eq!(suggestion("1.0.0-rc1"), "1.0.0rc1");
        assert_eq!(suggestion("1.0.0.rc.1"), "1.0.0rc1");
        assert_eq!(suggestion("1.0.0alpha1"), "1.0.0a1");
        assert_eq!(suggestion("1.0.0beta"), "1.0.0b0");
        assert_eq!(suggestion("1.0.0c1"), "1.0.0rc1");
        assert_eq!(suggestion("1.0.0preview2"), "1.0.0rc2");
        assert_eq!(suggestion("1.0.0-1"), "1.0.0.post1");
        assert_eq!(suggestion("1.0.0.rev2"), "1.0.0.post2");
        assert_eq!(suggestion("1.0.0post"), "1.0.0.post0");
        assert_eq!(suggestion("1.0.0-dev"), "1.0.0.dev0");
        assert_eq!(suggestion("01.002.3"), "1.2.3");
        assert_eq!(suggestion(" 1.0.0 "), "1.0.0");
        assert_eq!(suggestion("1.0.0RC1"), "1.0.0rc1");
        assert_eq!(suggestion("0!1.0.0"), "1.0.0");
    }

    #[test]
    fn test_suggestions_round_trip() {
        for v in ["V1.0", "1.0-a.3", "1.0_post_4", "1.0.DEV9", "1.0+Build-05"] {
            let canonical = suggestion(v);
            let reparsed = VersionIdentifier::parse(&canonical).unwrap();
            assert_eq!(reparsed.to_string(), canonical);
        }
    }

    #[test]
    fn test_local_segment_rejected() {
        match parse_canonical("1.0.0+build5") {
            Err(VersionkitError::LocalSegmentNotAllowed { local, .. }) => {
                assert_eq!(local, "build5")
            }
            other => panic!("expected LocalSegmentNotAllowed, got {:?}", other),
        }
    }

    #[test]
    fn test_local_segment_non_canonical_reported_first() {
        assert_eq!(suggestion("1.0.0+Build_007"), "1.0.0+build.7");
    }

    #[test]
    fn test_number_overflow_is_invalid_format() {
        assert!(matches!(
            parse_canonical("1.0.99999999999999999999999"),
            Err(VersionkitError::InvalidVersionFormat { .. })
        ));
    }

    #[test]
    fn test_ensure_semver_base_pads() {
        let v = parse_canonical("2").unwrap();
        assert_eq!(ensure_semver_base(&v), SemverBase::new(2, 0, 0));
        let v = parse_canonical("2.5").unwrap();
        assert_eq!(ensure_semver_base(&v), SemverBase::new(2, 5, 0));
    }

    #[test]
    fn test_ensure_semver_base_truncates() {
        let v = parse_canonical("1.2.3.4.5").unwrap();
        assert_eq!(ensure_semver_base(&v), SemverBase::new(1, 2, 3));
    }

    #[test]
    fn test_base_bump() {
        let base = SemverBase::new(1, 2, 3);
        assert_eq!(base.bump(ReleasePart::Major).unwrap(), SemverBase::new(2, 0, 0));
        assert_eq!(base.bump(ReleasePart::Minor).unwrap(), SemverBase::new(1, 3, 0));
        assert_eq!(base.bump(ReleasePart::Patch).unwrap(), SemverBase::new(1, 2, 4));
    }

    #[test]
    fn test_base_bump_at_max_overflows() {
        let cases = [
            (SemverBase::new(u64::MAX, 0, 0), ReleasePart::Major),
            (SemverBase::new(1, u64::MAX, 0), ReleasePart::Minor),
            (SemverBase::new(1, 2, u64::MAX), ReleasePart::Patch),
        ];
        for (base, part) in cases {
            match base.bump(part) {
                Err(VersionkitError::NumberOverflow { version, part: name }) => {
                    assert_eq!(version, base.to_string());
                    assert_eq!(name, part.as_str());
                }
                other => panic!("expected NumberOverflow for {:?}, got {:?}", part, other),
            }
        }
        // Lower parts may sit at the maximum; they are reset, not incremented
        assert_eq!(
            SemverBase::new(1, u64::MAX, u64::MAX)
                .bump(ReleasePart::Major)
                .unwrap(),
            SemverBase::new(2, 0, 0)
        );
    }

    #[test]
    fn test_build_version() {
        let base = SemverBase::new(1, 0, 0);
        assert_eq!(build_version(base, None, None, None).unwrap(), "1.0.0");
        assert_eq!(
            build_version(
                base,
                Some(PreRelease::new(PreReleaseTag::ReleaseCandidate, 1)),
                None,
                Some(2)
            )
            .unwrap(),
            "1.0.0rc1.dev2"
        );
        assert_eq!(
            build_version(base, None, Some(3), None).unwrap(),
            "1.0.0.post3"
        );
    }

    #[test]
    fn test_assemble_keeps_epoch() {
        let v = VersionIdentifier::assemble(2, SemverBase::new(1, 0, 0), None, None, Some(1))
            .unwrap();
        assert_eq!(v.to_string(), "2!1.0.0.dev1");
    }

    // Property-based tests with proptest
    mod property_tests {
        use super::*;
        use proptest::collection::vec;
        use proptest::option;
        use proptest::prelude::*;
        use proptest::sample::select;

        const SEPARATORS: &[&str] = &["", "-", "_", "."];
        const ZERO_PADDING: &[&str] = &["", "0", "00"];
        const WHITESPACE: &[&str] = &["", " ", "\t"];
        const PREFIXES: &[&str] = &["", "v", "V"];
        const PRE_LABELS: &[&str] = &[
            "a", "A", "alpha", "ALPHA", "b", "beta", "Beta", "c", "C", "rc", "RC", "pre",
            "preview",
        ];
        const POST_LABELS: &[&str] = &["post", "POST", "rev", "r", "R"];
        const DEV_LABELS: &[&str] = &["dev", "DEV", "Dev"];

        fn tag() -> impl Strategy<Value = PreReleaseTag> {
            prop_oneof![
                Just(PreReleaseTag::Alpha),
                Just(PreReleaseTag::Beta),
                Just(PreReleaseTag::ReleaseCandidate),
            ]
        }

        type Parts = (u64, Vec<u64>, Option<PreRelease>, Option<u64>, Option<u64>);

        prop_compose! {
            fn canonical_parts()(
                epoch in prop_oneof![Just(0u64), any::<u64>()],
                release in vec(any::<u64>(), 1..5),
                pre in option::of((tag(), any::<u64>())),
                post in option::of(any::<u64>()),
                dev in option::of(any::<u64>()),
            ) -> Parts {
                (epoch, release, pre.map(|(t, n)| PreRelease::new(t, n)), post, dev)
            }
        }

        fn render((epoch, release, pre, post, dev): &Parts) -> String {
            let mut text = String::new();
            if *epoch != 0 {
                text.push_str(&format!("{}!", epoch));
            }
            let release: Vec<String> = release.iter().map(|n| n.to_string()).collect();
            text.push_str(&release.join("."));
            if let Some(pre) = pre {
                text.push_str(&format!("{}{}", pre.tag.as_str(), pre.number));
            }
            if let Some(post) = post {
                text.push_str(&format!(".post{}", post));
            }
            if let Some(dev) = dev {
                text.push_str(&format!(".dev{}", dev));
            }
            text
        }

        /// `<sep><label><sep><number?>` with an optional zero-padded number
        fn labelled(labels: &'static [&'static str]) -> impl Strategy<Value = String> {
            (
                select(SEPARATORS),
                select(labels),
                select(SEPARATORS),
                option::of((select(ZERO_PADDING), 0u32..1000)),
            )
                .prop_map(|(lead, label, mid, number)| match number {
                    Some((zeros, n)) => format!("{}{}{}{}{}", lead, label, mid, zeros, n),
                    None => format!("{}{}", lead, label),
                })
        }

        prop_compose! {
            fn permissive_spelling()(
                pad in select(WHITESPACE),
                prefix in select(PREFIXES),
                release in vec((select(ZERO_PADDING), 0u32..1000), 1..5),
                pre in option::of(labelled(PRE_LABELS)),
                post in option::of(prop_oneof![
                    (0u32..1000).prop_map(|n| format!("-{}", n)),
                    labelled(POST_LABELS),
                ]),
                dev in option::of(labelled(DEV_LABELS)),
            ) -> String {
                let release: Vec<String> = release
                    .iter()
                    .map(|(zeros, n)| format!("{}{}", zeros, n))
                    .collect();
                format!(
                    "{pad}{prefix}{}{}{}{}{pad}",
                    release.join("."),
                    pre.unwrap_or_default(),
                    post.unwrap_or_default(),
                    dev.unwrap_or_default(),
                )
            }
        }

        proptest! {
            #[test]
            fn prop_canonical_text_round_trips(parts in canonical_parts()) {
                let text = render(&parts);
                let parsed = parse_canonical(&text);
                prop_assert!(parsed.is_ok(), "'{}' should be canonical, got {:?}", text, parsed);
                let parsed = parsed.unwrap();

                let (epoch, release, pre, post, dev) = parts;
                prop_assert_eq!(parsed.to_string(), text.as_str());
                prop_assert_eq!(parsed.epoch(), epoch);
                prop_assert_eq!(parsed.release(), release.as_slice());
                prop_assert_eq!(parsed.pre(), pre);
                prop_assert_eq!(parsed.post(), post);
                prop_assert_eq!(parsed.dev(), dev);
            }

            #[test]
            fn prop_suggestion_is_canonical_and_equivalent(text in permissive_spelling()) {
                match parse_canonical(&text) {
                    Ok(parsed) => prop_assert_eq!(parsed.to_string(), text.as_str()),
                    Err(VersionkitError::NonCanonicalForm { canonical, .. }) => {
                        let reparsed = parse_canonical(&canonical);
                        prop_assert!(
                            reparsed.is_ok(),
                            "suggestion '{}' for '{}' should be canonical, got {:?}",
                            canonical,
                            text,
                            reparsed
                        );
                        let reparsed = reparsed.unwrap();
                        prop_assert_eq!(reparsed.to_string(), canonical.as_str());
                        prop_assert_eq!(VersionIdentifier::parse(&text).unwrap(), reparsed);
                    }
                    Err(other) => prop_assert!(false, "'{}' should parse, got {}", text, other),
                }
            }
        }
    }
}
