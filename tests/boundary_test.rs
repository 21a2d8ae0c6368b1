use versionkit::boundary::BoundaryWarning;
use versionkit::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_changelog_not_found_display() {
    let warning = BoundaryWarning::ChangelogNotFound {
        path: "/repo/CHANGELOG.md".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("/repo/CHANGELOG.md"),
        "Message should contain the changelog path, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("skipping changelog update"),
        "Message should say the update is skipped, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_no_existing_version_display() {
    let warning = BoundaryWarning::NoExistingVersion {
        searched: "pyproject.toml, setup.cfg, version.txt".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No existing version"),
        "Message should contain 'No existing version', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("pyproject.toml, setup.cfg, version.txt"),
        "Message should list searched sources, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_version_unchanged_display() {
    let warning = BoundaryWarning::VersionUnchanged {
        version: "1.2.3".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("'1.2.3'"),
        "Message should quote the version, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("nothing to change"),
        "Message should contain 'nothing to change', got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warnings_compare_by_value() {
    let a = BoundaryWarning::VersionUnchanged {
        version: "1.0.0".to_string(),
    };
    let b = BoundaryWarning::VersionUnchanged {
        version: "1.0.0".to_string(),
    };
    let c = BoundaryWarning::VersionUnchanged {
        version: "1.0.1".to_string(),
    };
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// ============================================================================
// UI Display Tests
// ============================================================================

#[test]
fn test_display_boundary_warning_does_not_panic() {
    // Output goes to stderr; this only checks every variant renders
    for warning in [
        BoundaryWarning::ChangelogNotFound {
            path: "CHANGELOG.md".to_string(),
        },
        BoundaryWarning::NoExistingVersion {
            searched: "version.txt".to_string(),
        },
        BoundaryWarning::VersionUnchanged {
            version: "2.0.0".to_string(),
        },
    ] {
        ui::display_boundary_warning(&warning);
    }
}
