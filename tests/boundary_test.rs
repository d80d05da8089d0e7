use gowork_release::boundary::BoundaryWarning;
use gowork_release::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_no_previous_release_display() {
    let warning = BoundaryWarning::NoPreviousRelease {
        version: "v0.1.0".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No previous release tag"),
        "Message should mention the missing tag, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("v0.1.0"),
        "Message should contain version 'v0.1.0', got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_no_new_commits_display() {
    let warning = BoundaryWarning::NoNewCommits {
        previous_tag: "v1.0.0".to_string(),
    };

    assert_eq!(warning.to_string(), "No new commits since tag 'v1.0.0'");
}

#[test]
fn test_boundary_warning_no_modules_display() {
    let warning = BoundaryWarning::NoModulesDiscovered {
        manifest: "go.work".to_string(),
        filter: "extra/".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("extra/") && display_msg.contains("go.work"),
        "Message should name the filter and manifest, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("only the root module"),
        "Message should say what will still be tagged, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_fetch_failed_display() {
    let warning = BoundaryWarning::FetchFailed {
        remote: "origin".to_string(),
        reason: "authentication failed".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("origin"),
        "Message should contain remote 'origin', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("authentication failed"),
        "Message should contain the reason, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_tests_skipped_display() {
    let warning = BoundaryWarning::TestsSkipped {
        reason: "--skip-tests given".to_string(),
    };

    assert_eq!(warning.to_string(), "Test stage skipped: --skip-tests given");
}

// ============================================================================
// UI Display Tests
// ============================================================================

#[test]
fn test_display_boundary_warning_all_variants() {
    // Output goes to stderr; this checks every variant renders without panicking
    let warnings = vec![
        BoundaryWarning::NoPreviousRelease {
            version: "v0.1.0".to_string(),
        },
        BoundaryWarning::NoNewCommits {
            previous_tag: "v1.0.0".to_string(),
        },
        BoundaryWarning::NoModulesDiscovered {
            manifest: "go.work".to_string(),
            filter: "extra/".to_string(),
        },
        BoundaryWarning::FetchFailed {
            remote: "origin".to_string(),
            reason: "timeout".to_string(),
        },
        BoundaryWarning::TestsSkipped {
            reason: "no test command configured".to_string(),
        },
    ];

    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
}

#[test]
fn test_boundary_warning_equality() {
    let a = BoundaryWarning::NoNewCommits {
        previous_tag: "v1.0.0".to_string(),
    };
    let b = a.clone();
    let c = BoundaryWarning::NoNewCommits {
        previous_tag: "v1.0.1".to_string(),
    };

    assert_eq!(a, b);
    assert_ne!(a, c);
}
