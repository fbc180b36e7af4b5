//! Integration Test: Headless Core
//!
//! **Policy**: `conductor/core` knows nothing about terminals. It must not
//! depend on or import ratatui or crossterm; surfaces consume its
//! `FrameBuffer` and `TurnView`s instead.

use std::fs;

use architectural_enforcement::{rust_sources, workspace_root};

const UI_CRATES: [&str; 2] = ["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest should be readable");

    for krate in UI_CRATES {
        assert!(
            !manifest
                .lines()
                .any(|l| l.trim_start().starts_with(krate)),
            "conductor/core/Cargo.toml depends on {krate}"
        );
    }
}

#[test]
fn test_core_sources_do_not_import_ui_crates() {
    let mut violations = Vec::new();

    for path in rust_sources("conductor/core/src") {
        let content = fs::read_to_string(&path).unwrap_or_default();
        for (idx, line) in content.lines().enumerate() {
            let code = line.split("//").next().unwrap_or(line);
            if UI_CRATES.iter().any(|k| code.contains(&format!("{k}::"))) {
                violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI imports in the core:\n{}",
        violations.join("\n")
    );
}
