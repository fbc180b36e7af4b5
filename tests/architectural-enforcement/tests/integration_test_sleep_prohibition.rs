//! Integration Test: Sleep Prohibition
//!
//! **Policy**: The engine core MUST NOT call sleep methods. Every delay in the
//! core (typing cadence, breath steps, colour start) is a job on the
//! scheduler, driven by the render clock.
//!
//! **Exceptions**: Frame rate limiting in the TUI event loop, test code.

use std::fs;
use std::path::Path;

use architectural_enforcement::rust_sources;

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code!\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nAcceptable sleep uses:");
        eprintln!("  - Frame rate limiting in the TUI event loop");
        eprintln!("  - Test code (#[test] or #[tokio::test] functions)");
        eprintln!("\nIn the core, schedule a job on the Scheduler instead.");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    check_sources(
        "tui/src",
        &mut violations,
        &SleepPolicy {
            allow_frame_limiting: true,
            allow_tests: true,
        },
    );

    check_sources(
        "conductor/core/src",
        &mut violations,
        &SleepPolicy {
            allow_frame_limiting: false,
            allow_tests: true,
        },
    );

    violations
}

struct SleepPolicy {
    allow_frame_limiting: bool,
    allow_tests: bool,
}

fn check_sources(dir: &str, violations: &mut Vec<String>, policy: &SleepPolicy) {
    for path in rust_sources(dir) {
        check_file(&path, violations, policy);
    }
}

fn check_file(path: &Path, violations: &mut Vec<String>, policy: &SleepPolicy) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let lines: Vec<&str> = content.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let code_part = line.split("//").next().unwrap_or(line);
        if !(code_part.contains("::sleep(") || code_part.contains(".sleep(")) {
            continue;
        }

        if policy.allow_tests && is_in_test_function(&lines, idx) {
            continue;
        }

        if policy.allow_frame_limiting
            && path.ends_with("tui/src/app.rs")
            && is_frame_limiting_context(&lines, idx)
        {
            continue;
        }

        violations.push(format!(
            "{}:{} - {}",
            path.display(),
            idx + 1,
            line.trim()
        ));
    }
}

/// Check if line is inside a test function
fn is_in_test_function(lines: &[&str], current_idx: usize) -> bool {
    for i in (0..current_idx).rev() {
        let line = lines[i].trim();

        if line.starts_with("#[test]") || line.starts_with("#[tokio::test") {
            return true;
        }
        if line.starts_with("fn ") || line.starts_with("pub fn ") {
            // The attribute sits directly above the function
            let attr = i.checked_sub(1).map(|j| lines[j].trim());
            return attr.is_some_and(|a| a.starts_with("#[test]") || a.starts_with("#[tokio::test"));
        }
        if line.starts_with("mod ") || line.starts_with("impl ") {
            return false;
        }
    }
    false
}

/// Check if sleep is used for frame rate limiting (acceptable in TUI)
fn is_frame_limiting_context(lines: &[&str], current_idx: usize) -> bool {
    let context = current_idx.saturating_sub(10)..(current_idx + 5).min(lines.len());
    lines[context].iter().any(|line| {
        let line = line.to_lowercase();
        line.contains("frame") || line.contains("fps") || line.contains("tick_rate")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_outside_test_is_detected() {
        let code = [
            "fn bad_function() {",
            "    tokio::time::sleep(Duration::from_millis(10)).await;",
            "}",
        ];
        assert!(!is_in_test_function(&code, 1));
    }

    #[test]
    fn test_sleep_inside_test_is_allowed() {
        let code = [
            "#[tokio::test]",
            "async fn waits() {",
            "    tokio::time::sleep(Duration::from_millis(10)).await;",
            "}",
        ];
        assert!(is_in_test_function(&code, 2));
    }

    #[test]
    fn test_frame_limiting_detection() {
        let code = [
            "loop {",
            "    tokio::select! {",
            "        // Frame tick",
            "        _ = tokio::time::sleep(FRAME_INTERVAL) => {}",
            "    }",
            "}",
        ];
        assert!(is_frame_limiting_context(&code, 3));
    }
}
