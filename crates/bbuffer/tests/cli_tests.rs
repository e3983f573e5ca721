use std::io::Write;
use std::process::{Command, Output};

fn bbuffer(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bbuffer"))
        .args(args)
        .output()
        .expect("failed to launch bbuffer")
}

// =============================================================================
// Empty sources print nothing
// =============================================================================

#[test]
fn test_zero_random_items_prints_nothing() {
    let out = bbuffer(&["random", "4", "0"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty(), "{}", String::from_utf8_lossy(&out.stdout));
}

#[test]
fn test_missing_file_prints_nothing() {
    for mode in ["file", "count"] {
        let out = bbuffer(&[mode, "4", "/nonexistent/bbuffer/input.txt"]);
        assert!(out.status.success(), "{mode}");
        assert!(out.stdout.is_empty(), "{mode}");
    }
}

// =============================================================================
// Non-empty sources print their reduction
// =============================================================================

#[test]
fn test_file_min_max_is_printed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "10 20 30").unwrap();
    let out = bbuffer(&["file", "4", file.path().to_str().unwrap()]);

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Min: 10"), "{stdout}");
    assert!(stdout.contains("Max: 30"), "{stdout}");
}

#[test]
fn test_empty_file_counts_zero_bytes() {
    // An existing file is only found empty by the first read, so the run
    // goes ahead and closes on a placeholder.
    let file = tempfile::NamedTempFile::new().unwrap();
    let out = bbuffer(&["count", "4", file.path().to_str().unwrap(), "--buffer", "spin"]);

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Count: 0"), "{stdout}");
}

#[test]
fn test_invalid_capacity_fails() {
    let out = bbuffer(&["random", "1", "10"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}
