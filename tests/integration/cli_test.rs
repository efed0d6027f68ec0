//! Integration tests for the command line (help, link, play)

use predicates::prelude::*;

use crate::helpers::Sandbox;

const INVALID: &str = "Invalid Youtube URL or Video ID";

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let (stdout, _stderr, exit_code) = Sandbox::new().run(&["--help"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("Loop a section of a YouTube video"));
    for sub in ["play", "link", "config", "completions"] {
        assert!(stdout.contains(sub), "missing {sub}");
    }
}

#[test]
fn play_help_explains_input() {
    let (stdout, _stderr, exit_code) = Sandbox::new().run(&["play", "--help"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("--start <TIME>"));
    assert!(stdout.contains("--backend"));
    assert!(stdout.contains("simulated"));
}

#[test]
fn version_includes_package_version() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Link Command Tests
// ============================================================================

#[test]
fn link_from_video_id() {
    Sandbox::new()
        .cmd()
        .args(["link", "dQw4w9WgXcQ", "--start", "43", "--end", "0:51.5"])
        .assert()
        .success()
        .stdout("?videoId=dQw4w9WgXcQ&start=43&end=51.5\n");
}

#[test]
fn link_from_watch_url_without_bounds() {
    let (stdout, _stderr, exit_code) =
        Sandbox::new().run(&["link", "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim(), "?videoId=dQw4w9WgXcQ");
}

#[test]
fn link_from_watch_url_keeps_its_bounds() {
    let (stdout, stderr, exit_code) = Sandbox::new().run(&[
        "link",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ&start=30",
    ]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert_eq!(stdout.trim(), "?videoId=dQw4w9WgXcQ&start=30");
}

#[test]
fn link_keeps_fractional_bounds_exact() {
    let (stdout, _stderr, exit_code) = Sandbox::new().run(&[
        "link",
        "https://youtu.be/dQw4w9WgXcQ",
        "--start",
        "12.345",
        "--end",
        "62.7501",
    ]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim(), "?videoId=dQw4w9WgXcQ&start=12.345&end=62.7501");
}

#[test]
fn link_overrides_bounds_of_a_loop_link() {
    let (stdout, _stderr, exit_code) = Sandbox::new().run(&[
        "link",
        "?videoId=dQw4w9WgXcQ&start=10&end=20",
        "--end",
        "30",
    ]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim(), "?videoId=dQw4w9WgXcQ&start=10&end=30");
}

#[test]
fn link_uses_base_url_from_config() {
    let sandbox = Sandbox::with_config("[link]\nbase_url = \"https://loop.example/\"\n");
    let (stdout, _stderr, exit_code) = sandbox.run(&["link", "youtu.be/dQw4w9WgXcQ"]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim(), "https://loop.example/?videoId=dQw4w9WgXcQ");
}

#[test]
fn link_base_flag_wins_over_config() {
    let sandbox = Sandbox::with_config("[link]\nbase_url = \"https://loop.example/\"\n");
    let (stdout, _stderr, _) = sandbox.run(&[
        "link",
        "dQw4w9WgXcQ",
        "--base",
        "https://other.example/loop",
    ]);

    assert_eq!(stdout.trim(), "https://other.example/loop?videoId=dQw4w9WgXcQ");
}

#[test]
fn link_rejects_invalid_input() {
    Sandbox::new()
        .cmd()
        .args(["link", "https://vimeo.com/12345"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(INVALID));
}

#[test]
fn link_rejects_link_without_video() {
    let (_stdout, stderr, exit_code) = Sandbox::new().run(&["link", "?start=5&end=9"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains(INVALID));
}

#[test]
fn link_rejects_bad_time() {
    let (_stdout, stderr, exit_code) =
        Sandbox::new().run(&["link", "dQw4w9WgXcQ", "--start", "1:99"]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("Invalid time '1:99'"));
}

// ============================================================================
// Play Command Tests
// ============================================================================

#[test]
fn play_rejects_invalid_input_before_opening_terminal() {
    let (_stdout, stderr, exit_code) = Sandbox::new().run(&["play", "definitely not"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains(INVALID));
}

#[test]
fn play_requires_a_terminal() {
    let (_stdout, stderr, exit_code) =
        Sandbox::new().run(&["play", "dQw4w9WgXcQ", "--backend", "simulated"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("interactive terminal"));
}

#[test]
fn play_reports_broken_config() {
    let sandbox = Sandbox::with_config("[playback\n");
    let (_stdout, stderr, exit_code) = sandbox.run(&["play"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Failed to parse config file"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn completions_for_bash() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_ytloop"));
}
