//! Integration tests for the config subcommands

use crate::helpers::Sandbox;

#[test]
fn show_prints_defaults_without_a_file() {
    let sandbox = Sandbox::new();
    let (stdout, _stderr, exit_code) = sandbox.run(&["config", "show"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[playback]"));
    assert!(stdout.contains("default_video = \"dQw4w9WgXcQ\""));
    assert!(stdout.contains("loop_interval_ms = 16"));
    assert!(!sandbox.config_path().exists());
}

#[test]
fn show_merges_file_with_defaults() {
    let sandbox = Sandbox::with_config("[playback]\nseek_step_secs = 2.5\n");
    let (stdout, _stderr, exit_code) = sandbox.run(&["config", "show"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("seek_step_secs = 2.5"));
    assert!(stdout.contains("backend = \"mpv\""));
}

#[test]
fn migrate_without_terminal_changes_nothing() {
    let content = "# keep me\n[playback]\nrepeat = false\n";
    let sandbox = Sandbox::with_config(content);
    let (stdout, _stderr, exit_code) = sandbox.run(&["config", "migrate"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("missing field(s)"));
    assert!(stdout.contains("+ default_video"));
    assert!(stdout.contains("No changes made."));
    assert_eq!(
        std::fs::read_to_string(sandbox.config_path()).unwrap(),
        content
    );
}

#[test]
fn migrate_complete_config_is_up_to_date() {
    let sandbox = Sandbox::new();
    let full = toml::to_string_pretty(&ytloop::Config::default()).unwrap();
    std::fs::write(sandbox.config_path(), full).unwrap();

    let (stdout, _stderr, exit_code) = sandbox.run(&["config", "migrate"]);
    assert_eq!(exit_code, 0);
    assert!(stdout.contains("already up to date"));
}

#[test]
fn config_commands_do_not_create_log_files() {
    let sandbox = Sandbox::new();
    sandbox.run(&["config", "show"]);
    assert!(!sandbox.path().join("state").exists());
}
