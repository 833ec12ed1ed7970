//! Integration tests for the `huelink` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling -- all without a live bridge (the only network
//! touched is a closed localhost port).
#![allow(clippy::unwrap_used)]

use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a `Command` for the `huelink` binary with env isolation.
///
/// Clears all `HUE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn huelink_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("huelink").unwrap();
    cmd.env("HOME", "/tmp/huelink-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/huelink-cli-test-nonexistent")
        .env_remove("HUE_PROFILE")
        .env_remove("HUE_BRIDGE")
        .env_remove("HUE_CREDENTIAL")
        .env_remove("HUE_OUTPUT")
        .env_remove("HUE_NON_INTERACTIVE")
        .env_remove("HUE_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = huelink_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    huelink_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("lighting bridge")
            .and(predicate::str::contains("discover"))
            .and(predicate::str::contains("pair"))
            .and(predicate::str::contains("lights")),
    );
}

#[test]
fn test_version_flag() {
    huelink_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("huelink"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    huelink_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    huelink_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path() {
    huelink_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    huelink_cmd().args(["config", "show"]).assert().success();
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = huelink_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_unreachable_bridge_exits_with_connection_code() {
    // Port 9 (discard) is closed on any sane machine; the probe fails
    // without ever leaving localhost.
    let output = huelink_cmd()
        .args([
            "--bridge",
            "127.0.0.1:9",
            "--non-interactive",
            "lights",
            "list",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7), "Expected exit code 7");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("bridge") || stderr.contains("Bridge"),
        "Expected bridge error in stderr:\n{stderr}"
    );
}

#[test]
fn test_brightness_out_of_type_range_is_usage_error() {
    // bri is a u8; clap rejects 300 before any network access.
    let output = huelink_cmd()
        .args(["light", "1", "bri", "300"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
}

#[test]
fn test_invalid_output_format() {
    let output = huelink_cmd()
        .args(["--output", "invalid", "lights", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected clap error for bad output format:\n{text}"
    );
}
