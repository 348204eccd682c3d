//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. They use the
//! development config directory so a user's own settings are left alone.

use std::io::Write;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "ringtimer-cli", "--"])
        .args(args)
        .env("RINGTIMER_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command with `input` written to its stdin, which is then closed.
fn run_cli_with_input(args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "ringtimer-cli", "--"])
        .args(args)
        .env("RINGTIMER_ENV", "dev")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI command");

    {
        let mut stdin = child.stdin.take().expect("stdin is piped");
        stdin
            .write_all(input.as_bytes())
            .expect("Failed to write CLI input");
    }

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Event `type` tags from JSON-lines output.
fn event_types(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .filter_map(|v| v["type"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_phases_json_with_explicit_flags() {
    let (stdout, stderr, code) = run_cli(&[
        "phases", "--prep", "10", "--work", "30", "--rest", "20", "--rounds", "3", "--json",
    ]);
    assert_eq!(code, 0, "phases failed: {stderr}");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let phases = parsed.as_array().expect("array of phases");
    assert_eq!(phases.len(), 7);
    assert_eq!(phases[0]["kind"], "prep");
    assert_eq!(phases[1]["label"], "Work • Round 1/3");
    assert_eq!(phases[6]["duration_secs"], 20);
}

#[test]
fn test_phases_skip_zero_prep_and_rest() {
    let (stdout, stderr, code) = run_cli(&[
        "phases", "--prep", "0", "--work", "1:00", "--rest", "0", "--rounds", "2", "--json",
    ]);
    assert_eq!(code, 0, "phases failed: {stderr}");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let phases = parsed.as_array().expect("array of phases");
    assert_eq!(phases.len(), 2);
    assert!(phases.iter().all(|p| p["kind"] == "work" && p["duration_secs"] == 60));
}

#[test]
fn test_phases_reject_zero_work() {
    let (_, stderr, code) = run_cli(&["phases", "--work", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_run_rejects_zero_duration() {
    let (_, stderr, code) = run_cli(&["run", "0:00"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_run_short_timer_json_events() {
    let (stdout, stderr, code) = run_cli(&["run", "1", "--json"]);
    assert_eq!(code, 0, "run failed: {stderr}");
    assert_eq!(event_types(&stdout), vec!["TimerStarted", "TimerFinished"]);
}

#[test]
fn test_run_paused_then_input_closed_exits() {
    let (stdout, stderr, code) = run_cli_with_input(&["run", "30", "--json"], "p\n");
    assert_eq!(code, 0, "run failed: {stderr}");
    assert_eq!(
        event_types(&stdout),
        vec!["TimerStarted", "TimerPaused", "TimerStopped"]
    );
}

#[test]
fn test_gym_single_round_json_events() {
    let (stdout, stderr, code) = run_cli(&[
        "gym", "--prep", "0", "--work", "1", "--rest", "0", "--rounds", "1", "--json",
    ]);
    assert_eq!(code, 0, "gym failed: {stderr}");
    assert_eq!(
        event_types(&stdout),
        vec!["PhaseStarted", "TimerStarted", "TimerFinished", "SequenceFinished"]
    );

    let phase: serde_json::Value = stdout
        .lines()
        .find_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .expect("at least one event");
    assert_eq!(phase["kind"], "work");
    assert_eq!(phase["label"], "Work • Round 1/1");
}

#[test]
fn test_gym_rejects_zero_work() {
    let (_, stderr, code) = run_cli(&["gym", "--work", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_known_key() {
    let (stdout, stderr, code) = run_cli(&["config", "get", "picker.settle_quiet_ms"]);
    assert_eq!(code, 0, "config get failed: {stderr}");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_config_get_unknown_key() {
    let (_, stderr, code) = run_cli(&["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_list_is_json() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(parsed.get("gym").is_some());
}

#[test]
fn test_config_path() {
    let (stdout, _, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
}
