//! E2E CLI tests for `helpdesk logs` and the global error surface.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const MESSAGES: [&str; 7] = [
    "User logged in",
    "API request failed: 500",
    "Database backup started",
    "New ticket created",
    "Payment processed",
    "Cache cleared",
    "User updated profile",
];

fn helpdesk_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("helpdesk"));
    cmd.current_dir(home);
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join(".config"));
    cmd.env("XDG_CACHE_HOME", home.join(".cache"));
    cmd.env_remove("HELPDESK_CONFIG");
    cmd.env_remove("FORMAT");
    cmd.env("HELPDESK_LOG", "error");
    cmd
}

/// `[h:mm:ss AM] message` with a message from the fixed set.
fn assert_well_formed(entry: &str) {
    let (stamp, message) = entry
        .strip_prefix('[')
        .and_then(|rest| rest.split_once("] "))
        .unwrap_or_else(|| panic!("malformed entry: {entry}"));
    assert!(
        stamp.ends_with(" AM") || stamp.ends_with(" PM"),
        "bad timestamp in {entry}"
    );
    assert_eq!(stamp.matches(':').count(), 2, "bad timestamp in {entry}");
    assert!(MESSAGES.contains(&message), "unexpected message in {entry}");
}

fn logs_json(home: &Path, args: &[&str]) -> Vec<String> {
    let output = helpdesk_cmd(home)
        .arg("logs")
        .args(args)
        .arg("--json")
        .output()
        .expect("logs should not crash");
    assert!(
        output.status.success(),
        "logs failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    json["entries"]
        .as_array()
        .expect("entries array")
        .iter()
        .map(|entry| entry.as_str().expect("string entry").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Live logs
// ---------------------------------------------------------------------------

#[test]
fn prints_requested_number_of_entries() {
    let home = TempDir::new().unwrap();
    let entries = logs_json(home.path(), &["--count", "3", "--interval-ms", "10"]);
    assert_eq!(entries.len(), 3);
    for entry in &entries {
        assert_well_formed(entry);
    }
}

#[test]
fn seeded_streams_pick_the_same_messages() {
    let home = TempDir::new().unwrap();
    let args = ["--count", "5", "--interval-ms", "5", "--seed", "42"];
    let strip = |entries: Vec<String>| -> Vec<String> {
        entries
            .into_iter()
            .map(|entry| entry.split_once("] ").map(|(_, m)| m.to_string()).unwrap())
            .collect()
    };
    let first = strip(logs_json(home.path(), &args));
    let second = strip(logs_json(home.path(), &args));
    assert_eq!(first, second);
}

#[test]
fn text_mode_streams_one_entry_per_line() {
    let home = TempDir::new().unwrap();
    let output = helpdesk_cmd(home.path())
        .args(["logs", "-n", "2", "--interval-ms", "10"])
        .env("FORMAT", "text")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert_well_formed(line);
    }
}

#[test]
fn config_interval_is_validated() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("helpdesk.toml");
    std::fs::write(&config, "[logs]\ninterval_ms = 0\n").unwrap();

    helpdesk_cmd(home.path())
        .args(["logs", "--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("logs.interval_ms"))
        .stderr(predicate::str::contains("suggestion:"));
}

#[test]
fn helpdesk_config_env_is_honoured() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("env.toml");
    std::fs::write(&config, "[logs\n").unwrap();

    helpdesk_cmd(home.path())
        .args(["logs", "--count", "1"])
        .env("HELPDESK_CONFIG", &config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

// ---------------------------------------------------------------------------
// Console routing and completions
// ---------------------------------------------------------------------------

#[test]
fn unknown_route_fails_before_touching_the_terminal() {
    let home = TempDir::new().unwrap();
    helpdesk_cmd(home.path())
        .args(["ui", "--route", "/admin", "--json"])
        .env("HELPDESK_LOG_FILE", home.path().join("helpdesk.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3001"))
        .stderr(predicate::str::contains("/admin"));
}

#[test]
fn completions_name_the_binary() {
    let home = TempDir::new().unwrap();
    helpdesk_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("helpdesk"));
}
