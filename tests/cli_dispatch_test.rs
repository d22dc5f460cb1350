// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

/// The binary with an empty home directory, so no config file or log from
/// the developer's machine is picked up.
fn main_command() -> (Command, TempDir) {
    let home = tempdir().unwrap();
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("HOME", home.path())
        .env("USERPROFILE", home.path())
        .env_remove("OP_DIR")
        .env_remove("TMP_DIR")
        .env_remove("FL_MIN_DELAY")
        .env_remove("FL_MAX_DELAY")
        .env_remove("FL_VERBOSE")
        .env_remove("FL_PAUSE")
        .env_remove("FL_DEBUG");
    (cmd, home)
}

#[test]
fn test_help_flag() {
    let (mut cmd, _home) = main_command();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Course run number"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_no_arguments_shows_usage() {
    let (mut cmd, _home) = main_command();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_run_is_rejected() {
    let (mut cmd, _home) = main_command();
    cmd.args(["me@example.com", "pw", "intro-to-data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<RUN>"));
}

#[test]
fn test_week_zero_is_rejected() {
    let (mut cmd, _home) = main_command();
    cmd.args(["me@example.com", "pw", "intro-to-data", "2", "0"])
        .assert()
        .failure();
}

#[test]
fn test_inverted_delays_are_rejected() {
    let (mut cmd, _home) = main_command();
    cmd.args(["me@example.com", "pw", "intro-to-data", "2"])
        .args(["--min-delay", "30", "--max-delay", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--min-delay (30) must not exceed --max-delay (5)"));
}

/// Points the site at a closed local port through the config file.
fn with_unreachable_site(home: &TempDir) {
    let config_dir = home.path().join(".futurelearn-dl");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.json"),
        r#"{ "site": { "base_url": "http://127.0.0.1:9" } }"#,
    )
    .unwrap();
}

#[test]
fn test_unreachable_site_fails_cleanly() {
    let (mut cmd, home) = main_command();
    with_unreachable_site(&home);
    let work = tempdir().unwrap();

    cmd.args(["me@example.com", "pw", "intro-to-data", "2"])
        .arg("--output")
        .arg(work.path())
        .arg("--temp-dir")
        .arg(work.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("network"));
}

#[test]
fn test_numeric_verbose_level_from_env() {
    let (mut cmd, home) = main_command();
    with_unreachable_site(&home);
    let work = tempdir().unwrap();

    // gets past argument parsing and fails on the network instead
    cmd.env("FL_VERBOSE", "3")
        .env("FL_DEBUG", "0")
        .args(["me@example.com", "pw", "intro-to-data", "2"])
        .arg("--output")
        .arg(work.path())
        .arg("--temp-dir")
        .arg(work.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid value").not())
        .stderr(predicate::str::contains("network"));
}
