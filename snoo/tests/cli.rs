//! CLI integration tests for snoo
//!
//! Everything here fails before a request would leave the process, so no
//! network access is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to escape path for TOML on Windows
fn escape_path_for_toml(path: &str) -> String {
    path.replace('\\', "\\\\")
}

/// Write a config pointing the session file into the temp dir
fn setup_test_env() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let session_path = temp_dir.path().join("data").join("session.json");

    let config_content = format!(
        r#"
base_url = "http://127.0.0.1:9"
session_file = "{}"
"#,
        escape_path_for_toml(&session_path.to_string_lossy())
    );
    fs::write(&config_path, config_content).unwrap();

    (temp_dir, config_path, session_path)
}

fn snoo(config_path: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("snoo").unwrap();
    cmd.arg("--config").arg(config_path);
    cmd.env_remove("SNOO_CONFIG");
    cmd
}

#[test]
fn test_help_flag_output() {
    Command::cargo_bin("snoo")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXAMPLES"))
        .stdout(predicate::str::contains("EXIT CODES"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_whoami_without_session_needs_login() {
    let (_temp_dir, config_path, session_path) = setup_test_env();

    snoo(&config_path)
        .arg("whoami")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Authentication required"));

    assert!(!session_path.exists());
}

#[test]
fn test_unknown_operation_is_invalid_input() {
    let (_temp_dir, config_path, _) = setup_test_env();

    snoo(&config_path)
        .args(["raw", "frobnicate"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown operation: frobnicate"));
}

#[test]
fn test_raw_refuses_write_operations() {
    let (_temp_dir, config_path, _) = setup_test_env();

    snoo(&config_path)
        .args(["raw", "vote"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("raw only runs read operations"));
}

#[test]
fn test_raw_checks_path_arguments() {
    let (_temp_dir, config_path, _) = setup_test_env();

    snoo(&config_path)
        .args(["raw", "user"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("expects 1 argument(s), got 0"));
}

#[test]
fn test_links_rejects_unknown_sort() {
    let (_temp_dir, config_path, _) = setup_test_env();

    snoo(&config_path)
        .args(["links", "rust", "--sort", "bogus"])
        .assert()
        .code(3);
}

#[test]
fn test_corrupt_session_file_is_reported() {
    let (_temp_dir, config_path, session_path) = setup_test_env();
    fs::create_dir_all(session_path.parent().unwrap()).unwrap();
    fs::write(&session_path, "not json").unwrap();

    snoo(&config_path)
        .arg("whoami")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Session file is corrupt"));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "base_url = [").unwrap();

    snoo(&config_path)
        .arg("whoami")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}
