//! Integration tests for the delta-offline binary.
//!
//! Config and cache directories are redirected into a temp dir so runs never
//! touch the real user profile. None of these tests need the network.

use std::path::Path;
use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_delta-offline"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env("DELTA_OFFLINE_ORIGIN", "http://127.0.0.1:9/")
        .env_remove("DELTA_OFFLINE_CACHE_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute delta-offline")
}

#[test]
fn test_help_flag_exits_successfully() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = run_cli(home.path(), &["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("install"), "Help should list install");
    assert!(stdout.contains("activate"), "Help should list activate");
}

#[test]
fn test_status_on_fresh_cache_dir() {
    let home = tempfile::tempdir().expect("tempdir");
    let cache_dir = home.path().join("worker");
    let output = run_cli(
        home.path(),
        &["status", "--cache-dir", cache_dir.to_str().expect("utf-8 path")],
    );
    assert!(output.status.success(), "status failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("delta-lighting-v1"));
    assert!(stdout.contains("uninstalled"));
    assert!(stdout.contains("Precached:  0/11"));
    assert!(
        !cache_dir.join("registration.json").exists(),
        "status must not record a registration"
    );
}

fn write_registration(cache_dir: &Path, cache_name: &str, state: &str) -> String {
    std::fs::create_dir_all(cache_dir).expect("create cache dir");
    let contents = format!(
        r#"{{"cache_name": "{}", "state": "{}", "updated_at": "2026-01-01T00:00:00Z"}}"#,
        cache_name, state
    );
    std::fs::write(cache_dir.join("registration.json"), &contents).expect("write registration");
    contents
}

#[test]
fn test_status_for_other_generation_keeps_registration() {
    let home = tempfile::tempdir().expect("tempdir");
    let cache_dir = home.path().join("worker");
    let recorded = write_registration(&cache_dir, "delta-lighting-v1", "active");

    let output = run_cli(
        home.path(),
        &[
            "status",
            "--cache-name",
            "delta-lighting-v2",
            "--cache-dir",
            cache_dir.to_str().expect("utf-8 path"),
        ],
    );
    assert!(output.status.success(), "status failed: {:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("uninstalled"));

    let after = std::fs::read_to_string(cache_dir.join("registration.json"))
        .expect("registration still present");
    assert_eq!(after, recorded);
}

#[test]
fn test_offline_fetch_with_empty_cache_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    let cache_dir = home.path().join("worker");
    let output = run_cli(
        home.path(),
        &["fetch", "/", "--offline", "--cache-dir", cache_dir.to_str().expect("utf-8 path")],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("offline mode"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_reset_forgets_registration() {
    let home = tempfile::tempdir().expect("tempdir");
    let cache_dir = home.path().join("worker");
    write_registration(&cache_dir, "delta-lighting-v1", "installed");

    let output = run_cli(
        home.path(),
        &["reset", "--cache-dir", cache_dir.to_str().expect("utf-8 path")],
    );
    assert!(output.status.success(), "reset failed: {:?}", output);
    assert!(!cache_dir.join("registration.json").exists());
}

#[test]
fn test_activate_before_install_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    let cache_dir = home.path().join("worker");
    let output = run_cli(
        home.path(),
        &["activate", "--cache-dir", cache_dir.to_str().expect("utf-8 path")],
    );
    assert!(!output.status.success(), "activate must fail before install");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot activate"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_sync_with_unknown_tag_is_ignored() {
    let home = tempfile::tempdir().expect("tempdir");
    let cache_dir = home.path().join("worker");
    let output = run_cli(
        home.path(),
        &["sync", "other-tag", "--cache-dir", cache_dir.to_str().expect("utf-8 path")],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\"ignored\""));
}

#[test]
fn test_prefs_lang_rejects_unknown_code() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = run_cli(home.path(), &["prefs", "lang", "fr"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid language"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_prefs_theme_toggle_persists() {
    let home = tempfile::tempdir().expect("tempdir");

    let output = run_cli(home.path(), &["prefs", "theme", "--system-dark"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"light\""), "dark system toggles to light: {}", stdout);

    let output = run_cli(home.path(), &["prefs", "show", "--system-dark"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"light\""));
    assert!(stdout.contains("\"saved\""));
    assert!(stdout.contains("\"rtl\""));
}
