// crates/asset-ledger-cli/tests/ledger_commands.rs
// ============================================================================
// Module: CLI Ledger Command Tests
// Description: Integration tests for init, invoke, query, and version commands.
// Purpose: Ensure the binary writes payloads to stdout and fails closed on errors.
// Dependencies: asset-ledger-cli binary
// ============================================================================

//! ## Overview
//! Runs the CLI binary against a `SQLite` ledger in a temporary directory and
//! checks stdout payloads, stderr messages, and exit codes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn asset_ledger_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_asset-ledger"))
}

fn write_sqlite_config(root: &Path) -> PathBuf {
    let config_path = root.join("asset-ledger.toml");
    let config = format!(
        "[store]\ntype = \"sqlite\"\npath = {:?}\n\n[audit]\nsink = \"file\"\npath = {:?}\n",
        root.join("ledger.sqlite").to_string_lossy(),
        root.join("audit.log").to_string_lossy(),
    );
    fs::write(&config_path, config).expect("write config");
    config_path
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(asset_ledger_bin())
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("run asset-ledger")
}

fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn cli_post_then_query_round_trip() {
    let root = TempDir::new().unwrap();
    let config = write_sqlite_config(root.path());

    let init = run(&config, &["init"]);
    assert!(init.status.success(), "{}", String::from_utf8_lossy(&init.stderr));

    let posted = run(&config, &["invoke", "postAsset", "42", "WIDGET", "alice"]);
    assert!(posted.status.success(), "{}", String::from_utf8_lossy(&posted.stderr));
    let payload = stdout_line(&posted);
    let record: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(record["Serialno"], "42");
    assert_eq!(record["Owner"], "alice");

    let asset = run(&config, &["query", "getAsset", "42"]);
    assert!(asset.status.success());
    assert_eq!(stdout_line(&asset), payload);

    let history = run(&config, &["query", "getHistory", "2016", "42", "random"]);
    assert_eq!(stdout_line(&history), payload);

    let listing = run(&config, &["query", "listHistory", "2016"]);
    let entries: serde_json::Value = serde_json::from_str(&stdout_line(&listing)).unwrap();
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
    assert_eq!(entries[0]["record"]["Partno"], "WIDGET");
}

#[test]
fn cli_duplicate_post_fails_closed() {
    let root = TempDir::new().unwrap();
    let config = write_sqlite_config(root.path());
    assert!(run(&config, &["init"]).status.success());
    assert!(run(&config, &["invoke", "postAsset", "1", "P", "o"]).status.success());

    let again = run(&config, &["invoke", "postAsset", "1", "Q", "p"]);
    assert!(!again.status.success());
    assert!(again.stdout.is_empty());
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));
}

#[test]
fn cli_reports_missing_asset_and_unknown_function() {
    let root = TempDir::new().unwrap();
    let config = write_sqlite_config(root.path());
    assert!(run(&config, &["init"]).status.success());

    let missing = run(&config, &["query", "getAsset", "404"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("no row with key"));

    let unknown = run(&config, &["query", "deleteAsset", "1"]);
    assert!(!unknown.status.success());
    assert!(
        String::from_utf8_lossy(&unknown.stderr)
            .contains("received unknown function invocation: deleteAsset")
    );
    assert!(
        String::from_utf8_lossy(&unknown.stderr)
            .contains("expected one of: getAsset, getHistory, listHistory")
    );
}

#[test]
fn cli_version_reflects_initialization() {
    let root = TempDir::new().unwrap();
    let config = write_sqlite_config(root.path());

    let before = run(&config, &["version"]);
    assert!(!before.status.success());

    assert!(run(&config, &["init"]).status.success());
    let after = run(&config, &["version"]);
    assert!(after.status.success());
    assert_eq!(stdout_line(&after), "23");
}

#[test]
fn cli_writes_audit_events_to_configured_file() {
    let root = TempDir::new().unwrap();
    let config = write_sqlite_config(root.path());
    assert!(run(&config, &["init"]).status.success());
    assert!(run(&config, &["invoke", "postAsset", "5", "P", "o"]).status.success());

    let log = fs::read_to_string(root.path().join("audit.log")).unwrap();
    let events: Vec<serde_json::Value> =
        log.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert!(events.iter().any(|event| event["event"] == "ledger.initialized"));
    assert!(events.iter().any(|event| event["event"] == "asset.posted"));
}

#[test]
fn cli_config_validate_rejects_invalid_config() {
    let root = TempDir::new().unwrap();
    let config_path = root.path().join("asset-ledger.toml");
    fs::write(&config_path, "[scan]\nmax_rows_per_scan = 0\n").unwrap();

    let output = run(&config_path, &["config", "validate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("max_rows_per_scan"));
}
