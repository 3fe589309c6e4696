//! CLI integration tests for the Taliesin command-line interface.
//!
//! These tests verify:
//! - Help text and argument parsing
//! - The tools and config listings
//! - A full session round trip over stdin/stdout against a temporary
//!   memory database (no network required)

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the taliesin binary.
fn taliesin() -> Command {
    let mut cmd = Command::cargo_bin("taliesin").unwrap();
    // Isolate from any real user config or environment overrides.
    cmd.env_remove("TALIESIN_DATABASE_PATH")
        .env_remove("TALIESIN_IDLE_TIMEOUT_SECS")
        .env_remove("TALIESIN_SWEEP_INTERVAL_SECS")
        .env_remove("TALIESIN_LOG_DIR")
        .env_remove("TALIESIN_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    taliesin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Taliesin"))
        .stdout(predicate::str::contains("personal assistant"));
}

#[test]
fn test_version_displays() {
    taliesin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taliesin"));
}

#[test]
fn test_help_lists_subcommands() {
    taliesin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("tools"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_session_help() {
    taliesin()
        .args(["session", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--metadata"))
        .stdout(predicate::str::contains("--user-id"))
        .stdout(predicate::str::contains("--access-token"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tools and Config Listings
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_tools_lists_the_full_tool_set() {
    taliesin()
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("search_memory"))
        .stdout(predicate::str::contains("get_essential_info"))
        .stdout(predicate::str::contains("save_memory"))
        .stdout(predicate::str::contains("list_emails"))
        .stdout(predicate::str::contains("mark_email_as_read"))
        .stdout(predicate::str::contains("list_calendar_events"))
        .stdout(predicate::str::contains("create_calendar_event"))
        .stdout(predicate::str::contains("list_tasks"))
        .stdout(predicate::str::contains("create_task"))
        .stdout(predicate::str::contains("complete_task"));
}

#[test]
fn test_config_shows_provenance_and_effective_toml() {
    let config_dir = TempDir::new().unwrap();

    taliesin()
        .arg("config")
        .env("TALIESIN_CONFIG_DIR", config_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("search order"))
        .stdout(predicate::str::contains("[memory]"))
        .stdout(predicate::str::contains("idle_timeout_secs = 3600"))
        .stdout(predicate::str::contains("[services]"));
}

#[test]
fn test_config_reflects_environment_overrides() {
    let config_dir = TempDir::new().unwrap();

    taliesin()
        .arg("config")
        .env("TALIESIN_CONFIG_DIR", config_dir.path())
        .env("TALIESIN_IDLE_TIMEOUT_SECS", "120")
        .assert()
        .success()
        .stdout(predicate::str::contains("idle_timeout_secs = 120"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_session_requires_identity() {
    taliesin().arg("session").assert().failure();
}

#[test]
fn test_session_round_trips_memory_requests() {
    let data_dir = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let db = data_dir.path().join("memories.db");

    taliesin()
        .args(["session", "--user-id", "alice", "--access-token", "test-token"])
        .env("TALIESIN_CONFIG_DIR", config_dir.path())
        .env("TALIESIN_DATABASE_PATH", &db)
        .write_stdin(concat!(
            r#"{"tool": "save_memory", "arguments": {"content": "favorite color is teal"}}"#,
            "\n",
            r#"{"tool": "search_memory", "arguments": {"query": "teal"}}"#,
            "\n",
            r#"{"tool": "no_such_tool"}"#,
            "\n",
            "not json at all\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("Memory saved."))
        .stdout(predicate::str::contains("favorite color is teal"))
        .stdout(predicate::str::contains("Unknown tool: no_such_tool"))
        .stdout(predicate::str::contains("Invalid tool request:"));
}

#[test]
fn test_session_accepts_metadata_json() {
    let data_dir = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let db = data_dir.path().join("memories.db");

    taliesin()
        .args([
            "session",
            "--metadata",
            r#"{"user_id": "bob", "access_token": "tok"}"#,
        ])
        .env("TALIESIN_CONFIG_DIR", config_dir.path())
        .env("TALIESIN_DATABASE_PATH", &db)
        .write_stdin(concat!(
            r#"{"tool": "get_essential_info"}"#,
            "\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No essential information available yet.",
        ));
}

#[test]
fn test_session_refuses_incomplete_metadata() {
    let config_dir = TempDir::new().unwrap();

    taliesin()
        .args(["session", "--metadata", r#"{"user_id": "bob"}"#])
        .env("TALIESIN_CONFIG_DIR", config_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("access_token"));
}
