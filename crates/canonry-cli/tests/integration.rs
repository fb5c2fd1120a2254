//! Integration tests for CLI commands.

use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_canonry"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn run_cli_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_canonry"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

const SESSIONS: &str = r#"{"id": 1, "role": "admin", "mask": 15, "active": true}
{"id": 2, "role": "viewer", "mask": 1, "active": true}
{"mask": 15, "active": true, "role": "admin", "id": 3}

{"id": 4, "role": "admin", "mask": 15, "active": false}
"#;

#[test]
fn canonicalize_drops_excluded_fields() {
    let output = run_cli_with_stdin(
        &["canonicalize", "--exclude", "id,ts"],
        r#"{"ts": "2024-01-01T00:00:00Z", "role": "admin", "id": 7, "mask": 15}"#,
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"{"mask":15,"role":"admin"}"#
    );
}

#[test]
fn fingerprint_is_sha256_of_canonical_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        &temp_dir,
        "record.json",
        r#"{"role": "admin", "created_at": "2024-01-01T00:00:00Z", "mask": 15}"#,
    );

    let output = run_cli(&["fingerprint", &path, "--exclude", "created_at"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "21d2379ba67bfb133e9802b9c27e4f1b5df248500ff2967ee71dae4cab8cc7ca"
    );

    let output = run_cli(&["fingerprint", &path, "--exclude", "created_at", "--b64"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "IdI3m6Z7-xM-mAK5wn5PG13ySFAP8pZ-5x2uTKuMx8o"
    );
}

#[test]
fn dedup_reports_duplicates_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "sessions.jsonl", SESSIONS);

    let output = run_cli(&["dedup", &path, "--exclude", "id", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["records"], 4);
    assert_eq!(report["canonical"], 3);
    assert_eq!(report["duplicates"], 1);

    let entries = report["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["first_line"], 1);
    assert_eq!(entries[0]["copies"], 2);
    assert_eq!(entries[1]["first_line"], 2);
    assert_eq!(entries[2]["first_line"], 5);
}

#[test]
fn dedup_without_exclusions_keeps_ids_distinct() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "sessions.jsonl", SESSIONS);

    let output = run_cli(&["dedup", &path, "--json"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["canonical"], 4);
    assert_eq!(report["duplicates"], 0);
}

#[test]
fn dedup_table_output_has_summary() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "sessions.jsonl", SESSIONS);

    let output = run_cli(&["dedup", &path, "--exclude", "id", "--shards", "4"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("FINGERPRINT"));
    assert!(stdout.contains("4 records, 3 canonical, 1 duplicates"));
}

#[test]
fn dedup_rejects_invalid_shard_amount() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "sessions.jsonl", SESSIONS);

    let output = run_cli(&["dedup", &path, "--shards", "3"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("shard amount 3"));
}

#[test]
fn dedup_reads_options_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "sessions.jsonl", SESSIONS);
    let options = write_file(
        &temp_dir,
        "options.json",
        r#"{"initial_capacity": 16, "shard_amount": 8}"#,
    );

    let output = run_cli(&["dedup", &path, "--options", &options, "--json"]);
    assert!(output.status.success());
}

#[test]
fn dedup_reports_bad_line_number() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "bad.jsonl", "{\"a\": 1}\n{oops\n");

    let output = run_cli(&["dedup", &path]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}

#[test]
fn dedup_rejects_non_object_record_when_excluding() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "arrays.jsonl", "{\"id\": 1}\n[1, 2]\n");

    let output = run_cli(&["dedup", &path, "--exclude", "id"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"));
    assert!(stderr.contains("array"));
}
