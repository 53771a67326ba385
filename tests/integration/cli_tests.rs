//! Command line tests
//!
//! Tests run the built `radlog` binary and check exit codes, stdout and the
//! diagnostics written to stderr.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::common::synthetic::*;
use crate::common::write_temp_log;
use radlog::export::TABLE_HEADER;
use radlog::parsers::{AlignmentMode, RecordLayout};
use radlog::settings::DecoderSettings;

/// Settings path under the test temp dir that no test writes to
fn missing_settings() -> PathBuf {
    std::env::temp_dir()
        .join(format!("radlog-tests-{}", std::process::id()))
        .join("cli_no_settings.json")
}

fn radlog() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_radlog"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_on(log: &Path, extra: &[&str]) -> Output {
    radlog()
        .arg(log)
        .arg("--config")
        .arg(missing_settings())
        .args(extra)
        .output()
        .expect("Should run radlog")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================
// Usage and Failure Exit Codes
// ============================================

#[test]
fn test_missing_file_argument_is_usage_error() {
    let output = radlog().output().expect("Should run radlog");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_short_file_exits_non_zero() {
    let path = write_temp_log("cli_short.bin", &[0x20; 43]);
    let output = run_on(&path, &[]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Malformed input (43 bytes)"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unreadable_file_exits_non_zero() {
    let path = missing_settings().with_file_name("cli_does_not_exist.bin");
    let output = run_on(&path, &[]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Cannot read log file"));
}

// ============================================
// Table Output
// ============================================

#[test]
fn test_valid_log_prints_header_and_rows() {
    let records: Vec<_> = sequential_records(2)
        .into_iter()
        .map(|r| r.dimension(b"Sv/h"))
        .collect();
    let path = write_temp_log("cli_valid.bin", &log_bytes(&[0x05], &records));
    let output = run_on(&path, &[]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            TABLE_HEADER,
            "1, 0.0, µSv/h, 0, 0, 60, 15.01.2, 10:20:3",
            "2, 1000000.0, µSv/h, 0, 0, 60, 15.01.2, 10:20:3",
        ]
    );
}

#[test]
fn test_json_format_flag() {
    let path = write_temp_log("cli_json.bin", &log_bytes(&[], &sequential_records(3)));
    let output = run_on(&path, &["--format", "json"]);

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should print valid JSON");
    assert_eq!(json["dimension"], "µSv/h");
    assert_eq!(json["secs"], serde_json::json!([1, 2, 3]));
}

// ============================================
// Diagnostics on Stderr
// ============================================

#[test]
fn test_unknown_unit_warning_visible_by_default() {
    let record = RecordBuilder::new(1, 5.0).dimension(b"cpm");
    let path = write_temp_log("cli_cpm.bin", &record.to_bytes());
    let output = run_on(&path, &[]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("1, NaN, µSv/h"));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("WARN"), "stderr: {}", stderr);
    assert!(stderr.contains("Unknown dose-rate unit"), "stderr: {}", stderr);
}

#[test]
fn test_trailing_partial_record_is_not_reported_as_length_alignment() {
    let mut data = log_bytes(&[], &sequential_records(2));
    data.extend_from_slice(&[0xee; 5]);
    let path = write_temp_log("cli_trailing.bin", &data);
    let output = run_on(&path, &[]);

    assert!(output.status.success());
    assert_eq!(stdout_of(&output).lines().count(), 3);
    assert!(!stderr_of(&output).contains("file length"));
}

#[test]
fn test_unpadded_log_warns_length_alignment() {
    let mut data = Vec::new();
    for record in sequential_records(2) {
        let mut record = record;
        record.padding = *b"\0\0";
        data.extend_from_slice(&record.to_bytes());
    }
    let path = write_temp_log("cli_unpadded.bin", &data);
    let output = run_on(&path, &[]);

    assert!(output.status.success());
    assert!(stderr_of(&output).contains("aligned on file length alone"));
}

// ============================================
// Settings
// ============================================

#[test]
fn test_save_settings_persists_effective_options() {
    let log = write_temp_log("cli_save.bin", &log_bytes(&[], &sequential_records(1)));
    let config = missing_settings().with_file_name("cli_saved_settings.json");
    let _ = std::fs::remove_file(&config);

    let output = radlog()
        .arg(&log)
        .arg("--config")
        .arg(&config)
        .args(["--strict-alignment", "--format", "json", "--save-settings"])
        .output()
        .expect("Should run radlog");
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let saved = DecoderSettings::load_from(&config);
    assert_eq!(saved.alignment, AlignmentMode::Strict);
    assert_eq!(saved.layout, RecordLayout::Standard);
    assert_eq!(saved.output, radlog::export::OutputFormat::Json);
}
