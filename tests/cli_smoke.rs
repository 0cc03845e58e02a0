//! CLI smoke tests: run the compiled binaries against a throwaway state dir.
//!
//! These tests verify exit codes, stdout and the files the hooks leave behind.
//! No network access required.

use std::path::Path;
use std::process::Command;

use serde_json::{json, Value};
use tempfile::TempDir;

/// Helper: run a binary with given args and return (exit_code, stdout, stderr).
fn run_bin(bin: &str, state: &Path, args: &[&str]) -> (i32, String, String) {
    run_bin_with_env(bin, state, args, &[])
}

/// Like [`run_bin`], with extra environment variables applied last.
fn run_bin_with_env(
    bin: &str,
    state: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
) -> (i32, String, String) {
    let output = Command::new(bin)
        .args(args)
        .env("RUST_LOG", "") // suppress tracing noise
        .env("DEVHOOK_STATE_DIR", state)
        .env("DEVHOOK_CONFIG", state.join("no-such-config.json"))
        .envs(envs.iter().copied())
        .output()
        .expect("failed to execute binary");
    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

fn run_cli(state: &Path, args: &[&str]) -> (i32, String, String) {
    run_bin(env!("CARGO_BIN_EXE_devhook"), state, args)
}

fn payload(category: &str, serial: &str) -> String {
    json!({
        "idVendor": "2341",
        "idProduct": "0043",
        "serial": serial,
        "urDeviceType": category,
        "logicalDevices": [{"deviceNode": "/dev/ttyACM0", "major": 166, "minor": 0}],
        "manufacturer": "Arduino (www.arduino.cc)",
        "product": "UNKNOWN",
        "urDeviceAPIVersion": "0.1"
    })
    .to_string()
}

fn read_ledger(state: &Path, category: &str) -> Value {
    let path = state.join(format!("current_owned_{}_devices.json", category));
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Help & Version
// ============================================================================

#[test]
fn cli_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _stderr) = run_cli(dir.path(), &[]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("devhook"));
}

#[test]
fn cli_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _stderr) = run_cli(dir.path(), &["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("on-device-add"));
    assert!(stdout.contains("serve"));
}

#[test]
fn cli_version_command() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _stderr) = run_cli(dir.path(), &["version"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("devhook"));
    assert!(stdout.contains('.'));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn cli_config_check_without_file() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _stderr) = run_cli(dir.path(), &["config", "check"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No config file found"));
}

#[test]
fn cli_config_check_suggests_typo() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"ledgr": {}}"#).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_devhook"))
        .args(["config", "check"])
        .env("RUST_LOG", "")
        .env("DEVHOOK_CONFIG", &config)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ledger"), "got: {}", stdout);
}

// ============================================================================
// Hook subcommands
// ============================================================================

#[test]
fn cli_add_then_remove_serial_device() {
    let dir = TempDir::new().unwrap();
    let p = payload("SERIAL", "ABC123");

    let (code, _, stderr) = run_cli(dir.path(), &["on-device-add", p.as_str()]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(
        read_ledger(dir.path(), "serial"),
        json!({"23410043ABC123": ["/dev/ttyACM0"]})
    );

    let (code, _, _) = run_cli(dir.path(), &["on-device-remove", p.as_str()]);
    assert_eq!(code, 0);
    assert_eq!(read_ledger(dir.path(), "serial"), json!({}));
}

#[test]
fn cli_add_rejects_non_serial_device() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["on-device-add", payload("usb", "X").as_str()]);
    assert_eq!(code, 1);
    assert!(!dir.path().join("current_owned_usb_devices.json").exists());
}

#[test]
fn cli_add_rejects_invalid_payload() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["on-device-add", r#"{"idVendor": "2341"}"#]);
    assert_eq!(code, 1);
}

#[test]
fn cli_duplicate_add_fails() {
    let dir = TempDir::new().unwrap();
    let p = payload("serial", "DUP");
    assert_eq!(run_cli(dir.path(), &["on-device-add", p.as_str()]).0, 0);
    assert_eq!(run_cli(dir.path(), &["on-device-add", p.as_str()]).0, 1);
}

#[test]
fn cli_remove_unowned_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["on-device-remove", payload("serial", "NOPE").as_str()]);
    assert_eq!(code, 1);
}

#[test]
fn cli_hook_without_payload_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["on-device-add"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("PAYLOAD"));
}

// ============================================================================
// Standalone hook binaries
// ============================================================================

#[test]
fn hook_binaries_round_trip() {
    let dir = TempDir::new().unwrap();
    let p = payload("serial", "BIN1");

    let (code, _, _) = run_bin(env!("CARGO_BIN_EXE_on_device_add"), dir.path(), &[p.as_str()]);
    assert_eq!(code, 0);
    assert_eq!(
        read_ledger(dir.path(), "serial"),
        json!({"23410043BIN1": ["/dev/ttyACM0"]})
    );

    let (code, _, _) = run_bin(env!("CARGO_BIN_EXE_on_device_remove"), dir.path(), &[p.as_str()]);
    assert_eq!(code, 0);
    assert_eq!(read_ledger(dir.path(), "serial"), json!({}));

    let log = std::fs::read_to_string(dir.path().join("device_invocations.log")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("on_device_add"));
    assert!(lines[1].contains("on_device_remove"));
}

#[test]
fn hook_binary_logs_invocation_with_malformed_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, "{ nope").unwrap();
    let config = config.to_string_lossy().to_string();
    let p = payload("serial", "CFG");

    let (code, _, stderr) = run_bin_with_env(
        env!("CARGO_BIN_EXE_on_device_add"),
        dir.path(),
        &[p.as_str()],
        &[("DEVHOOK_CONFIG", config.as_str())],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration error"), "stderr: {}", stderr);

    let log = std::fs::read_to_string(dir.path().join("device_invocations.log")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("on_device_add"));
    assert!(!dir.path().join("current_owned_serial_devices.json").exists());
}

#[test]
fn hook_binary_honours_direct_write_mode() {
    let dir = TempDir::new().unwrap();
    // Atomic saves write this path first; a directory there makes them fail.
    std::fs::create_dir(dir.path().join("current_owned_serial_devices.tmp")).unwrap();
    let p = payload("serial", "WM");

    let (code, _, _) = run_bin(env!("CARGO_BIN_EXE_on_device_add"), dir.path(), &[p.as_str()]);
    assert_eq!(code, 1);

    let (code, _, stderr) = run_bin_with_env(
        env!("CARGO_BIN_EXE_on_device_add"),
        dir.path(),
        &[p.as_str()],
        &[("DEVHOOK_LEDGER_WRITE_MODE", "direct")],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(
        read_ledger(dir.path(), "serial"),
        json!({"23410043WM": ["/dev/ttyACM0"]})
    );
}

#[test]
fn hook_binary_json_log_format_from_env() {
    let dir = TempDir::new().unwrap();
    let p = payload("serial", "JS");
    let (code, _, stderr) = run_bin_with_env(
        env!("CARGO_BIN_EXE_on_device_add"),
        dir.path(),
        &[p.as_str()],
        &[("DEVHOOK_LOGGING_FORMAT", "json"), ("RUST_LOG", "info")],
    );
    assert_eq!(code, 0);
    let line = stderr
        .lines()
        .find(|l| l.contains("hook decision"))
        .unwrap_or_else(|| panic!("no audit line in: {}", stderr));
    let v: Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["fields"]["decision"], "accepted");
}

#[test]
fn hook_binary_rejects_video_by_default() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_bin(
        env!("CARGO_BIN_EXE_on_device_add"),
        dir.path(),
        &[payload("video", "CAM").as_str()],
    );
    assert_eq!(code, 1);
}

// ============================================================================
// Inspection
// ============================================================================

#[test]
fn cli_owned_prints_ledger() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["on-device-add", payload("serial", "OWN").as_str()]);

    let (code, stdout, _) = run_cli(dir.path(), &["owned", "--device-type", "Serial"]);
    assert_eq!(code, 0);
    let v: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v, json!({"23410043OWN": ["/dev/ttyACM0"]}));

    let (code, stdout, _) = run_cli(dir.path(), &["owned"]);
    assert_eq!(code, 0);
    let v: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v, json!({"23410043OWN": ["/dev/ttyACM0"]}));
}

#[test]
fn cli_owned_unknown_type_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["owned", "--device-type", "usb"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid device type"));
}

#[test]
fn cli_invocations_lists_hook_calls() {
    let dir = TempDir::new().unwrap();
    let (_, stdout, _) = run_cli(dir.path(), &["invocations"]);
    assert!(stdout.contains("No invocations logged yet"));

    run_cli(dir.path(), &["on-device-add", payload("serial", "LOG").as_str()]);
    let (code, stdout, _) = run_cli(dir.path(), &["invocations"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("on-device-add"));
}
