use std::path::Path;
use std::process::{Command, Output};

fn lumen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lumen"))
        .args(args)
        .output()
        .expect("lumen binary should run")
}

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("script file should be writable");
    path.display().to_string()
}

#[test]
fn compile_raw_emits_payload_bytes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_script(dir.path(), "fill.lume", "animFill");

    let out = lumen(&["--format", "raw", "compile", &script]);
    assert!(out.status.success());
    assert_eq!(out.stdout, vec![251, 55, 255]);
}

#[test]
fn compile_json_reports_diagnostics() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_script(dir.path(), "bogus.lume", "animFill bogusWord");

    let out = lumen(&["--format", "json", "compile", &script]);
    assert!(out.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("compile output should be json");
    assert_eq!(parsed["table"], "v2");
    assert_eq!(parsed["payload_hex"], "fb37ff");
    assert_eq!(parsed["diagnostics"].as_array().map(Vec::len), Some(1));
}

#[test]
fn compile_strict_fails_on_dropped_tokens() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_script(dir.path(), "bogus.lume", "notAWord");

    let out = lumen(&["--format", "json", "compile", &script, "--strict"]);
    assert_eq!(out.status.code(), Some(60));
}

#[test]
fn compile_table_v1_changes_codes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_script(dir.path(), "fill.lume", "animFill");

    let out = lumen(&["--format", "raw", "compile", &script, "--table", "v1"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, vec![251, 21, 255]);
}

#[test]
fn compile_out_writes_payload_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_script(dir.path(), "fill.lume", "animFill");
    let out_path = dir.path().join("fill.bin");

    let out = lumen(&[
        "--format",
        "json",
        "compile",
        &script,
        "--out",
        &out_path.display().to_string(),
    ]);
    assert!(out.status.success());
    assert_eq!(
        std::fs::read(&out_path).expect("payload file"),
        vec![251, 55, 255]
    );
}

#[test]
fn tokens_json_lists_kinds_in_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_script(dir.path(), "mix.lume", "animFill #ff00aa 50%");

    let out = lumen(&["--format", "json", "tokens", &script]);
    assert!(out.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("tokens output should be json");
    let kinds: Vec<&str> = parsed
        .as_array()
        .expect("token array")
        .iter()
        .map(|t| t["kind"].as_str().expect("kind"))
        .collect();
    assert_eq!(
        kinds,
        vec!["word", "whitespace", "color", "whitespace", "percentage"]
    );
}

#[test]
fn frames_raw_plans_two_frames_for_1000_bytes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let payload_path = dir.path().join("payload.bin");
    std::fs::write(&payload_path, vec![0xABu8; 1000]).expect("payload file");

    let out = lumen(&[
        "--format",
        "json",
        "frames",
        &payload_path.display().to_string(),
        "--raw",
        "--mtu",
        "512",
    ]);
    assert!(out.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("frames output should be json");
    let frames = parsed.as_array().expect("frame array");
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["offset"], 0);
    assert_eq!(frames[1]["offset"], 500);
    assert_eq!(frames[0]["session_id"], frames[1]["session_id"]);
}

#[test]
fn frames_rejects_unusable_mtu() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_script(dir.path(), "fill.lume", "animFill");

    let out = lumen(&["frames", &script, "--mtu", "12"]);
    assert_eq!(out.status.code(), Some(60));
}

#[test]
fn version_prints_package_version() {
    let out = lumen(&["version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert!(stdout.starts_with("lumen "));
}

#[test]
fn missing_file_maps_to_io_error() {
    let out = lumen(&["compile", "/nonexistent/definitely-missing.lume"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).expect("utf8");
    assert!(stderr.contains("reading"));
}
