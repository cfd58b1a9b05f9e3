use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn cardiac_culture(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cardiac-culture"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("binary runs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 output")
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join("cardiac-culture-cli-tests")
        .join(format!("{name}-{}", std::process::id()))
}

#[test]
fn describe_prints_the_property_sheet() {
    let output = cardiac_culture(&["describe", "--day", "6"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Cell Properties - Day 6: Peak Contraction Activity"));
    assert!(text.contains("Morphology"));
    assert!(text.contains("Contractility"));
}

#[test]
fn metrics_prints_selected_columns() {
    let output = cardiac_culture(&["metrics", "--metric", "debris"]);

    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 9);
    assert!(lines[0].contains("Debris Level"));
    assert!(!lines[0].contains("Beat Strength"));
    assert!(lines[8].trim_end().ends_with("90.0"));
}

#[test]
fn invalid_day_is_rejected() {
    let output = cardiac_culture(&["describe", "--day", "9"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_config_file_fails() {
    let output = cardiac_culture(&[
        "--config",
        "/nonexistent/cardiac-culture.toml",
        "describe",
        "--day",
        "1",
    ]);

    assert!(!output.status.success());
}

#[test]
fn export_writes_frames_chart_and_table() {
    let dir = scratch_dir("export");
    let dir_arg = dir.to_str().expect("utf-8 temp dir");

    let output = cardiac_culture(&[
        "export", "--out", dir_arg, "--day", "8", "--frames", "2", "--seed", "11",
    ]);

    assert!(output.status.success(), "{output:?}");
    for name in ["day-8-frame-0.png", "day-8-frame-1.png", "metrics.svg", "metrics.json"] {
        assert!(is_non_empty(&dir.join(name)), "{name} missing");
    }
    assert!(!dir.join("day-7-frame-0.png").exists());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("metrics.json")).expect("json exists"))
            .expect("valid json");
    assert_eq!(json["rows"].as_array().map(Vec::len), Some(8));
    assert_eq!(json["selected"].as_array().map(Vec::len), Some(24));
}

#[test]
fn export_rejects_zero_frames() {
    let dir = scratch_dir("zero-frames");
    let dir_arg = dir.to_str().expect("utf-8 temp dir");

    let output = cardiac_culture(&["export", "--out", dir_arg, "--frames", "0"]);

    assert!(!output.status.success());
}

fn is_non_empty(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.len() > 0).unwrap_or(false)
}
