use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tunnel"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn arrange_json(args: &[&str]) -> Value {
    let mut full = vec!["arrange", "--json"];
    full.extend_from_slice(args);
    let output = run(&full);
    assert!(output.status.success(), "{:?}", output);
    serde_json::from_str(&stdout_of(&output)).expect("stdout is not JSON")
}

#[test]
fn test_arrange_default_grid() {
    let report = arrange_json(&["--count", "12"]);
    assert_eq!(report["overlapPairs"], 0);
    let positions = report["positions"].as_object().unwrap();
    assert_eq!(positions.len(), 12);
    assert_eq!(positions["card-000"]["x"], 80.0);
    assert_eq!(positions["card-000"]["y"], 80.0);
    // 12 cards -> 4 columns
    assert_eq!(positions["card-004"]["y"], 400.0);
}

#[test]
fn test_arrange_named_cards() {
    let report = arrange_json(&["--cards", "b, a ,c"]);
    let positions = report["positions"].as_object().unwrap();
    assert_eq!(positions.len(), 3);
    assert_eq!(positions["b"]["x"], 80.0);
    assert_eq!(positions["a"]["x"], 360.0);
}

#[test]
fn test_arrange_tight_gap_reports_overlaps() {
    let report = arrange_json(&["--count", "4", "--gap-x", "100"]);
    assert_eq!(report["overlapPairs"], 2);
}

#[test]
fn test_arrange_table_output() {
    let output = run(&["arrange", "--count", "5", "--layout", "spiral"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("card-004"));
    let re = Regex::new(r"Overlap pairs: \d+").unwrap();
    assert!(re.is_match(&stdout), "STDOUT:\n{}", stdout);
}

#[test]
fn test_arrange_auto() {
    let report = arrange_json(&["--auto", "--count", "30", "--card-h", "280"]);
    assert_eq!(report["positions"].as_object().unwrap().len(), 30);
    assert_eq!(report["positions"]["card-000"]["x"], 40.0);
}

#[test]
fn test_config_file_and_override() {
    let ctx = TestContext::new();
    let cfg = ctx.write("tunnel.json", r#"{"grid":{"gap_x":100.0}}"#);
    let cfg = cfg.to_str().unwrap();

    let from_file = arrange_json(&["--config", cfg, "--count", "4"]);
    assert_eq!(from_file["overlapPairs"], 2);

    let overridden = arrange_json(&["--config", cfg, "--count", "4", "--gap-x", "280"]);
    assert_eq!(overridden["overlapPairs"], 0);
}

#[test]
fn test_missing_config_fails() {
    let output = run(&["arrange", "--config", "/definitely/not/here.json"]);
    assert!(!output.status.success());
}

#[test]
fn test_perf_from_csv() {
    let ctx = TestContext::new();
    let frames = ctx.write("frames.csv", "delta_ms\n20\n20\n20\n14\n");
    let output = run(&["perf", "--frames", frames.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("perf-no-shadow"), "STDOUT:\n{}", stdout);
    assert!(stdout.contains("Final tier: no-shadow"));
}

#[test]
fn test_perf_synthetic_is_seeded() {
    let args = ["perf", "--synthetic", "300", "--seed", "7", "--base-ms", "16"];
    let first = stdout_of(&run(&args));
    let second = stdout_of(&run(&args));
    assert_eq!(first, second);
    let re = Regex::new(r"Final tier: (full|no-shadow|no-3d|no-anim)").unwrap();
    assert!(re.is_match(&first));
}

#[test]
fn test_perf_requires_input() {
    assert!(!run(&["perf"]).status.success());
}

#[test]
fn test_perf_rejects_both_inputs() {
    let ctx = TestContext::new();
    let frames = ctx.write("frames.csv", "20\n20\n20\n");
    let output = run(&[
        "perf",
        "--frames",
        frames.to_str().unwrap(),
        "--synthetic",
        "10",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"), "STDERR:\n{}", stderr);
}

#[test]
fn test_perf_rejects_unknown_tier() {
    let output = run(&["perf", "--synthetic", "10", "--initial-tier", "ultra"]);
    assert!(!output.status.success());
}

#[test]
fn test_replay_runs_deferred_reset() {
    let ctx = TestContext::new();
    let script = ctx.write(
        "script.json",
        r#"[
            {"type":"DRAG_START","cardId":"card-001"},
            {"type":"RESET_REQUEST"},
            {"type":"SETTLE_COMPLETE"},
            {"type":"DRAG_END","cardId":"card-001"},
            {"type":"SETTLE_COMPLETE"}
        ]"#,
    );
    let output = run(&["replay", "--script", script.to_str().unwrap(), "--count", "6"]);
    assert!(output.status.success(), "{:?}", output);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("SETTLE_COMPLETE (no-op)"));

    let json_start = stdout.find("\n{").expect("no snapshot in output");
    let snapshot: Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    assert_eq!(snapshot["state"], "idle");
    assert_eq!(snapshot["queuedArrange"], false);
    assert_eq!(snapshot["layoutLock"], false);
    assert_eq!(snapshot["overlapPairs"], 0);
}
