//! Integration tests for CLI commands.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::{json, Value};
use tempfile::TempDir;

const TAGS: [&str; 5] = ["formal", "informal", "technical", "creative", "teaching"];

fn run_cli(args: &[&str]) -> (bool, String, String) {
    run_cli_with_stdin(args, None)
}

fn run_cli_with_stdin(args: &[&str], stdin: Option<&str>) -> (bool, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mastery"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

fn journal_in(dir: &TempDir) -> String {
    dir.path().join("mastery.mvj").to_string_lossy().to_string()
}

fn submit(journal: &str, learner: &str, result: &Value) -> Value {
    let (success, stdout, stderr) = run_cli_with_stdin(
        &["submit", "--journal", journal, learner, "--json"],
        Some(&result.to_string()),
    );
    assert!(success, "submit failed: {stderr}");
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_assign_then_status() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);

    let (success, stdout, _) = run_cli(&["assign", "--journal", &journal, "ada", "2"]);
    assert!(success);
    assert!(stdout.contains("provisional"));

    let (success, stdout, _) = run_cli(&["status", "--journal", &journal, "ada", "--json"]);
    assert!(success);
    let rows: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["status"], "provisional");
    assert_eq!(rows[0]["target_level"], 2);
}

#[test]
fn test_full_promotion_through_submit() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    assert!(run_cli(&["assign", "--journal", &journal, "ada", "1"]).0);

    for (i, tag) in TAGS.iter().enumerate() {
        let outcome = submit(
            &journal,
            "ada",
            &json!({
                "exercise_id": format!("stretch-{i}"),
                "passed": true,
                "total_score": 0.9,
                "tier": "stretch",
                "context_tag": tag,
                "level": 1
            }),
        );
        assert_eq!(outcome["evidence_recorded"], json!(["breadth"]));
        assert_eq!(outcome["promotion"]["outcome"], "not_yet");
    }
    for i in 0..3 {
        submit(
            &journal,
            "ada",
            &json!({
                "exercise_id": format!("curveball-{i}"),
                "is_curveball": true,
                "curveball_score": 4.0,
                "passed": true,
                "total_score": 4.0,
                "level": 1
            }),
        );
    }

    let (success, stdout, _) = run_cli(&["gaps", "--journal", &journal, "ada", "1", "--json"]);
    assert!(success);
    let gaps: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(gaps.as_array().unwrap().len(), 1);
    assert_eq!(gaps[0]["dimension"], "application");

    let outcome = submit(
        &journal,
        "ada",
        &json!({
            "exercise_id": "capstone",
            "is_capstone": true,
            "passed": true,
            "total_score": 0.95,
            "level": 1
        }),
    );
    assert_eq!(outcome["promotion"]["outcome"], "promoted");
    assert_eq!(outcome["promotion"]["xp_bonus"], 50);

    let (success, stdout, _) = run_cli(&["evaluate", "--journal", &journal, "ada", "1"]);
    assert!(success);
    assert!(stdout.contains("already_confirmed"));

    let (success, stdout, _) = run_cli(&["rings", "--journal", &journal, "ada", "1", "--json"]);
    assert!(success);
    let rings: Value = serde_json::from_str(&stdout).unwrap();
    assert!(rings.as_array().unwrap().iter().all(|r| r["met"] == true));
}

#[test]
fn test_submit_from_file() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    let input = dir.path().join("result.json");
    std::fs::write(
        &input,
        json!({
            "exercise_id": "fc-1",
            "is_foundation_check": true,
            "passed": true,
            "total_score": 1.0,
            "level": 3
        })
        .to_string(),
    )
    .unwrap();

    let (success, stdout, _) = run_cli(&[
        "submit",
        "--journal",
        &journal,
        "ada",
        input.to_str().unwrap(),
    ]);
    assert!(success);
    assert!(stdout.contains("Recorded foundation evidence ev_"));
    assert!(stdout.contains("no_status"));
}

#[test]
fn test_submit_rejects_invalid_result() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    let (success, _, stderr) = run_cli_with_stdin(
        &["submit", "--journal", &journal, "ada"],
        Some("{\"exercise_id\": \"x\"}"),
    );
    assert!(!success);
    assert!(stderr.contains("Invalid exercise result"));
}

#[test]
fn test_invalid_learner_is_rejected() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    let (success, _, _) = run_cli(&["assign", "--journal", &journal, "bad learner", "1"]);
    assert!(!success);
}

#[test]
fn test_read_commands_require_existing_journal() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    let (success, _, stderr) = run_cli(&["status", "--journal", &journal, "ada"]);
    assert!(!success);
    assert!(stderr.contains("Error"));
    assert!(!std::path::Path::new(&journal).exists());
}

#[test]
fn test_log_lists_newest_first() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    for tag in ["formal", "informal", "technical"] {
        let (success, _, _) = run_cli(&[
            "record",
            "--journal",
            &journal,
            "ada",
            "2",
            "breadth",
            "--context-tag",
            tag,
        ]);
        assert!(success);
    }

    let (success, stdout, _) = run_cli(&["log", "--journal", &journal, "ada", "--limit", "2", "--json"]);
    assert!(success);
    let lines: Vec<Value> = stdout
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| serde_json::from_str(l).expect("Invalid JSON"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["seq"], 2);
    assert_eq!(lines[0]["context_tag"], "technical");
    assert_eq!(lines[1]["seq"], 1);
}

#[test]
fn test_verify_command() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    assert!(run_cli(&["assign", "--journal", &journal, "ada", "2"]).0);
    assert!(run_cli(&["record", "--journal", &journal, "ada", "2", "depth", "--score", "4.5"]).0);
    assert!(run_cli(&["record", "--journal", &journal, "ada", "1", "foundation", "--failed"]).0);

    let (success, stdout, _) = run_cli(&["verify", "--journal", &journal, "--strict", "--json"]);
    assert!(success);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["ok"], true);
    assert_eq!(report["evidence"].as_array().unwrap().len(), 2);
    assert_eq!(report["other_entries"], 1);

    let (success, stdout, _) = run_cli(&["verify", "--journal", &journal]);
    assert!(success);
    assert!(stdout.contains("VERDICT"));
}

#[test]
fn test_dormancy_without_stale_rows_is_active() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    assert!(run_cli(&["assign", "--journal", &journal, "ada", "2"]).0);

    let (success, stdout, _) = run_cli(&["dormancy", "--journal", &journal, "ada"]);
    assert!(success);
    assert_eq!(stdout.trim(), "active");

    let (success, stdout, _) = run_cli(&["return", "--journal", &journal, "ada", "--passed"]);
    assert!(success);
    assert_eq!(stdout.trim(), "not_dormant");
}

#[test]
fn test_reset_removes_status_but_keeps_evidence() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    assert!(run_cli(&["assign", "--journal", &journal, "ada", "2"]).0);
    assert!(run_cli(&["record", "--journal", &journal, "ada", "2", "application"]).0);

    let (success, stdout, _) = run_cli(&["reset", "--journal", &journal, "ada", "2", "--json"]);
    assert!(success);
    let reset: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(reset["removed"], true);

    let (_, stdout, _) = run_cli(&["status", "--journal", &journal, "ada", "--json"]);
    assert_eq!(serde_json::from_str::<Value>(&stdout).unwrap(), json!([]));

    let (_, stdout, _) = run_cli(&["log", "--journal", &journal, "ada"]);
    assert!(stdout.contains("application"));
}

#[test]
fn test_config_changes_targets() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    let config = dir.path().join("mastery.toml");
    std::fs::write(
        &config,
        "[targets]\nfoundation = 0.0\nbreadth = 1.0\ndepth = 0.0\napplication = 0.0\n",
    )
    .unwrap();
    let config = config.to_str().unwrap();

    assert!(run_cli(&["--config", config, "assign", "--journal", &journal, "ada", "4"]).0);
    assert!(run_cli(&["record", "--journal", &journal, "ada", "4", "breadth", "--context-tag", "formal"]).0);

    let (success, stdout, _) = run_cli(&["evaluate", "--journal", &journal, "ada", "4", "--config", config, "--json"]);
    assert!(success);
    let result: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["outcome"], "promoted");
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[depth]\npass_score = 9.0\n").unwrap();

    let (success, _, stderr) = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "assign",
        "--journal",
        &journal,
        "ada",
        "1",
    ]);
    assert!(!success);
    assert!(stderr.contains("Invalid config"));
}

#[test]
fn test_record_rejects_unencodable_input_and_keeps_journal_readable() {
    let dir = TempDir::new().unwrap();
    let journal = journal_in(&dir);

    let (success, _, stderr) = run_cli(&[
        "record", "--journal", &journal, "ada", "2", "depth", "--score", "NaN",
    ]);
    assert!(!success);
    assert!(stderr.contains("score"));

    let (success, _, _) = run_cli(&["record", "--journal", &journal, "ada", "0", "depth"]);
    assert!(!success);

    let (success, _, stderr) = run_cli(&["record", "--journal", &journal, "ada", "2", "depth", "--score", "4.0"]);
    assert!(success, "record failed: {stderr}");

    let (success, stdout, stderr) = run_cli(&["log", "--journal", &journal, "ada", "--json"]);
    assert!(success, "log failed: {stderr}");
    assert_eq!(stdout.lines().count(), 1);
}
