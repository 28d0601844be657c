//! CLI integration tests for the `sumjudge` binary.
//!
//! Only commands that need no judge are exercised here; the pipelines are
//! covered against a fake provider in the library's unit tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn sumjudge_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sumjudge"))
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(sumjudge_bin())
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute sumjudge binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Expected exit code 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// init-config
// =============================================================================

#[test]
fn test_init_config_writes_loadable_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["init-config"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Configuration written to: config/sumjudge.toml"));

    let path = dir.path().join("config/sumjudge.toml");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("[provider]"));
    assert!(content.contains("OPENROUTER_API_KEY"));

    let config = sumjudge_harness::Config::from_file(&path).unwrap();
    assert_eq!(config.evaluation.retry_count, 3);
}

#[test]
fn test_bad_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.toml"), "[evaluation]\nretry_count = 0\n").unwrap();

    let output = run_in(
        dir.path(),
        &["--config", "bad.toml", "stats", "--faithfulness", "raw.jsonl"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("retry_count"));
}

// =============================================================================
// stats
// =============================================================================

#[test]
fn test_stats_over_raw_outputs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("faithfulness.jsonl"),
        concat!(
            r#"{"doc_id": "d1", "model": "human", "llm_output": "...", "pred_faithfulness_labels": [0, 0], "pred_faithfulness_error_type": ["no error", "no error"], "parse_provenance": "exact"}"#,
            "\n",
            r#"{"doc_id": "d2", "model": "human", "llm_output": "...", "pred_faithfulness_labels": [1, 0], "pred_faithfulness_error_type": ["entity error", "no error"], "parse_provenance": "exact"}"#,
            "\n",
            r#"{"doc_id": "d3", "model": "human", "llm_output": ""}"#,
            "\n",
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("alignment.jsonl"),
        concat!(
            r#"{"doc_id": "d1", "sentences": ["A.", "B."], "pred_alignment_labels": [1, 1], "pred_sentence_line_numbers": [1, 2]}"#,
            "\n",
        ),
    )
    .unwrap();

    let output = run_in(
        dir.path(),
        &[
            "stats",
            "--faithfulness",
            "faithfulness.jsonl",
            "--alignment",
            "alignment.jsonl",
            "--output",
            "stats",
        ],
    );
    assert_success(&output);

    let text = std::fs::read_to_string(dir.path().join("stats/central_tendency_stats.txt")).unwrap();
    assert!(stdout(&output).contains(&text));
    assert!(text.contains("Faithfulness:\n  Mean: 75.00%\n  Median: 75.00%\n  Mode: 50.00%\n  Std Dev: 25.00%\n"));
    assert!(text.contains("Completeness:\n  Mean: 100.00%\n"));
    assert!(text.contains("Conciseness:\n  Mean: 100.00%\n"));
    assert!(text.contains("  no error: 3\n  entity error: 1\n"));
}

#[test]
fn test_stats_without_inputs_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["stats"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["faithfulness", "--input", "missing.jsonl"]);
    assert!(!output.status.success());
}
