use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, seats: &[&str]) -> std::path::PathBuf {
    let seat_rows: String = seats
        .iter()
        .map(|name| format!("  - name: \"{name}\"\n"))
        .collect();
    let yaml = format!(
        r#"
run_id: "cli"
session:
  rounds: 2
  seed: 7
seats:
{seat_rows}outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
"#,
        jsonl = dir.join("{run_id}").join("rounds.jsonl").display(),
        summary = dir.join("{run_id}").join("summary.md").display(),
    );
    let path = dir.join("bench.yaml");
    fs::write(&path, yaml).expect("write config");
    path
}

#[test]
fn validate_only_skips_self_play() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), &["YOU", "Aaron", "Swan", "Hannah"]);

    Command::cargo_bin("thirteen-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded configuration 'cli' with 4 seats"))
        .stdout(predicate::str::contains("Validation-only mode"));

    assert!(!dir.path().join("cli").join("rounds.jsonl").exists());
}

#[test]
fn seat_count_mismatch_is_reported() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), &["YOU", "Aaron", "Swan"]);

    Command::cargo_bin("thirteen-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .failure();
}

#[test]
fn overrides_apply_before_running() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), &["YOU", "Aaron", "Swan", "Hannah"]);

    Command::cargo_bin("thirteen-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .args(["--run-id", "override", "--rounds", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 rounds"));

    let jsonl = fs::read_to_string(dir.path().join("override").join("rounds.jsonl"))
        .expect("rows written under the overridden run id");
    assert_eq!(jsonl.lines().count(), 3);
}
