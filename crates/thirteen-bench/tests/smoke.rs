use std::fs;
use std::path::Path;

use thirteen_bench::config::BenchConfig;
use thirteen_bench::runner::SelfPlayRunner;
use tempfile::tempdir;

fn load_config(output_dir: &Path, variant: &str, seats: &[&str]) -> BenchConfig {
    let seat_rows: String = seats
        .iter()
        .map(|name| format!("  - name: \"{name}\"\n    difficulty: \"normal\"\n"))
        .collect();
    let yaml = format!(
        r#"
run_id: "test_smoke"
session:
  variant: "{variant}"
  rounds: 5
  seed: 4242
seats:
{seat_rows}outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("rounds.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_once(dir: &Path, variant: &str, seats: &[&str]) -> String {
    let config = load_config(dir, variant, seats);
    let outputs = config.resolved_outputs();
    let summary = SelfPlayRunner::new(config, outputs)
        .run()
        .expect("self-play completes");

    assert_eq!(summary.rounds_played, 5);
    assert_eq!(summary.rows_written, 5);
    assert!(summary.summary_path.exists());
    fs::read_to_string(&summary.jsonl_path).expect("jsonl readable")
}

#[test]
fn seeded_runs_write_identical_rows() {
    let seats = ["YOU", "Aaron", "Swan", "Hannah"];
    let first_dir = tempdir().expect("temp dir");
    let second_dir = tempdir().expect("temp dir");

    let first = run_once(first_dir.path(), "thirteen", &seats);
    let second = run_once(second_dir.path(), "thirteen", &seats);
    assert_eq!(first, second);

    let rows: Vec<serde_json::Value> = first
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), 5);
    for (idx, row) in rows.iter().enumerate() {
        assert_eq!(row["run_id"], "test_smoke");
        assert_eq!(row["round_id"], format!("R{:05}", idx + 1));
        assert_eq!(row["ranking"].as_array().map(Vec::len), Some(4));
        let winner = row["winner"].as_str().expect("winner name");
        assert!(seats.contains(&winner));
    }
    assert_eq!(rows[0]["first_round"], true);
    assert_eq!(rows[1]["first_round"], false);
}

#[test]
fn seventeen_card_run_writes_summary_table() {
    let seats = ["YOU", "Aaron", "Swan"];
    let dir = tempdir().expect("temp dir");
    let jsonl = run_once(dir.path(), "seventeen", &seats);
    assert_eq!(jsonl.lines().count(), 5);

    let summary = fs::read_to_string(dir.path().join("summary.md")).expect("summary");
    assert!(summary.starts_with("# Self-Play Summary"));
    assert!(summary.contains("Rounds played: 5"));
    for name in seats {
        assert!(summary.contains(&format!("| {name} |")));
    }
}
