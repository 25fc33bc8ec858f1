use std::path::PathBuf;

use clap::Parser;

use thirteen_bench::config::{BenchConfig, ResolvedOutputs};
use thirteen_bench::logging::init_logging;
use thirteen_bench::runner::SelfPlayRunner;

/// Self-play harness for Thirteen bots.
#[derive(Debug, Parser)]
#[command(
    name = "thirteen-bench",
    author,
    version,
    about = "Deterministic Thirteen self-play harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of rounds to play.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the session seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no rounds are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.session.rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.session.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let seat_count = config.seats.len();
    let run_id = config.run_id.clone();
    let rounds = config.session.rounds;
    let variant = config.session.variant;

    println!(
        "Loaded configuration '{run_id}' with {seat_count} seats (variant {variant}, {rounds} round{})",
        if rounds == 1 { "" } else { "s" }
    );

    if cli.validate_only {
        println!("Validation-only mode: self-play skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SelfPlayRunner::new(config, outputs);
    let summary = runner.run()?;

    println!(
        "Self-play complete for '{run_id}': {} rounds → {} rows at {}",
        summary.rounds_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for seat in &summary.stats.seats {
        println!(
            "  {:<10} wins {:>4}  avg place {:.2}",
            seat.name, seat.wins, seat.avg_placement
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
