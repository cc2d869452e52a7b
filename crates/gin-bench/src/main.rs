use std::path::PathBuf;

use clap::Parser;

use gin_bench::config::{BenchmarkConfig, ResolvedOutputs};
use gin_bench::logging::init_logging;
use gin_bench::tournament::TournamentRunner;

/// Match benchmarking harness for the gin bots.
#[derive(Debug, Parser)]
#[command(
    name = "gin-bench",
    author,
    version,
    about = "Deterministic bot-vs-bot gin match harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "MATCHES")]
    matches: Option<usize>,

    /// Override the RNG seed for match generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no matches are played).
    #[arg(long)]
    validate_only: bool,

    /// Enable per-turn bot telemetry regardless of config (forces GIN_TURN_DETAILS=1).
    #[arg(long)]
    log_turn_details: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    if cli.log_turn_details {
        config.logging.turn_details = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let count = config.matches.count;

    println!(
        "Loaded configuration '{run_id}': {count} match{} to {} points, {} vs {}",
        if count == 1 { "" } else { "es" },
        config.matches.target_score,
        config.sides.player.difficulty,
        config.sides.ai.difficulty,
    );

    let runner = TournamentRunner::new(config.clone(), outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: matches skipped.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} matches, {} rounds → {} rows at {}",
        summary.matches_played,
        summary.rounds_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
