use std::path::PathBuf;

use clap::Parser;

use darts_bench::config::{BenchConfig, ResolvedOutputs};
use darts_bench::logging::init_logging;
use darts_bench::runner::BenchRunner;

/// Replay and simulation harness for the darts scoring engine.
#[derive(Debug, Parser)]
#[command(
    name = "darts-bench",
    author,
    version,
    about = "Deterministic darts match harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of simulated matches.
    #[arg(long, value_name = "MATCHES")]
    matches: Option<usize>,

    /// Override the RNG seed for simulated throws.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (nothing is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(simulation) = config.simulation.as_mut() {
        if let Some(matches) = cli.matches {
            simulation.matches = matches;
        }
        if let Some(seed) = cli.seed {
            simulation.seed = Some(seed);
        }
    } else if cli.matches.is_some() || cli.seed.is_some() {
        anyhow::bail!("--matches and --seed only apply to simulation configs");
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let mode = match (&config.script, &config.simulation) {
        (Some(script), _) => format!("script of {} inputs", script.len()),
        (None, Some(sim)) => format!("{} simulated matches", sim.matches),
        (None, None) => "nothing".to_string(),
    };

    println!(
        "Loaded configuration '{run_id}': {} {}/{} ({mode})",
        config.game.start_score, config.game.in_mode, config.game.out_mode
    );

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = BenchRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: run skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} matches → {} rows at {}",
        summary.matches_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
