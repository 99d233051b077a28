//! Sweep driver.
//!
//! Runs every (algorithm, dataset, mode, threads) configuration against the
//! graph executable, writes the raw and summary tables, and prints the
//! summary plus the top speedups.
//!
//! Run:     `cargo run --release --bin graph-sweep`
//! Config:  `cargo run --release --bin graph-sweep -- --config sweep.json`
//! Quick:   `cargo run --release --bin graph-sweep -- --iterations 1 --threads 2,4 -q`
//! JSON:    `cargo run --release --bin graph-sweep -- --json`

use std::path::PathBuf;

use clap::Parser;
use graph_sweep::config::SweepConfig;
use graph_sweep::recorder::ResultRecorder;
use graph_sweep::report::{print_summary, print_top_speedups, save_tables, TOP_N};
use graph_sweep::runner::ProcessExecutor;
use graph_sweep::sweep::Sweep;

#[derive(Parser, Debug)]
#[command(name = "graph-sweep", version, about = "Sequential vs parallel sweep over a graph-algorithm executable")]
struct Cli {
    /// JSON file overriding the compiled-in sweep configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repetitions per configuration
    #[arg(long)]
    iterations: Option<usize>,

    /// Thread counts for the parallel sweep, e.g. `2,4,8`
    #[arg(long, value_delimiter = ',')]
    threads: Option<Vec<usize>>,

    /// Algorithms (executable subcommands) to benchmark, e.g. `bfs,wcc`
    #[arg(long, value_delimiter = ',')]
    algorithms: Option<Vec<String>>,

    /// Directory for the result tables
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also save a JSON run report with run metadata
    #[arg(long)]
    json: bool,

    /// Suppress per-trial progress
    #[arg(short, long)]
    quiet: bool,
}

fn build_config(cli: &Cli) -> graph_sweep::Result<SweepConfig> {
    let mut config = match &cli.config {
        Some(path) => SweepConfig::from_json_file(path)?,
        None => SweepConfig::default(),
    };
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }
    if let Some(threads) = &cli.threads {
        config.thread_counts = threads.clone();
    }
    if let Some(algorithms) = &cli.algorithms {
        config.algorithms = algorithms.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if !cli.quiet {
        eprintln!("Starting benchmark...");
        eprintln!("   Algorithms: {:?}", config.algorithms);
        eprintln!("   Thread configs: {:?}", config.thread_counts);
        eprintln!("   Iterations: {}", config.iterations);
    }

    let mut sweep = Sweep::new(&config, ProcessExecutor).quiet(cli.quiet);
    let outcome = sweep.run();

    if !cli.quiet {
        eprintln!(
            "\nTrials: {} attempted, {} retained, {} failed",
            outcome.attempted,
            outcome.store.len(),
            outcome.failed
        );
    }

    let trials = outcome.store.records();
    match save_tables(&config, trials, &outcome.summary) {
        Ok((raw, summary)) => {
            eprintln!("Raw results saved to: {}", raw.display());
            eprintln!("Summary saved to: {}", summary.display());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    if cli.json {
        let recorder = ResultRecorder::new(&config, outcome.datasets.clone());
        if let Err(e) = recorder.save(&config.output_dir, trials, &outcome.summary) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    print_summary(&outcome.summary);
    print_top_speedups(&outcome.summary, TOP_N);

    eprintln!("\nBenchmark complete!");
}
