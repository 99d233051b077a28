//! Sweep report comparison tool.
//!
//! Compares the summary rows of two JSON run reports and prints the change in
//! mean time per configuration.
//!
//! Usage: `cargo run --bin sweep-compare -- <baseline.json> <candidate.json>`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use graph_sweep::aggregate::AggregateRecord;
use graph_sweep::schema::SweepReport;

#[derive(Parser, Debug)]
#[command(name = "sweep-compare", version, about = "Compare two graph-sweep JSON reports")]
struct Cli {
    baseline: PathBuf,
    candidate: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let baseline = load_report(&cli.baseline);
    let candidate = load_report(&cli.candidate);

    let base_map: HashMap<String, &AggregateRecord> = baseline
        .summary
        .iter()
        .map(|r| (SweepReport::summary_key(r), r))
        .collect();
    let cand_map: HashMap<String, &AggregateRecord> = candidate
        .summary
        .iter()
        .map(|r| (SweepReport::summary_key(r), r))
        .collect();

    eprintln!(
        "Baseline: {} ({})",
        cli.baseline.display(),
        baseline.metadata.timestamp
    );
    eprintln!(
        "Candidate: {} ({})",
        cli.candidate.display(),
        candidate.metadata.timestamp
    );
    eprintln!();

    println!(
        "{:<32} | {:>12} | {:>12} | {:>18}",
        "Configuration", "Base mean", "New mean", "Delta"
    );
    println!("{}", "-".repeat(84));

    let mut matched = 0u32;
    let mut only_cand = 0u32;

    for cand in &candidate.summary {
        let key = SweepReport::summary_key(cand);
        match base_map.get(&key) {
            Some(base) => {
                matched += 1;
                print_comparison(&key, base.mean_ms, cand.mean_ms);
            }
            None => only_cand += 1,
        }
    }

    let only_base = base_map
        .keys()
        .filter(|k| !cand_map.contains_key(*k))
        .count();

    println!("{}", "-".repeat(84));
    println!(
        "Compared: {} | Baseline only: {} | Candidate only: {}",
        matched, only_base, only_cand
    );
}

fn load_report(path: &Path) -> SweepReport {
    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        std::process::exit(1);
    });
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", path.display(), e);
        std::process::exit(1);
    })
}

/// Percentage change from `base` to `cand`, and a hint. Lower time is faster.
fn delta(base_ms: f64, cand_ms: f64) -> (f64, &'static str) {
    let pct = if base_ms > 0.0 {
        (cand_ms - base_ms) / base_ms * 100.0
    } else {
        0.0
    };
    let hint = if pct < -1.0 {
        "faster"
    } else if pct > 1.0 {
        "slower"
    } else {
        "~same"
    };
    (pct, hint)
}

fn print_comparison(name: &str, base_ms: f64, cand_ms: f64) {
    let (pct, hint) = delta(base_ms, cand_ms);
    println!(
        "{:<32} | {:>12} | {:>12} | {:>+.1}% ({})",
        name,
        format_ms(base_ms),
        format_ms(cand_ms),
        pct,
        hint,
    );
}

fn format_ms(ms: f64) -> String {
    if ms < 1.0 {
        format!("{:.2} us", ms * 1_000.0)
    } else if ms < 1_000.0 {
        format!("{:.2} ms", ms)
    } else {
        format!("{:.2} s", ms / 1_000.0)
    }
}
