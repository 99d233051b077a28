//! Persisted tables and console output.
//!
//! Two CSV artifacts are written once, at the end of a run:
//! - raw: `Algorithm,Dataset,Size,Mode,Threads,Iteration,Time_ms`
//! - summary: `Algorithm,Dataset,Size,Mode,Threads,Mean_ms,Std_ms,Min_ms,Max_ms,Speedup,Efficiency`
//!
//! An undefined standard deviation is written as an empty cell.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::aggregate::AggregateRecord;
use crate::config::SweepConfig;
use crate::error::{HarnessError, Result};
use crate::store::TrialRecord;

/// Rows shown in the top-speedup table.
pub const TOP_N: usize = 10;

pub const RAW_HEADER: &str = "Algorithm,Dataset,Size,Mode,Threads,Iteration,Time_ms";
pub const SUMMARY_HEADER: &str =
    "Algorithm,Dataset,Size,Mode,Threads,Mean_ms,Std_ms,Min_ms,Max_ms,Speedup,Efficiency";

// ---------------------------------------------------------------------------
// CSV artifacts
// ---------------------------------------------------------------------------

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn write_raw_table<W: Write>(out: &mut W, records: &[TrialRecord]) -> io::Result<()> {
    writeln!(out, "{}", RAW_HEADER)?;
    for r in records {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            csv_field(&r.algorithm),
            csv_field(&r.dataset),
            r.size,
            r.mode,
            r.threads,
            r.iteration,
            r.time_ms,
        )?;
    }
    Ok(())
}

pub fn write_summary_table<W: Write>(out: &mut W, summary: &[AggregateRecord]) -> io::Result<()> {
    writeln!(out, "{}", SUMMARY_HEADER)?;
    for r in summary {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{}",
            csv_field(&r.algorithm),
            csv_field(&r.dataset),
            r.size,
            r.mode,
            r.threads,
            r.mean_ms,
            opt_cell(r.std_ms),
            r.min_ms,
            r.max_ms,
            r.speedup,
            r.efficiency,
        )?;
    }
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let persist = |source| HarnessError::Persist {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(persist)?;
    let mut out = BufWriter::new(file);
    write(&mut out).map_err(persist)?;
    out.flush().map_err(persist)
}

/// Write both tables into the configured output directory, creating it if
/// needed. Returns the (raw, summary) paths.
pub fn save_tables(
    config: &SweepConfig,
    trials: &[TrialRecord],
    summary: &[AggregateRecord],
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(&config.output_dir).map_err(|source| HarnessError::Persist {
        path: config.output_dir.clone(),
        source,
    })?;

    let raw_path = config.raw_path();
    write_file(&raw_path, |out| write_raw_table(out, trials))?;

    let summary_path = config.summary_path();
    write_file(&summary_path, |out| write_summary_table(out, summary))?;

    Ok((raw_path, summary_path))
}

// ---------------------------------------------------------------------------
// Console output
// ---------------------------------------------------------------------------

fn fmt_std(std: Option<f64>) -> String {
    match std {
        Some(s) => format!("{:.3}", s),
        None => "NaN".to_string(),
    }
}

/// Parallel rows with the highest speedup, best first.
pub fn top_speedups(summary: &[AggregateRecord], n: usize) -> Vec<&AggregateRecord> {
    let mut parallel: Vec<&AggregateRecord> = summary.iter().filter(|r| r.threads > 1).collect();
    parallel.sort_by(|a, b| b.speedup.total_cmp(&a.speedup));
    parallel.truncate(n);
    parallel
}

pub fn print_summary(summary: &[AggregateRecord]) {
    println!("\n{}", "=".repeat(100));
    println!("BENCHMARK SUMMARY");
    println!("{}", "=".repeat(100));
    println!(
        "{:<10} {:<10} {:>10} {:<4} {:>7} {:>11} {:>9} {:>11} {:>11} {:>8} {:>10}",
        "Algorithm",
        "Dataset",
        "Size",
        "Mode",
        "Threads",
        "Mean_ms",
        "Std_ms",
        "Min_ms",
        "Max_ms",
        "Speedup",
        "Efficiency"
    );
    println!("{}", "-".repeat(100));
    for r in summary {
        println!(
            "{:<10} {:<10} {:>10} {:<4} {:>7} {:>11.3} {:>9} {:>11.3} {:>11.3} {:>8.3} {:>10.3}",
            r.algorithm,
            r.dataset,
            r.size,
            r.mode,
            r.threads,
            r.mean_ms,
            fmt_std(r.std_ms),
            r.min_ms,
            r.max_ms,
            r.speedup,
            r.efficiency,
        );
    }
}

pub fn print_top_speedups(summary: &[AggregateRecord], n: usize) {
    println!("\n{}", "=".repeat(100));
    println!("TOP SPEEDUPS");
    println!("{}", "=".repeat(100));
    println!(
        "{:<10} {:<10} {:>7} {:>11} {:>8}",
        "Algorithm", "Dataset", "Threads", "Mean_ms", "Speedup"
    );
    for r in top_speedups(summary, n) {
        println!(
            "{:<10} {:<10} {:>7} {:>11.3} {:>8.3}",
            r.algorithm, r.dataset, r.threads, r.mean_ms, r.speedup
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Mode;

    fn row(algorithm: &str, threads: usize, speedup: f64) -> AggregateRecord {
        AggregateRecord {
            algorithm: algorithm.to_string(),
            dataset: "small".to_string(),
            size: 100_000,
            mode: if threads > 1 { Mode::Parallel } else { Mode::Sequential },
            threads,
            mean_ms: 10.0,
            std_ms: None,
            min_ms: 10.0,
            max_ms: 10.0,
            speedup,
            efficiency: speedup / threads as f64,
        }
    }

    #[test]
    fn raw_table_layout() {
        let records = vec![TrialRecord {
            algorithm: "bfs".into(),
            dataset: "small".into(),
            size: 100_000,
            mode: Mode::Parallel,
            threads: 4,
            iteration: 2,
            time_ms: 12.5,
            success: true,
        }];
        let mut buf = Vec::new();
        write_raw_table(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Algorithm,Dataset,Size,Mode,Threads,Iteration,Time_ms\nbfs,small,100000,par,4,2,12.5\n"
        );
    }

    #[test]
    fn summary_table_leaves_undefined_std_empty() {
        let mut buf = Vec::new();
        write_summary_table(&mut buf, &[row("wcc", 1, 1.0)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, "wcc,small,100000,seq,1,10,,10,10,1,1");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn top_speedups_excludes_sequential_and_sorts() {
        let summary: Vec<AggregateRecord> = vec![
            row("bfs", 1, 1.0),
            row("bfs", 2, 1.8),
            row("bfs", 4, 3.1),
            row("wcc", 8, 2.4),
        ];
        let top = top_speedups(&summary, TOP_N);
        let speedups: Vec<f64> = top.iter().map(|r| r.speedup).collect();
        assert_eq!(speedups, vec![3.1, 2.4, 1.8]);
    }

    #[test]
    fn top_speedups_truncates() {
        let summary: Vec<AggregateRecord> = (2..20).map(|t| row("bfs", t, t as f64)).collect();
        let top = top_speedups(&summary, TOP_N);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].threads, 19);
        assert_eq!(top[9].threads, 10);
    }
}
