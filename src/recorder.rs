//! Writes a [`SweepReport`] to `<output_dir>/sweep-<timestamp>-<commit>.json`.
//!
//! Metadata capture is best-effort: without git or `/proc` the fields are
//! left empty rather than failing the run.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use log::info;

use crate::aggregate::AggregateRecord;
use crate::config::SweepConfig;
use crate::error::{HarnessError, Result};
use crate::schema::{HardwareInfo, RunMetadata, SweepParameters, SweepReport, SCHEMA_VERSION};
use crate::store::TrialRecord;

pub struct ResultRecorder {
    metadata: RunMetadata,
    sweep: SweepParameters,
}

impl ResultRecorder {
    /// Capture run metadata now. `datasets` are the display names that
    /// survived discovery.
    pub fn new(config: &SweepConfig, datasets: Vec<String>) -> Self {
        Self {
            metadata: RunMetadata {
                timestamp: iso8601_now(),
                git_commit: git(&["rev-parse", "--short", "HEAD"]),
                git_branch: git(&["rev-parse", "--abbrev-ref", "HEAD"]),
                git_dirty: git(&["status", "--porcelain"]).map(|s| !s.is_empty()),
                harness_version: env!("CARGO_PKG_VERSION").to_string(),
                hardware: capture_hardware(),
            },
            sweep: SweepParameters {
                executable: config.executable.clone(),
                algorithms: config.algorithms.clone(),
                datasets,
                thread_counts: config.thread_counts.clone(),
                iterations: config.iterations,
            },
        }
    }

    pub fn report(&self, trials: &[TrialRecord], summary: &[AggregateRecord]) -> SweepReport {
        SweepReport {
            schema_version: SCHEMA_VERSION,
            metadata: self.metadata.clone(),
            sweep: self.sweep.clone(),
            trials: trials.to_vec(),
            summary: summary.to_vec(),
        }
    }

    /// File name: `sweep-<timestamp>-<commit>.json`, colons replaced.
    pub fn file_name(&self) -> String {
        let commit = self.metadata.git_commit.as_deref().unwrap_or("unknown");
        let ts = self.metadata.timestamp.replace(':', "-");
        format!("sweep-{}-{}.json", ts, commit)
    }

    pub fn save(
        &self,
        dir: &Path,
        trials: &[TrialRecord],
        summary: &[AggregateRecord],
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|source| HarnessError::Persist {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(self.file_name());

        let json = serde_json::to_string_pretty(&self.report(trials, summary))?;
        std::fs::write(&path, json).map_err(|source| HarnessError::Persist {
            path: path.clone(),
            source,
        })?;

        info!("run report saved to {}", path.display());
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Metadata capture helpers
// ---------------------------------------------------------------------------

fn iso8601_now() -> String {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_utc(secs)
}

fn format_utc(secs: u64) -> String {
    let (year, month, day) = civil_from_days(secs / 86_400);
    let rem = secs % 86_400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Days since the Unix epoch to a proleptic Gregorian (year, month, day),
/// per Howard Hinnant's `civil_from_days`.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

/// Trimmed stdout of a successful `git` call.
fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn read_cpu_model() -> String {
    std::fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|info| {
            info.lines()
                .find(|l| l.starts_with("model name"))
                .and_then(|l| l.split_once(':'))
                .map(|(_, model)| model.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn read_total_ram_gb() -> u64 {
    std::fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|info| {
            info.lines()
                .find(|l| l.starts_with("MemTotal:"))
                .and_then(|l| l.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok())
        })
        .map(|kb| kb / (1024 * 1024))
        .unwrap_or(0)
}

fn capture_hardware() -> HardwareInfo {
    HardwareInfo {
        cpu: read_cpu_model(),
        cores: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(0),
        ram_gb: read_total_ram_gb(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
    }
}
