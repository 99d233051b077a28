//! Startup configuration: which algorithms, datasets and thread counts to
//! sweep, and how to reach the executable under test.
//!
//! A [`SweepConfig`] is built once (compiled-in defaults, optionally
//! overridden by a JSON file and CLI flags), validated, and then passed by
//! reference to everything downstream.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_ITERATIONS: usize = 3;
pub const DEFAULT_THREAD_COUNTS: [usize; 4] = [1, 2, 4, 8];
pub const DEFAULT_ALGORITHMS: [&str; 3] = ["bfs", "wcc", "pagerank"];
pub const DEFAULT_DISCARD_TARGET: &str = "/dev/null";
pub const DEFAULT_RAW_FILE: &str = "benchmark_results.csv";
pub const DEFAULT_SUMMARY_FILE: &str = "benchmark_summary.csv";

fn default_executable() -> Vec<String> {
    ["cargo", "run", "--release", "--"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_datasets() -> Vec<DatasetDescriptor> {
    vec![
        DatasetDescriptor::new("test_graphs/random_m.txt", 100_000, "small"),
        DatasetDescriptor::new("test_graphs/random_l.txt", 1_000_000, "large"),
    ]
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An input graph file together with the labels it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub path: PathBuf,
    /// Declared size label (vertex/edge count), reported as-is.
    pub size: u64,
    /// Display name used in tables and as part of the grouping key.
    pub name: String,
}

impl DatasetDescriptor {
    pub fn new(path: impl Into<PathBuf>, size: u64, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size,
            name: name.into(),
        }
    }
}

/// Everything a sweep needs to know before it starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Program plus leading arguments; the per-trial arguments are appended.
    pub executable: Vec<String>,
    pub algorithms: Vec<String>,
    pub datasets: Vec<DatasetDescriptor>,
    /// Parallel thread counts to sample. A value of 1 is implied by the
    /// sequential baseline and skipped by the parallel sweep.
    pub thread_counts: Vec<usize>,
    pub iterations: usize,
    /// Passed as `--out`; the executable's own result file is not kept.
    pub discard_target: String,
    pub output_dir: PathBuf,
    pub raw_file: String,
    pub summary_file: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            algorithms: DEFAULT_ALGORITHMS.iter().map(|s| s.to_string()).collect(),
            datasets: default_datasets(),
            thread_counts: DEFAULT_THREAD_COUNTS.to_vec(),
            iterations: DEFAULT_ITERATIONS,
            discard_target: DEFAULT_DISCARD_TARGET.to_string(),
            output_dir: PathBuf::from("."),
            raw_file: DEFAULT_RAW_FILE.to_string(),
            summary_file: DEFAULT_SUMMARY_FILE.to_string(),
        }
    }
}

impl SweepConfig {
    /// Load a config from a JSON file. Fields absent from the file keep
    /// their compiled-in defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Thread counts for the parallel sweep, in declared order, excluding 1.
    pub fn parallel_thread_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.thread_counts.iter().copied().filter(|&t| t > 1)
    }

    pub fn raw_path(&self) -> PathBuf {
        self.output_dir.join(&self.raw_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file)
    }

    /// Reject configurations that would produce a malformed grid.
    pub fn validate(&self) -> Result<()> {
        if self.executable.is_empty() || self.executable[0].trim().is_empty() {
            return Err(HarnessError::InvalidConfig(
                "executable must name a program".into(),
            ));
        }
        if self.algorithms.is_empty() {
            return Err(HarnessError::InvalidConfig(
                "at least one algorithm is required".into(),
            ));
        }
        if self.iterations == 0 {
            return Err(HarnessError::InvalidConfig(
                "iterations must be at least 1".into(),
            ));
        }
        if self.thread_counts.contains(&0) {
            return Err(HarnessError::InvalidConfig(
                "thread counts must be positive".into(),
            ));
        }

        let mut seen = HashSet::new();
        for &t in &self.thread_counts {
            if !seen.insert(t) {
                return Err(HarnessError::InvalidConfig(format!(
                    "duplicate thread count {}",
                    t
                )));
            }
        }

        let mut names = HashSet::new();
        for dataset in &self.datasets {
            if !names.insert(dataset.name.as_str()) {
                return Err(HarnessError::InvalidConfig(format!(
                    "duplicate dataset name '{}'",
                    dataset.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_compiled_in_sweep() {
        let config = SweepConfig::default();
        assert_eq!(config.algorithms, vec!["bfs", "wcc", "pagerank"]);
        assert_eq!(config.thread_counts, vec![1, 2, 4, 8]);
        assert_eq!(config.iterations, 3);
        assert_eq!(config.datasets.len(), 2);
        assert_eq!(config.datasets[0].name, "small");
        assert_eq!(config.datasets[0].size, 100_000);
        assert_eq!(config.executable[0], "cargo");
        config.validate().unwrap();
    }

    #[test]
    fn parallel_counts_skip_one() {
        let config = SweepConfig::default();
        let counts: Vec<usize> = config.parallel_thread_counts().collect();
        assert_eq!(counts, vec![2, 4, 8]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SweepConfig =
            serde_json::from_str(r#"{"iterations": 5, "algorithms": ["wcc"]}"#).unwrap();
        assert_eq!(config.iterations, 5);
        assert_eq!(config.algorithms, vec!["wcc"]);
        assert_eq!(config.thread_counts, vec![1, 2, 4, 8]);
        assert_eq!(config.raw_file, DEFAULT_RAW_FILE);
    }

    #[test]
    fn validate_rejects_zero_iterations() {
        let config = SweepConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HarnessError::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_and_duplicate_threads() {
        let zero = SweepConfig {
            thread_counts: vec![0, 2],
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let dup = SweepConfig {
            thread_counts: vec![2, 4, 2],
            ..Default::default()
        };
        assert!(dup.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_dataset_names() {
        let config = SweepConfig {
            datasets: vec![
                DatasetDescriptor::new("a.txt", 10, "g"),
                DatasetDescriptor::new("b.txt", 20, "g"),
            ],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_executable() {
        let config = SweepConfig {
            executable: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_is_read_error() {
        let err = SweepConfig::from_json_file(Path::new("/nonexistent/sweep.json")).unwrap_err();
        assert!(matches!(err, HarnessError::ConfigRead { .. }));
    }
}
