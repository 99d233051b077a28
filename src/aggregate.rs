//! Two-pass aggregation of retained trials.
//!
//! Pass one groups trials by (algorithm, dataset, size, mode, threads) and
//! computes raw timing statistics. Pass two needs every group to exist: it
//! looks up each group's sequential baseline and derives speedup and
//! efficiency.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::grid::Mode;
use crate::store::TrialRecord;

/// Statistics over one group's times, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStats {
    pub mean: f64,
    /// Sample standard deviation (N-1). `None` for a single sample.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl TimeStats {
    /// Returns `None` for an empty slice.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std = (samples.len() > 1).then(|| {
            let sq: f64 = samples.iter().map(|t| (t - mean) * (t - mean)).sum();
            (sq / (n - 1.0)).sqrt()
        });
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            std,
            min,
            max,
        })
    }
}

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub algorithm: String,
    pub dataset: String,
    pub size: u64,
    pub mode: Mode,
    pub threads: usize,
    pub mean_ms: f64,
    pub std_ms: Option<f64>,
    pub min_ms: f64,
    pub max_ms: f64,
    pub speedup: f64,
    pub efficiency: f64,
}

impl AggregateRecord {
    pub fn is_baseline(&self) -> bool {
        self.mode == Mode::Sequential
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey<'a> {
    algorithm: &'a str,
    dataset: &'a str,
    size: u64,
    mode: Mode,
    threads: usize,
}

impl<'a> GroupKey<'a> {
    fn of(record: &'a TrialRecord) -> Self {
        Self {
            algorithm: &record.algorithm,
            dataset: &record.dataset,
            size: record.size,
            mode: record.mode,
            threads: record.threads,
        }
    }
}

/// First pass: one record per non-empty group, ordered by grouping key.
///
/// Speedup and efficiency are left at 1.0 and 1/threads (a baseline-less
/// placeholder) until [`apply_speedup`] runs.
pub fn aggregate(records: &[TrialRecord]) -> Vec<AggregateRecord> {
    let mut groups: BTreeMap<GroupKey<'_>, Vec<f64>> = BTreeMap::new();
    for record in records {
        groups.entry(GroupKey::of(record)).or_default().push(record.time_ms);
    }

    groups
        .into_iter()
        .filter_map(|(key, times)| {
            let stats = TimeStats::from_samples(&times)?;
            Some(AggregateRecord {
                algorithm: key.algorithm.to_string(),
                dataset: key.dataset.to_string(),
                size: key.size,
                mode: key.mode,
                threads: key.threads,
                mean_ms: stats.mean,
                std_ms: stats.std,
                min_ms: stats.min,
                max_ms: stats.max,
                speedup: 1.0,
                efficiency: 1.0 / key.threads as f64,
            })
        })
        .collect()
}

/// Second pass: speedup against the sequential aggregate for the same
/// (algorithm, dataset), or 1.0 when there is none. Efficiency is speedup
/// divided by thread count.
pub fn apply_speedup(aggregates: &mut [AggregateRecord]) {
    let mut baselines: HashMap<(String, String), f64> = HashMap::new();
    for record in aggregates.iter().filter(|r| r.is_baseline()) {
        baselines
            .entry((record.algorithm.clone(), record.dataset.clone()))
            .or_insert(record.mean_ms);
    }

    for record in aggregates.iter_mut() {
        let baseline = baselines
            .get(&(record.algorithm.clone(), record.dataset.clone()))
            .copied();
        record.speedup = match baseline {
            Some(base) => base / record.mean_ms,
            None => 1.0,
        };
        record.efficiency = record.speedup / record.threads as f64;
    }
}

/// Both passes.
pub fn summarize(records: &[TrialRecord]) -> Vec<AggregateRecord> {
    let mut aggregates = aggregate(records);
    apply_speedup(&mut aggregates);
    aggregates
}
