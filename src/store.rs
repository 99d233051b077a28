//! Append-only collection of retained trials.

use serde::{Deserialize, Serialize};

use crate::grid::{Configuration, Mode};

/// One executed trial, as it appears in the raw table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub algorithm: String,
    pub dataset: String,
    pub size: u64,
    pub mode: Mode,
    pub threads: usize,
    pub iteration: usize,
    pub time_ms: f64,
    pub success: bool,
}

impl TrialRecord {
    pub fn new(config: &Configuration<'_>, time_ms: f64, success: bool) -> Self {
        Self {
            algorithm: config.algorithm().to_string(),
            dataset: config.dataset().name.clone(),
            size: config.dataset().size,
            mode: config.mode(),
            threads: config.threads(),
            iteration: config.iteration(),
            time_ms,
            success,
        }
    }
}

/// Retains successful trials for the lifetime of a run. Unsuccessful
/// records are refused, so everything in the store feeds the aggregates.
#[derive(Debug, Default, Clone)]
pub struct ResultStore {
    records: Vec<TrialRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` if it succeeded. Returns whether it was kept.
    pub fn record(&mut self, record: TrialRecord) -> bool {
        if !record.success {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TrialRecord> {
        self.records
    }
}
