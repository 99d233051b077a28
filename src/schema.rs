//! JSON run report types.
//!
//! A report bundles one sweep's retained trials and summary rows with enough
//! metadata to tell runs apart later (`sweep-compare` reads two of these).

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateRecord;
use crate::store::TrialRecord;

pub const SCHEMA_VERSION: u32 = 1;

/// Top-level report written to a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    pub metadata: RunMetadata,
    /// Parameters the sweep was run with.
    pub sweep: SweepParameters,
    pub trials: Vec<TrialRecord>,
    pub summary: Vec<AggregateRecord>,
}

/// Metadata captured at the start of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// ISO 8601 timestamp of the run start.
    pub timestamp: String,
    /// Short git commit hash (absent outside a git checkout).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    /// Whether the working tree had uncommitted changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dirty: Option<bool>,
    /// Version of this harness.
    pub harness_version: String,
    pub hardware: HardwareInfo,
}

/// Hardware information for reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub cpu: String,
    /// Number of logical cores.
    pub cores: usize,
    pub ram_gb: u64,
    pub os: String,
    pub arch: String,
}

/// The grid a report was produced from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepParameters {
    pub executable: Vec<String>,
    pub algorithms: Vec<String>,
    /// Display names of the datasets that were actually swept.
    pub datasets: Vec<String>,
    pub thread_counts: Vec<usize>,
    pub iterations: usize,
}

impl SweepReport {
    /// Summary rows keyed as `algorithm/dataset/mode/tN`.
    pub fn summary_key(row: &AggregateRecord) -> String {
        format!(
            "{}/{}/{}/t{}",
            row.algorithm, row.dataset, row.mode, row.threads
        )
    }
}
