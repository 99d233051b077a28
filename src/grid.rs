//! Grid enumeration: expands the configured lists into the ordered sequence
//! of trials to run.
//!
//! Dataset discovery is a separate step from enumeration. [`Grid::discover`]
//! drops every dataset whose backing file is missing (with a warning) and the
//! enumerator only ever sees the surviving list.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::{DatasetDescriptor, SweepConfig};

/// Execution mode passed to the executable and recorded in both tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "seq")]
    Sequential,
    #[serde(rename = "par")]
    Parallel,
}

impl Mode {
    /// Token used for `--mode` and in the persisted tables.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Sequential => "seq",
            Mode::Parallel => "par",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One point of the parameter grid.
///
/// Only constructible through [`Configuration::sequential`] and
/// [`Configuration::parallel`], which keep `mode` and `threads` consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration<'a> {
    algorithm: &'a str,
    dataset: &'a DatasetDescriptor,
    mode: Mode,
    threads: usize,
    iteration: usize,
}

impl<'a> Configuration<'a> {
    pub fn sequential(algorithm: &'a str, dataset: &'a DatasetDescriptor, iteration: usize) -> Self {
        Self {
            algorithm,
            dataset,
            mode: Mode::Sequential,
            threads: 1,
            iteration,
        }
    }

    /// Returns `None` for thread counts below 2, which belong to the
    /// sequential baseline.
    pub fn parallel(
        algorithm: &'a str,
        dataset: &'a DatasetDescriptor,
        threads: usize,
        iteration: usize,
    ) -> Option<Self> {
        (threads > 1).then_some(Self {
            algorithm,
            dataset,
            mode: Mode::Parallel,
            threads,
            iteration,
        })
    }

    pub fn algorithm(&self) -> &'a str {
        self.algorithm
    }

    pub fn dataset(&self) -> &'a DatasetDescriptor {
        self.dataset
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// 1-based repetition index within the configuration.
    pub fn iteration(&self) -> usize {
        self.iteration
    }
}

impl fmt::Display for Configuration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/t{}#{}",
            self.algorithm, self.dataset.name, self.mode, self.threads, self.iteration
        )
    }
}

/// Validated inputs for enumeration.
pub struct Grid<'a> {
    algorithms: &'a [String],
    datasets: Vec<&'a DatasetDescriptor>,
    parallel_threads: Vec<usize>,
    iterations: usize,
}

impl<'a> Grid<'a> {
    /// Build a grid from the config, keeping only datasets whose file exists.
    pub fn discover(config: &'a SweepConfig) -> Self {
        let datasets = config
            .datasets
            .iter()
            .filter(|d| {
                let present = d.path.exists();
                if !present {
                    warn!(
                        "dataset '{}' not found at {} (skipping)",
                        d.name,
                        d.path.display()
                    );
                }
                present
            })
            .collect();
        Self::with_datasets(config, datasets)
    }

    /// Build a grid over an already-filtered dataset list.
    pub fn with_datasets(config: &'a SweepConfig, datasets: Vec<&'a DatasetDescriptor>) -> Self {
        Self {
            algorithms: &config.algorithms,
            datasets,
            parallel_threads: config.parallel_thread_counts().collect(),
            iterations: config.iterations,
        }
    }

    pub fn datasets(&self) -> &[&'a DatasetDescriptor] {
        &self.datasets
    }

    /// Expand into the ordered trial sequence: per dataset, per algorithm,
    /// the sequential iterations first, then each parallel thread count's
    /// iterations in declared order.
    pub fn configurations(&self) -> Vec<Configuration<'a>> {
        let per_algorithm = self.iterations * (1 + self.parallel_threads.len());
        let mut out =
            Vec::with_capacity(self.datasets.len() * self.algorithms.len() * per_algorithm);

        for &dataset in &self.datasets {
            for algorithm in self.algorithms {
                for iteration in 1..=self.iterations {
                    out.push(Configuration::sequential(algorithm, dataset, iteration));
                }
                for &threads in &self.parallel_threads {
                    for iteration in 1..=self.iterations {
                        out.extend(Configuration::parallel(algorithm, dataset, threads, iteration));
                    }
                }
            }
        }

        out
    }
}
