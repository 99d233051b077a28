//! The sweep loop: enumerate, run each trial in turn, retain successes,
//! aggregate.
//!
//! Trials run strictly one after another on the calling thread. The only
//! parallelism under measurement is inside the executable, controlled by
//! `--threads`. A failed trial is logged and skipped; the loop always
//! attempts every remaining configuration.

use std::io::Write;

use log::warn;

use crate::aggregate::{summarize, AggregateRecord};
use crate::command::CommandBuilder;
use crate::config::{DatasetDescriptor, SweepConfig};
use crate::grid::{Configuration, Grid};
use crate::runner::{Executor, TimingSource, TrialRunner};
use crate::store::{ResultStore, TrialRecord};

/// Everything a finished sweep produced.
#[derive(Debug)]
pub struct SweepOutcome {
    pub store: ResultStore,
    pub summary: Vec<AggregateRecord>,
    /// Display names of the datasets that were swept.
    pub datasets: Vec<String>,
    pub attempted: usize,
    pub failed: usize,
}

pub struct Sweep<'a, E> {
    config: &'a SweepConfig,
    runner: TrialRunner<E>,
    quiet: bool,
}

impl<'a, E: Executor> Sweep<'a, E> {
    pub fn new(config: &'a SweepConfig, executor: E) -> Self {
        Self {
            config,
            runner: TrialRunner::new(executor),
            quiet: false,
        }
    }

    /// Suppress per-trial progress on stderr. Log output is unaffected.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn executor(&self) -> &E {
        self.runner.executor()
    }

    /// Discover datasets on disk, then run the full grid.
    pub fn run(&mut self) -> SweepOutcome {
        let grid = Grid::discover(self.config);
        self.run_grid(&grid)
    }

    pub fn run_grid(&mut self, grid: &Grid<'_>) -> SweepOutcome {
        let builder = CommandBuilder::new(self.config);
        let mut store = ResultStore::new();
        let mut attempted = 0;
        let mut failed = 0;
        let mut current: Option<(&DatasetDescriptor, &str)> = None;

        for config in grid.configurations() {
            self.print_banners(&mut current, &config);

            attempted += 1;
            let invocation = builder.build(&config);
            self.progress_start(&config);

            match self.runner.run(&invocation) {
                Ok(outcome) if outcome.success => {
                    self.progress_done(outcome.time_ms, outcome.timing);
                    store.record(TrialRecord::new(&config, outcome.time_ms, true));
                }
                Ok(outcome) => {
                    failed += 1;
                    self.progress_failed();
                    warn!(
                        "trial {} failed with exit code {}",
                        config,
                        outcome
                            .exit_code
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "none (signal)".to_string())
                    );
                }
                Err(e) => {
                    failed += 1;
                    self.progress_failed();
                    warn!("trial {} failed: {}", config, e);
                }
            }
        }

        let summary = summarize(store.records());
        SweepOutcome {
            store,
            summary,
            datasets: grid.datasets().iter().map(|d| d.name.clone()).collect(),
            attempted,
            failed,
        }
    }

    // -----------------------------------------------------------------------
    // Progress output
    // -----------------------------------------------------------------------

    fn print_banners<'c>(
        &self,
        current: &mut Option<(&'c DatasetDescriptor, &'c str)>,
        config: &Configuration<'c>,
    ) {
        let dataset_changed = current.map_or(true, |(d, _)| !std::ptr::eq(d, config.dataset()));
        let algorithm_changed =
            dataset_changed || current.map_or(true, |(_, a)| a != config.algorithm());
        *current = Some((config.dataset(), config.algorithm()));

        if self.quiet {
            return;
        }
        if dataset_changed {
            eprintln!(
                "\nBenchmarking: {} (size: {})",
                config.dataset().name,
                config.dataset().size
            );
            eprintln!("{}", "=".repeat(60));
        }
        if algorithm_changed {
            eprintln!("\n  Algorithm: {}", config.algorithm());
            eprintln!("  {}", "-".repeat(50));
        }
    }

    fn progress_start(&self, config: &Configuration<'_>) {
        if self.quiet {
            return;
        }
        if config.threads() > 1 {
            eprint!(
                "    {} (t={}), iter {}... ",
                config.mode(),
                config.threads(),
                config.iteration()
            );
        } else {
            eprint!("    {}, iter {}... ", config.mode(), config.iteration());
        }
        let _ = std::io::stderr().flush();
    }

    fn progress_done(&self, time_ms: f64, timing: TimingSource) {
        if self.quiet {
            return;
        }
        match timing {
            TimingSource::Reported(_) => eprintln!("{:.2}ms", time_ms),
            TimingSource::WallClock => eprintln!("{:.2}ms (wall clock)", time_ms),
        }
    }

    fn progress_failed(&self) {
        if !self.quiet {
            eprintln!("Failed");
        }
    }
}
