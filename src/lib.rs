//! Benchmark sweeps for an external graph-algorithm executable.
//!
//! The harness expands a grid of (algorithm, dataset, mode, threads,
//! iteration) configurations, runs each one as a blocking subprocess,
//! extracts the reported duration from its output and aggregates the
//! retained trials into per-configuration statistics with speedup and
//! efficiency relative to the sequential baseline.

pub mod aggregate;
pub mod command;
pub mod config;
pub mod error;
pub mod extract;
pub mod grid;
pub mod recorder;
pub mod report;
pub mod runner;
pub mod schema;
pub mod store;
pub mod sweep;

pub use error::{HarnessError, Result};
