//! Shared fixtures: scratch dataset files and a scripted executor that
//! stands in for the graph binary.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::Path;

use graph_sweep::command::Invocation;
use graph_sweep::config::{DatasetDescriptor, SweepConfig};
use graph_sweep::runner::{Executor, ProcessOutput};
use graph_sweep::{HarnessError, Result};
use tempfile::TempDir;

// =============================================================================
// Scratch datasets
// =============================================================================

pub struct Fixture {
    pub dir: TempDir,
    pub config: SweepConfig,
}

/// A config over `datasets` given as (name, size, create file). Each dataset
/// lives at `<tempdir>/<name>.txt`; output goes to `<tempdir>/out`.
pub fn fixture(datasets: &[(&str, u64, bool)]) -> Fixture {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let descriptors = datasets
        .iter()
        .map(|&(name, size, create)| {
            let path = dir.path().join(format!("{}.txt", name));
            if create {
                std::fs::write(&path, "0 1\n1 2\n").expect("failed to write dataset");
            }
            DatasetDescriptor::new(path, size, name)
        })
        .collect();

    let config = SweepConfig {
        executable: vec!["graphs".into()],
        algorithms: vec!["bfs".into()],
        datasets: descriptors,
        thread_counts: vec![1, 2],
        iterations: 3,
        output_dir: dir.path().join("out"),
        ..Default::default()
    };
    Fixture { dir, config }
}

// =============================================================================
// Scripted executor
// =============================================================================

#[derive(Clone)]
pub enum Reply {
    /// Exit 0 with this output.
    Ok(String),
    /// Exit with this code and output.
    Exit(i32, String),
    /// The process could not be started.
    SpawnError,
}

impl Reply {
    pub fn ms(ms: f64) -> Self {
        Reply::Ok(format!("Graph loaded\nfinished in: {}ms\n", ms))
    }
}

/// Replies are queued per (algorithm, dataset file stem, threads). Anything
/// without a queued reply gets `default`.
pub struct ScriptedExecutor {
    replies: HashMap<String, VecDeque<Reply>>,
    default: Reply,
    pub calls: Vec<Invocation>,
}

fn key(algorithm: &str, dataset: &str, threads: usize) -> String {
    format!("{}@{}#{}", algorithm, dataset, threads)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            default: Reply::ms(10.0),
            calls: Vec::new(),
        }
    }

    pub fn with_default(mut self, reply: Reply) -> Self {
        self.default = reply;
        self
    }

    pub fn script(
        mut self,
        algorithm: &str,
        dataset: &str,
        threads: usize,
        replies: impl IntoIterator<Item = Reply>,
    ) -> Self {
        self.replies
            .entry(key(algorithm, dataset, threads))
            .or_default()
            .extend(replies);
        self
    }

    /// Calls whose `--input` points at a file with this stem.
    pub fn calls_for(&self, dataset: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| {
                flag_value(&c.args, "--input")
                    .and_then(|p| Path::new(p).file_stem())
                    .map_or(false, |s| s == dataset)
            })
            .count()
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<ProcessOutput> {
        self.calls.push(invocation.clone());

        let args = &invocation.args;
        let algorithm = args.first().map(|s| s.as_str()).unwrap_or_default();
        let dataset = flag_value(args, "--input")
            .and_then(|p| Path::new(p).file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let threads = flag_value(args, "--threads")
            .and_then(|t| t.parse().ok())
            .unwrap_or(1);

        let reply = self
            .replies
            .get_mut(&key(algorithm, dataset, threads))
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| self.default.clone());

        match reply {
            Reply::Ok(output) => Ok(ProcessOutput {
                exit_code: Some(0),
                output,
            }),
            Reply::Exit(code, output) => Ok(ProcessOutput {
                exit_code: Some(code),
                output,
            }),
            Reply::SpawnError => Err(HarnessError::Spawn {
                program: invocation.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted spawn failure"),
            }),
        }
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}
