//! Maps a [`Configuration`] onto the argument list for the executable.

use std::fmt;

use crate::config::SweepConfig;
use crate::grid::{Configuration, Mode};

/// Fixed source vertex for traversal algorithms.
pub const TRAVERSAL_SOURCE: &str = "0";

/// Fixed hyperparameters for the ranking algorithm: damping factor,
/// iteration cap and convergence threshold.
pub const RANKING_ARGS: [&str; 6] = ["--alpha", "0.85", "--iters", "50", "--eps", "1e-10"];

/// Algorithm families that need extra arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmClass {
    Traversal,
    Ranking,
    Plain,
}

impl AlgorithmClass {
    pub fn of(algorithm: &str) -> Self {
        match algorithm {
            "bfs" => AlgorithmClass::Traversal,
            "pagerank" => AlgorithmClass::Ranking,
            _ => AlgorithmClass::Plain,
        }
    }
}

/// A concrete process invocation: program plus full argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Builds invocations for one sweep. Holds only the executable prefix and
/// the discard target, so output depends on the configuration alone.
pub struct CommandBuilder<'a> {
    executable: &'a [String],
    discard_target: &'a str,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(config: &'a SweepConfig) -> Self {
        Self {
            executable: &config.executable,
            discard_target: &config.discard_target,
        }
    }

    /// Trial arguments without the executable prefix.
    pub fn trial_args(&self, config: &Configuration<'_>) -> Vec<String> {
        let mut args = vec![
            config.algorithm().to_string(),
            "--input".to_string(),
            config.dataset().path.display().to_string(),
            "--mode".to_string(),
            config.mode().label().to_string(),
            "--out".to_string(),
            self.discard_target.to_string(),
        ];

        match AlgorithmClass::of(config.algorithm()) {
            AlgorithmClass::Traversal => {
                args.push("--source".to_string());
                args.push(TRAVERSAL_SOURCE.to_string());
            }
            AlgorithmClass::Ranking => {
                args.extend(RANKING_ARGS.iter().map(|s| s.to_string()));
            }
            AlgorithmClass::Plain => {}
        }

        if config.mode() == Mode::Parallel {
            args.push("--threads".to_string());
            args.push(config.threads().to_string());
        }

        args
    }

    pub fn build(&self, config: &Configuration<'_>) -> Invocation {
        let (program, prefix) = match self.executable.split_first() {
            Some((program, prefix)) => (program.clone(), prefix),
            None => (String::new(), &[][..]),
        };
        let mut args = prefix.to_vec();
        args.extend(self.trial_args(config));
        Invocation { program, args }
    }
}
