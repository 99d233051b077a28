//! Runs one trial as a blocking subprocess.
//!
//! The process boundary sits behind [`Executor`] so sweeps can be driven by
//! scripted output in tests. [`ProcessExecutor`] is the real thing: spawn,
//! wait, capture stdout and stderr. There is no timeout; a hung child blocks
//! the caller until it exits.

use std::process::Command;
use std::time::Instant;

use log::debug;

use crate::command::Invocation;
use crate::error::{HarnessError, Result};
use crate::extract::{extract_duration, Extraction, ReportedDuration};

/// What a finished process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Stdout followed by stderr.
    pub output: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Executes an invocation to completion.
pub trait Executor {
    fn execute(&mut self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// Spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<ProcessOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map_err(|source| HarnessError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            output: text,
        })
    }
}

/// Where a trial's time came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingSource {
    /// Parsed from the executable's own output.
    Reported(ReportedDuration),
    /// Harness wall clock around the whole call, spawn and teardown included.
    WallClock,
}

/// Result of one executed trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub time_ms: f64,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub timing: TimingSource,
}

pub struct TrialRunner<E> {
    executor: E,
}

impl<E: Executor> TrialRunner<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run `invocation` and time it.
    ///
    /// Only a failure to spawn is returned as `Err`; a non-zero exit is an
    /// `Ok` outcome with `success == false`.
    pub fn run(&mut self, invocation: &Invocation) -> Result<TrialOutcome> {
        debug!("running: {}", invocation);

        let start = Instant::now();
        let output = self.executor.execute(invocation)?;
        let wall_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (time_ms, timing) = match extract_duration(&output.output) {
            Extraction::Found(reported) => (reported.as_millis(), TimingSource::Reported(reported)),
            Extraction::NoMatch => {
                debug!(
                    "no reported duration from `{}`, using wall clock {:.3}ms",
                    invocation, wall_ms
                );
                (wall_ms, TimingSource::WallClock)
            }
        };

        Ok(TrialOutcome {
            time_ms,
            success: output.success(),
            exit_code: output.exit_code,
            timing,
        })
    }
}
