//! Parses the duration the executable reports about itself.
//!
//! The executable prints `finished in: <number><unit>` somewhere in stdout or
//! stderr. The first such occurrence is taken and normalised to milliseconds.
//! When the phrase is absent the caller falls back to its own wall-clock
//! measurement.

use std::sync::OnceLock;

use regex::Regex;

/// Units the executable may report in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
    Microseconds,
}

impl TimeUnit {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "s" => Some(TimeUnit::Seconds),
            "ms" => Some(TimeUnit::Milliseconds),
            "µs" => Some(TimeUnit::Microseconds),
            _ => None,
        }
    }
}

/// A duration exactly as reported, before normalisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportedDuration {
    pub value: f64,
    pub unit: TimeUnit,
}

impl ReportedDuration {
    pub fn as_millis(&self) -> f64 {
        match self.unit {
            TimeUnit::Seconds => self.value * 1000.0,
            TimeUnit::Milliseconds => self.value,
            TimeUnit::Microseconds => self.value / 1000.0,
        }
    }
}

/// Outcome of scanning captured output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extraction {
    Found(ReportedDuration),
    NoMatch,
}

impl Extraction {
    pub fn millis(&self) -> Option<f64> {
        match self {
            Extraction::Found(d) => Some(d.as_millis()),
            Extraction::NoMatch => None,
        }
    }
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Alternation order matters: "ms" and "µs" must be tried before "s".
    PATTERN.get_or_init(|| {
        Regex::new(r"finished in: ([\d.]+)(ms|µs|s)").expect("duration pattern is valid")
    })
}

/// Find the first reported duration in `output`.
///
/// A match whose number does not parse (e.g. `1.2.3ms`) counts as no match.
pub fn extract_duration(output: &str) -> Extraction {
    let Some(caps) = pattern().captures(output) else {
        return Extraction::NoMatch;
    };
    let value = caps[1].parse::<f64>().ok();
    let unit = TimeUnit::from_suffix(&caps[2]);
    match (value, unit) {
        (Some(value), Some(unit)) => Extraction::Found(ReportedDuration { value, unit }),
        _ => Extraction::NoMatch,
    }
}
