//! Simulated-annealing boundary: hand an instance to an external annealer
//! binary and read back its energy spectrum.
//!
//! The submission protocol is narrow by design: render the graph to a
//! temporary instance file, invoke the solver with `-l <file> -s <sweeps>
//! -r <repetitions>`, parse stdout. The temp file is owned by a
//! [`tempfile::NamedTempFile`], so it is removed on every exit path,
//! including errors.
//!
//! Expected stdout shape (the `an_ss`/`an_ms` family):
//!
//! ```text
//! #work done in 1.234 s
//! <energy> <count> <success_rate> [instance]
//! ...
//! ```

use std::path::PathBuf;
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::export;
use crate::model::Graph;
use crate::{Error, Result};

// ============================================================================
// Annealer
// ============================================================================

/// Handle to an external simulated-annealing solver binary.
#[derive(Debug, Clone)]
pub struct Annealer {
    binary: PathBuf,
    sweeps: u32,
    repetitions: u32,
}

impl Annealer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            sweeps: 2000,
            repetitions: 10_000,
        }
    }

    /// Annealing sweeps per repetition (`-s`). Must be positive.
    pub fn with_sweeps(mut self, sweeps: u32) -> Result<Self> {
        if sweeps == 0 {
            return Err(Error::Config("sweeps must be a positive integer".into()));
        }
        self.sweeps = sweeps;
        Ok(self)
    }

    /// Independent annealing runs (`-r`). Must be positive.
    pub fn with_repetitions(mut self, repetitions: u32) -> Result<Self> {
        if repetitions == 0 {
            return Err(Error::Config(
                "repetitions must be a positive integer".into(),
            ));
        }
        self.repetitions = repetitions;
        Ok(self)
    }

    /// Run the solver on one instance and compute its time-to-solution.
    pub fn solve(&self, graph: &Graph) -> Result<AnnealOutcome> {
        let mut instance = NamedTempFile::new()?;
        export::write_instance(graph, graph.qubit_count(), instance.as_file_mut())?;

        debug!(
            binary = %self.binary.display(),
            sweeps = self.sweeps,
            repetitions = self.repetitions,
            "submitting instance"
        );

        let output = Command::new(&self.binary)
            .arg("-l")
            .arg(instance.path())
            .arg("-s")
            .arg(self.sweeps.to_string())
            .arg("-r")
            .arg(self.repetitions.to_string())
            .output()?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(Error::Solver(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            warn!(stderr = %stderr.trim(), "annealer wrote to stderr");
        }

        let report = parse_output(&String::from_utf8_lossy(&output.stdout))?;
        let best = report.spectrum[0];
        let tts = time_to_solution(
            self.repetitions,
            report.runtime_secs,
            best.success_rate,
        );

        Ok(AnnealOutcome {
            best_energy: best.energy,
            success_rate: best.success_rate,
            runtime_secs: report.runtime_secs,
            time_to_solution: tts,
            spectrum: report.spectrum,
        })
    }
}

// ============================================================================
// Results
// ============================================================================

/// One row of the solver's energy table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyCount {
    pub energy: f64,
    pub count: u64,
    pub success_rate: f64,
}

/// Parsed solver run, best energy first.
#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    pub best_energy: f64,
    pub success_rate: f64,
    pub runtime_secs: f64,
    /// Estimated wall-clock seconds to hit the ground state with 0.99
    /// probability. 0 when every repetition already succeeded, infinite
    /// when none did.
    pub time_to_solution: f64,
    pub spectrum: Vec<EnergyCount>,
}

struct SolverReport {
    runtime_secs: f64,
    spectrum: Vec<EnergyCount>,
}

fn parse_output(stdout: &str) -> Result<SolverReport> {
    let mut runtime_secs = None;
    let mut spectrum = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            if let Some(timing) = rest.trim().strip_prefix("work done in") {
                runtime_secs = timing.split_whitespace().next().and_then(|t| t.parse().ok());
            }
            continue;
        }

        let mut fields = line.split_whitespace();
        let row = (|| {
            Some(EnergyCount {
                energy: fields.next()?.parse().ok()?,
                count: fields.next()?.parse().ok()?,
                success_rate: fields.next()?.parse().ok()?,
            })
        })()
        .ok_or_else(|| Error::Solver(format!("unparseable result row: {line:?}")))?;
        spectrum.push(row);
    }

    let runtime_secs = runtime_secs
        .ok_or_else(|| Error::Solver("missing '#work done in' timing line".into()))?;
    if spectrum.is_empty() {
        return Err(Error::Solver("no result rows in solver output".into()));
    }

    Ok(SolverReport {
        runtime_secs,
        spectrum,
    })
}

/// Time-to-solution at the 0.99 success target.
///
/// Each repetition takes `runtime / repetitions` seconds and finds the
/// ground state with probability `p_success`; the repeat count needed for
/// the target follows from the log ratio.
pub fn time_to_solution(repetitions: u32, runtime_secs: f64, p_success: f64) -> f64 {
    const P_TARGET: f64 = 0.99;

    if p_success >= 1.0 {
        return 0.0;
    }
    if p_success <= 0.0 {
        return f64::INFINITY;
    }

    let time_per_run = runtime_secs / f64::from(repetitions);
    time_per_run * (1.0 - P_TARGET).log2() / (1.0 - p_success).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
#seed 42
#work done in 2.5 s
-110.25 9900 0.99 instance.txt
-108.0 100 0.01 instance.txt
";

    #[test]
    fn test_parse_sample_output() {
        let report = parse_output(SAMPLE).unwrap();
        assert_eq!(report.runtime_secs, 2.5);
        assert_eq!(report.spectrum.len(), 2);
        assert_eq!(
            report.spectrum[0],
            EnergyCount {
                energy: -110.25,
                count: 9900,
                success_rate: 0.99
            }
        );
    }

    #[test]
    fn test_parse_requires_timing_line() {
        assert!(matches!(
            parse_output("-1.0 10 0.5\n"),
            Err(Error::Solver(_))
        ));
    }

    #[test]
    fn test_parse_requires_result_rows() {
        assert!(matches!(
            parse_output("#work done in 1.0 s\n"),
            Err(Error::Solver(_))
        ));
    }

    #[test]
    fn test_tts_saturates_at_certain_success() {
        assert_eq!(time_to_solution(100, 10.0, 1.0), 0.0);
        assert_eq!(time_to_solution(100, 10.0, 1.5), 0.0);
    }

    #[test]
    fn test_tts_infinite_without_success() {
        assert!(time_to_solution(100, 10.0, 0.0).is_infinite());
    }

    #[test]
    fn test_tts_at_target_rate_is_one_run() {
        // p_success exactly at the 0.99 target: one repetition's time.
        let tts = time_to_solution(1000, 50.0, 0.99);
        assert!((tts - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_config_validation_is_eager() {
        assert!(Annealer::new("an_ss_ge_fi").with_sweeps(0).is_err());
        assert!(Annealer::new("an_ss_ge_fi").with_repetitions(0).is_err());
    }

    #[test]
    fn test_missing_binary_surfaces_io_error() {
        let annealer = Annealer::new("/nonexistent/annealer-binary");
        let graph = Graph::from_entries([((0, 4), 1.0)]);
        assert!(annealer.solve(&graph).is_err());
    }
}
