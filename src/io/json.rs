use std::io::{self, Write};

use serde::Serialize;

use crate::config::Scenario;
use crate::sim::event::EventKind;
use crate::sim::Run;

/// Summary statistics computed from a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub vessel: String,
    pub initial_error_ms: f64,
    pub final_error_ms: f64,
    pub peak_error_ms: f64,
    /// First time the speed error fell inside the settle tolerance, s.
    pub settle_time_s: Option<f64>,
    /// Sum of |command| over all channels and ticks, times dt. A rough
    /// proxy for RCS usage, in full-thrust seconds.
    pub actuation_s: f64,
    pub rcs_on_fraction: f64,
    pub group_writes: usize,
    pub target_lost_at_s: Option<f64>,
    pub duration_s: f64,
}

impl RunSummary {
    /// Compute summary from run data.
    pub fn from_run(scenario: &Scenario, run: &Run) -> Self {
        let first = run.trajectory.first();
        let last = run.trajectory.last();
        let dt = scenario.sim.dt;

        let peak_error = run
            .trajectory
            .iter()
            .map(|s| s.speed_error)
            .fold(0.0_f64, f64::max);

        let actuation = run
            .commands
            .iter()
            .map(|c| c.x.abs() + c.y.abs() + c.z.abs())
            .sum::<f64>()
            * dt;

        let steps = run.trajectory.len().saturating_sub(1);
        let on_steps = run.trajectory.iter().skip(1).filter(|s| s.rcs_enabled).count();
        let rcs_on_fraction = if steps > 0 { on_steps as f64 / steps as f64 } else { 0.0 };

        RunSummary {
            scenario: scenario.name.clone(),
            vessel: scenario.vessel.name.clone(),
            initial_error_ms: first.map_or(0.0, |s| s.speed_error),
            final_error_ms: last.map_or(0.0, |s| s.speed_error),
            peak_error_ms: peak_error,
            settle_time_s: run.first_event(&EventKind::Converged).map(|e| e.time),
            actuation_s: actuation,
            rcs_on_fraction,
            group_writes: run.group_writes,
            target_lost_at_s: run.first_event(&EventKind::TargetLost).map(|e| e.time),
            duration_s: last.map_or(0.0, |s| s.time),
        }
    }
}

/// Write run summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write run summary JSON to a file.
pub fn write_summary_file(path: &str, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
