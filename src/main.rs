use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use rcs_velocity::config::{scenarios, Goal, Scenario};
use rcs_velocity::io::{csv, json, RunSummary};
use rcs_velocity::sim::{self, event::EventKind};
use rcs_velocity::vehicle::Direction6;

/// Run the RCS velocity controller against a simulated vessel.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Preset scenario: "docking" or "station"
    #[arg(long, default_value = "docking", conflicts_with = "scenario")]
    preset: String,

    /// Scenario JSON file
    #[arg(long)]
    scenario: Option<String>,

    /// Override the controller time constant, s
    #[arg(long)]
    tf: Option<f64>,

    /// Override fuel conservation
    #[arg(long)]
    conserve: Option<bool>,

    /// Override the conservation threshold, m/s
    #[arg(long)]
    threshold: Option<f64>,

    /// Enable output smoothing
    #[arg(long)]
    smoothing: bool,

    /// Tick duration, s
    #[arg(long)]
    dt: Option<f64>,

    /// Simulated duration, s
    #[arg(long)]
    duration: Option<f64>,

    /// Write the trajectory as CSV
    #[arg(long)]
    csv: Option<String>,

    /// Write the run summary as JSON
    #[arg(long)]
    json: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log every control tick
    #[arg(long)]
    trace: bool,
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path).with_context(|| format!("loading scenario {path}"))?,
        None => match scenarios::by_name(&args.preset) {
            Some(s) => s,
            None => bail!("unknown preset '{}' (expected docking or station)", args.preset),
        },
    };

    if let Some(tf) = args.tf {
        scenario.tuning.tf = tf;
    }
    if let Some(conserve) = args.conserve {
        scenario.tuning.conserve_fuel = conserve;
    }
    if let Some(threshold) = args.threshold {
        scenario.tuning.conserve_threshold = threshold;
    }
    if args.smoothing {
        scenario.tuning.smoothing = true;
    }
    if let Some(dt) = args.dt {
        scenario.sim.dt = dt;
    }
    if let Some(duration) = args.duration {
        scenario.sim.max_time = duration;
    }
    scenario.validate().context("invalid scenario")?;
    Ok(scenario)
}

fn main() -> Result<()> {
    let args = Args::parse();
    rcs_velocity::logging::init(args.verbose, args.trace);

    let scenario = load_scenario(&args)?;

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let run = sim::simulate(&scenario);
    let summary = RunSummary::from_run(&scenario, &run);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let vessel = &scenario.vessel;
    let accel = vessel.accelerations();

    println!();
    println!("====================================================================");
    println!("  RCS VELOCITY CONTROL: {} ({})", scenario.name, vessel.name);
    println!("====================================================================");
    println!();
    println!("  Vessel");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Mass:          {:>8.0} kg", vessel.mass);
    for dir in Direction6::ALL {
        println!(
            "  {:<8}       {:>8.0} N     {:>6.3} m/s^2",
            format!("{:?}", dir),
            vessel.thrusters.get(dir),
            accel[dir.index()]
        );
    }
    println!();

    let t = &scenario.tuning;
    println!("  Tuning");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Tf:            {:>8.3} s     dt:           {:>8.3} s", t.tf, scenario.sim.dt);
    println!(
        "  Conserve:      {:>8}       threshold:    {:>8.3} m/s",
        t.conserve_fuel, t.conserve_threshold
    );
    let goal = match &scenario.goal {
        Goal::HoldVelocity { velocity } => format!("hold world velocity {:?}", velocity.as_slice()),
        Goal::ReachVelocity { velocity } => format!("reach world velocity {:?}", velocity.as_slice()),
        Goal::MatchTarget { relative_velocity } => {
            format!("match target at {:?}", relative_velocity.as_slice())
        }
    };
    println!("  Goal:          {}", goal);
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &run.events {
        let label = match &e.kind {
            EventKind::Activated => "ACTIVATED".to_string(),
            EventKind::RcsEnabled => "RCS ON".to_string(),
            EventKind::RcsDisabled => "RCS OFF".to_string(),
            EventKind::Converged => "CONVERGED".to_string(),
            EventKind::TargetLost => "TARGET LOST".to_string(),
            EventKind::Custom(s) => s.clone(),
        };
        println!(
            "  {:<12} t={:>6.2}s   err={:>7.4}m/s",
            label, e.time, e.state.speed_error
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Initial error: {:>8.4} m/s", summary.initial_error_ms);
    println!("  Final error:   {:>8.4} m/s", summary.final_error_ms);
    match summary.settle_time_s {
        Some(ts) => println!("  Settled at:    {:>8.2} s", ts),
        None => println!("  Settled at:         n/a"),
    }
    println!("  Actuation:     {:>8.2} full-thrust s", summary.actuation_s);
    println!("  RCS on:        {:>8.1} %", summary.rcs_on_fraction * 100.0);
    println!("  Group writes:  {:>8}", summary.group_writes);
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>8}  {:>6}  {:>6}  {:>6}  {:>3}",
        "t (s)", "vx", "vy", "vz", "err", "cmd_x", "cmd_y", "cmd_z", "rcs"
    );
    println!("  {}", "─".repeat(74));

    let sample_interval = (run.trajectory.len() / 30).max(1);
    for (i, (s, c)) in run.trajectory.iter().zip(&run.commands).enumerate() {
        if i % sample_interval != 0 && i != run.trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>8.4}  {:>8.4}  {:>8.4}  {:>8.4}  {:>6.3}  {:>6.3}  {:>6.3}  {:>3}",
            s.time, s.vel.x, s.vel.y, s.vel.z, s.speed_error, c.x, c.y, c.z,
            if s.rcs_enabled { "on" } else { "off" }
        );
    }
    println!();
    println!("  Simulation: {} steps, dt={} s", run.trajectory.len(), scenario.sim.dt);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_trajectory_file(path, &run.trajectory, &run.commands)
            .with_context(|| format!("writing {path}"))?;
        info!("trajectory written to {}", path);
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &summary).with_context(|| format!("writing {path}"))?;
        info!("summary written to {}", path);
    }

    Ok(())
}
