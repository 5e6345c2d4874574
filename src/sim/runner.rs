use log::{debug, info};
use nalgebra::Vector3;

use crate::config::{Goal, Scenario};
use crate::dynamics::state::{State, TargetState, TranslationCommand, VesselState};
use crate::gnc::{Controller, RcsController, VelocityRequest};
use crate::vehicle::{ActionGroup, SimActionGroup};
use super::event::{
    ConvergenceDetector, DivergenceDetector, EventDetector, EventKind, RcsToggleDetector, SimEvent,
};
use super::integrator::rk4_step;

/// Everything recorded during one scenario run.
#[derive(Debug, Clone)]
pub struct Run {
    pub trajectory: Vec<State>,
    pub commands: Vec<TranslationCommand>,
    pub events: Vec<SimEvent>,
    /// Writes made to the RCS action group.
    pub group_writes: usize,
}

impl Run {
    pub fn first_event(&self, kind: &EventKind) -> Option<&SimEvent> {
        self.events.iter().find(|e| &e.kind == kind)
    }
}

// ---------------------------------------------------------------------------
// Goal bookkeeping
// ---------------------------------------------------------------------------

/// Request the simulated autopilot issues for the current state.
fn request_for(goal: &Goal, state: &State) -> VelocityRequest {
    match goal {
        Goal::HoldVelocity { velocity } => VelocityRequest::WorldVelocity(*velocity),
        Goal::ReachVelocity { velocity } => VelocityRequest::VelocityError(velocity - state.vel),
        Goal::MatchTarget { relative_velocity } => {
            VelocityRequest::RelativeToTarget(*relative_velocity)
        }
    }
}

/// Distance between the vessel's velocity and the one the goal asks for.
/// Target-relative goals measure against the target even after tracking drops.
fn speed_error(scenario: &Scenario, state: &State) -> f64 {
    let wanted = match &scenario.goal {
        Goal::HoldVelocity { velocity } | Goal::ReachVelocity { velocity } => *velocity,
        Goal::MatchTarget { relative_velocity } => {
            scenario.target_velocity.unwrap_or_else(Vector3::zeros) + relative_velocity
        }
    };
    (state.vel - wanted).norm()
}

// ---------------------------------------------------------------------------
// Full scenario simulation
// ---------------------------------------------------------------------------

/// Simulate a scenario with a custom controller.
/// Returns trajectory, the command issued at each step, and detected events.
pub fn simulate_with(scenario: &Scenario, controller: &mut dyn Controller) -> Run {
    let config = &scenario.sim;
    let dt = config.dt;

    let mut state = State {
        time: 0.0,
        pos: Vector3::zeros(),
        vel: scenario.initial_velocity,
        accel: scenario.gravity,
        quat: nalgebra::UnitQuaternion::identity(),
        omega: scenario.body_rate,
        rcs_enabled: false,
        speed_error: 0.0,
    };
    state.speed_error = speed_error(scenario, &state);

    let capacity = (config.max_time / dt) as usize + 1;
    let cap = capacity.min(200_000);
    let mut trajectory = Vec::with_capacity(cap);
    let mut commands = Vec::with_capacity(cap);
    let mut events = Vec::new();

    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(RcsToggleDetector),
        Box::new(ConvergenceDetector::new(config.settle_tolerance)),
        Box::new(DivergenceDetector::new(config.settle_tolerance)),
    ];

    let mut group = SimActionGroup::new(false);
    controller.activate(dt);
    info!("{}: running '{}' with {} (dt={} s)", scenario.vessel.name, scenario.name, controller.name(), dt);
    events.push(SimEvent { time: 0.0, kind: EventKind::Activated, state: state.clone() });

    trajectory.push(state.clone());
    commands.push(TranslationCommand::default());

    let mut target_reported_lost = false;

    while state.time < config.max_time {
        let target_velocity = scenario.target_at(state.time);
        let target = target_velocity.map(|tv| TargetState { relative_velocity: state.vel - tv });
        if scenario.target_velocity.is_some() && target.is_none() && !target_reported_lost {
            target_reported_lost = true;
            debug!("target lost at t={:.2}s", state.time);
            events.push(SimEvent { time: state.time, kind: EventKind::TargetLost, state: state.clone() });
        }

        let vessel = VesselState {
            velocity: state.vel,
            rotation: state.quat,
            acceleration: state.accel,
            gravity: scenario.gravity,
            mass: scenario.vessel.mass,
            thrust_available: scenario.vessel.thrusters,
        };

        // GNC update
        controller.request(request_for(&scenario.goal, &state));
        let cmd = controller.drive(&vessel, target.as_ref(), &mut group, dt);
        state.rcs_enabled = group.is_enabled();

        // Integrate
        let prev = trajectory.last().cloned().unwrap_or_else(|| state.clone());
        state = rk4_step(&state, &scenario.vessel, &cmd, &scenario.gravity, dt);
        state.speed_error = speed_error(scenario, &state);

        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&prev, &state) {
                debug!("t={:.2}s {:?}", state.time, kind);
                events.push(SimEvent { time: state.time, kind, state: state.clone() });
            }
        }

        trajectory.push(state.clone());
        commands.push(cmd);
    }

    info!(
        "{}: finished at t={:.2}s, speed error {:.4} m/s, {} group writes",
        scenario.name,
        state.time,
        state.speed_error,
        group.writes()
    );

    Run { trajectory, commands, events, group_writes: group.writes() }
}

/// Simulate with the scenario's own tuning on a fresh RcsController.
pub fn simulate(scenario: &Scenario) -> Run {
    let mut controller = RcsController::new(scenario.tuning.clone());
    simulate_with(scenario, &mut controller)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
