use nalgebra::{UnitQuaternion, Vector3};

use rcs_velocity::config::{scenarios, Goal, RcsTuning, Scenario};
use rcs_velocity::gnc::{ControlMode, Controller, RcsController, VelocityRequest};
use rcs_velocity::sim::{event::EventKind, simulate, simulate_with};
use rcs_velocity::types::{TargetState, TranslationCommand, VesselState};
use rcs_velocity::vehicle::{presets, ActionGroup, SimActionGroup};

const DT: f64 = 0.02;

fn vessel(velocity: Vector3<f64>, rotation: UnitQuaternion<f64>) -> VesselState {
    VesselState {
        velocity,
        rotation,
        acceleration: Vector3::zeros(),
        gravity: Vector3::zeros(),
        mass: 2_000.0,
        thrust_available: presets::docking_tug(),
    }
}

/// Fires a fixed command forever, ignoring requests.
struct OpenLoop {
    cmd: TranslationCommand,
    activations: usize,
}

impl Controller for OpenLoop {
    fn request(&mut self, _request: VelocityRequest) {}

    fn drive(
        &mut self,
        _vessel: &VesselState,
        _target: Option<&TargetState>,
        group: &mut dyn ActionGroup,
        _dt: f64,
    ) -> TranslationCommand {
        if !group.is_enabled() {
            group.set_enabled(true);
        }
        self.cmd
    }

    fn activate(&mut self, _dt: f64) {
        self.activations += 1;
    }
}

#[test]
fn custom_controller_drives_the_simulation() {
    let mut s = scenarios::docking_approach();
    s.sim.max_time = 2.0;
    let mut ctrl = OpenLoop { cmd: TranslationCommand { x: -1.0, y: 0.0, z: 0.0 }, activations: 0 };
    let run = simulate_with(&s, &mut ctrl);

    assert_eq!(ctrl.activations, 1);
    assert_eq!(run.group_writes, 1);
    // Negative X command fires the Left thrusters, pushing the vessel toward +X.
    let v0 = run.trajectory.first().unwrap().vel.x;
    let v1 = run.trajectory.last().unwrap().vel.x;
    assert!(v1 > v0, "expected +X gain, {v0} -> {v1}");
}

#[test]
fn json_scenario_runs_end_to_end() {
    let json = r#"{
        "name": "json-hold",
        "vessel": { "name": "Probe", "mass": 500.0,
                    "thrusters": { "thrust": [400, 400, 400, 400, 400, 400] } },
        "initial_velocity": [0.2, -0.1, 0.3],
        "goal": { "kind": "hold_velocity", "velocity": [0.0, 0.0, 0.0] },
        "sim": { "dt": 0.02, "max_time": 20.0 },
        "tuning": { "tf": 0.5 }
    }"#;
    let s = Scenario::from_json_str(json).unwrap();
    assert_eq!(s.tuning.conserve_threshold, RcsTuning::default().conserve_threshold);
    assert!(matches!(s.goal, Goal::HoldVelocity { .. }));

    let run = simulate(&s);
    let last = run.trajectory.last().unwrap();
    assert!(last.speed_error < s.sim.settle_tolerance, "final error {}", last.speed_error);
    assert!(run.first_event(&EventKind::Converged).is_some());
}

#[test]
fn invalid_json_scenario_is_rejected() {
    let json = r#"{
        "name": "bad",
        "vessel": { "name": "Probe", "mass": 0.0,
                    "thrusters": { "thrust": [1, 1, 1, 1, 1, 1] } },
        "goal": { "kind": "hold_velocity", "velocity": [0.0, 0.0, 0.0] }
    }"#;
    assert!(Scenario::from_json_str(json).is_err());
}

#[test]
fn commands_stay_in_range_for_any_attitude() {
    let mut c = RcsController::default();
    c.activate(DT);
    let mut group = SimActionGroup::new(false);
    let rotations = [
        UnitQuaternion::identity(),
        UnitQuaternion::from_euler_angles(0.3, -1.1, 2.0),
        UnitQuaternion::from_euler_angles(std::f64::consts::PI, 0.0, 0.5),
    ];
    for rot in rotations {
        for target in [Vector3::new(50.0, -30.0, 10.0), Vector3::new(-0.2, 0.0, 0.7)] {
            c.set_target_world_velocity(target);
            for _ in 0..50 {
                let cmd = c.tick(&vessel(Vector3::zeros(), rot), None, &mut group, DT);
                for ch in [cmd.x, cmd.y, cmd.z] {
                    assert!((-1.0..=1.0).contains(&ch), "channel {ch} out of range");
                }
            }
        }
    }
}

#[test]
fn fuel_gate_writes_group_once_per_change() {
    let tuning = RcsTuning { conserve_fuel: true, conserve_threshold: 0.05, ..RcsTuning::default() };
    let mut c = RcsController::new(tuning);
    c.activate(DT);
    let mut group = SimActionGroup::new(true);
    c.set_target_world_velocity(Vector3::zeros());

    for _ in 0..10 {
        let cmd = c.tick(&vessel(Vector3::new(0.01, 0.0, 0.0), UnitQuaternion::identity()), None, &mut group, DT);
        assert!(cmd.is_zero());
    }
    assert!(!group.is_enabled());
    assert_eq!(group.writes(), 1);

    for _ in 0..10 {
        c.tick(&vessel(Vector3::new(1.0, 0.0, 0.0), UnitQuaternion::identity()), None, &mut group, DT);
    }
    assert!(group.is_enabled());
    assert_eq!(group.writes(), 2);
}

#[test]
fn relative_mode_without_target_deactivates() {
    let mut c = RcsController::default();
    c.activate(DT);
    let mut group = SimActionGroup::new(true);
    c.set_target_relative_velocity(Vector3::new(0.0, 0.0, 0.5));
    assert_eq!(c.mode(), ControlMode::VelocityRelativeToTarget);

    let cmd = c.tick(&vessel(Vector3::zeros(), UnitQuaternion::identity()), None, &mut group, DT);
    assert!(cmd.is_zero());
    assert!(!group.is_enabled());
    assert!(!c.is_active());
    assert_eq!(c.integral(), Vector3::zeros());
}

#[test]
fn lost_target_mid_run_leaves_rcs_off() {
    let mut s = scenarios::docking_approach();
    s.target_lost_at = Some(0.5);
    s.sim.max_time = 5.0;
    let run = simulate(&s);
    assert!(run.first_event(&EventKind::TargetLost).is_some());
    assert!(!run.trajectory.last().unwrap().rcs_enabled);
}
