use nalgebra::{Quaternion, Vector3};

use crate::dynamics::state::{Deriv, State, TranslationCommand};
use crate::vehicle::{Direction6, Vessel};

// ---------------------------------------------------------------------------
// Translational equations of motion under RCS
// ---------------------------------------------------------------------------

/// Acceleration (local frame) produced by a translation command.
///
/// Each local axis fires the direction named by the sign of its actuation,
/// scaled by that direction's available acceleration. Exhaust leaving along
/// a direction pushes the vessel the opposite way.
pub fn rcs_accel_local(vessel: &Vessel, cmd: &TranslationCommand) -> Vector3<f64> {
    let accel = vessel.accelerations();
    let act = cmd.to_local();
    (0..3).fold(Vector3::zeros(), |acc, axis| {
        let level = act[axis].clamp(-1.0, 1.0);
        if level == 0.0 {
            return acc;
        }
        let dir = Direction6::along_axis(axis, level);
        acc - dir.unit() * (level.abs() * accel[dir.index()])
    })
}

/// Compute state derivatives for a vessel coasting or firing RCS.
///
/// Forces:
///   1. Gravity, uniform
///   2. RCS translation (local frame → world), only while the group is on
/// Attitude follows a constant body rate.
pub fn derivatives(
    state: &State,
    vessel: &Vessel,
    cmd: &TranslationCommand,
    gravity: &Vector3<f64>,
) -> Deriv {
    let a_rcs = if state.rcs_enabled {
        state.quat * rcs_accel_local(vessel, cmd)
    } else {
        Vector3::zeros()
    };

    // --- Quaternion kinematics: dq/dt = 0.5 * q * omega_quat ---
    let omega_quat = Quaternion::new(0.0, state.omega.x, state.omega.y, state.omega.z);
    let dquat = state.quat.quaternion() * omega_quat * 0.5;

    Deriv {
        dpos: state.vel,
        dvel: a_rcs + gravity,
        dquat,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
