use nalgebra::{UnitQuaternion, Vector3};

use crate::dynamics::state::{State, TranslationCommand};
use crate::dynamics::translation;
use crate::vehicle::Vessel;

// ---------------------------------------------------------------------------
// RK4 integrator with constant RCS command over the step
// ---------------------------------------------------------------------------

/// Single RK4 step with constant translation command over the step.
pub fn rk4_step(
    state: &State,
    vessel: &Vessel,
    cmd: &TranslationCommand,
    gravity: &Vector3<f64>,
    dt: f64,
) -> State {
    let k1 = translation::derivatives(state, vessel, cmd, gravity);
    let k2 = translation::derivatives(&state.apply(&k1, dt * 0.5), vessel, cmd, gravity);
    let k3 = translation::derivatives(&state.apply(&k2, dt * 0.5), vessel, cmd, gravity);
    let k4 = translation::derivatives(&state.apply(&k3, dt), vessel, cmd, gravity);

    let new_quat_raw = state.quat.quaternion()
        + (k1.dquat + k2.dquat * 2.0 + k3.dquat * 2.0 + k4.dquat) * (dt / 6.0);
    let accel = (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) / 6.0;

    State {
        time: state.time + dt,
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + accel * dt,
        accel,
        quat: UnitQuaternion::new_normalize(new_quat_raw),
        omega: state.omega,
        rcs_enabled: state.rcs_enabled,
        speed_error: state.speed_error,
    }
}
