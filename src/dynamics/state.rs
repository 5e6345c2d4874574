use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::vehicle::ThrusterTable;

// ---------------------------------------------------------------------------
// Vessel snapshot handed to the controller once per tick
// ---------------------------------------------------------------------------

/// What the physics layer reports about the vessel at the start of a tick.
/// All vectors are world frame unless noted.
#[derive(Debug, Clone)]
pub struct VesselState {
    pub velocity: Vector3<f64>,         // m/s
    pub rotation: UnitQuaternion<f64>,  // local→world rotation
    pub acceleration: Vector3<f64>,     // m/s^2, total (includes gravity)
    pub gravity: Vector3<f64>,          // m/s^2
    pub mass: f64,                      // kg
    pub thrust_available: ThrusterTable, // N per local firing direction
}

impl VesselState {
    /// Rotate a world-frame vector into the vessel's local frame.
    pub fn to_local(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse_transform_vector(world)
    }

    /// Rotate a local-frame vector into the world frame.
    pub fn to_world(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }
}

/// Relative state of the currently tracked target, as reported by the
/// target-tracking layer.
#[derive(Debug, Clone, Copy)]
pub struct TargetState {
    pub relative_velocity: Vector3<f64>, // vessel velocity minus target velocity, m/s
}

// ---------------------------------------------------------------------------
// Simulation state: translational motion, attitude, RCS group flag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct State {
    pub time: f64,
    pub pos: Vector3<f64>,              // m, world
    pub vel: Vector3<f64>,              // m/s, world
    pub accel: Vector3<f64>,            // m/s^2, world, from the last step
    pub quat: UnitQuaternion<f64>,      // local→world rotation
    pub omega: Vector3<f64>,            // rad/s, body frame angular velocity (held constant)
    pub rcs_enabled: bool,
    pub speed_error: f64,               // |velocity error| seen by the controller, m/s
}

impl State {
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        // Quaternion integration: q_new = normalize(q + dq * dt)
        let q_raw = self.quat.quaternion() + d.dquat * dt;
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            accel: d.dvel,
            quat: UnitQuaternion::new_normalize(q_raw),
            omega: self.omega,
            rcs_enabled: self.rcs_enabled,
            speed_error: self.speed_error,
        }
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector3<f64>,
    pub dvel: Vector3<f64>,
    pub dquat: Quaternion<f64>,   // not unit, raw quaternion derivative
}

// ---------------------------------------------------------------------------
// Translation command output
// ---------------------------------------------------------------------------

/// Per-channel RCS translation command, each channel in `[-1, 1]`.
///
/// Channel order follows the actuator mixer, not the vessel's local axes:
/// `y` carries local Z and `z` carries local Y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationCommand {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TranslationCommand {
    pub const ZERO: TranslationCommand = TranslationCommand { x: 0.0, y: 0.0, z: 0.0 };

    /// Build the mixer command from a local-frame actuation vector,
    /// clamping each channel and swapping Y and Z. NaN channels are zeroed.
    pub fn from_local(local: &Vector3<f64>) -> Self {
        let channel = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Self {
            x: channel(local.x),
            y: channel(local.z),
            z: channel(local.y),
        }
    }

    /// Undo the channel swap, giving the actuation per local axis.
    pub fn to_local(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.z, self.y)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
    pub settle_tolerance: f64,  // m/s, speed error counted as converged
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,         // 50 Hz physics tick
            max_time: 60.0,
            settle_tolerance: 0.1,
        }
    }
}
