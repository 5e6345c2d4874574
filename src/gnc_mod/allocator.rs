use nalgebra::Vector3;

use crate::vehicle::Direction6;

// ---------------------------------------------------------------------------
// Thruster allocation across the six firing directions
// ---------------------------------------------------------------------------

/// Projections at or below this magnitude (m/s) are treated as noise.
pub const DEADBAND: f64 = 0.001;

/// Raw actuation for one direction: the error projection divided by the
/// velocity change that direction delivers in one tick. Saturates at
/// `f64::MAX` instead of overflowing.
///
/// `None` when the direction is unavailable, the projection is inside the
/// deadband, `dt` is not positive, or the direction would have to fire the
/// wrong way.
pub fn direction_action(projection: f64, accel: f64, dt: f64) -> Option<f64> {
    if accel <= 0.0 || dt <= 0.0 || projection.is_nan() || projection.abs() <= DEADBAND {
        return None;
    }
    let action = (projection / (accel * dt)).min(f64::MAX);
    (action > 0.0).then_some(action)
}

/// Local-frame raw actuation vector for a local-frame velocity error.
///
/// `accel` holds the available acceleration per [`Direction6`]. Each
/// direction only contributes when it can push against the error; the
/// opposite half of an axis is covered by its own entry. A direction only
/// ever touches its own axis.
pub fn allocate(local_error: &Vector3<f64>, accel: &[f64; 6], dt: f64) -> Vector3<f64> {
    let mut raw = Vector3::zeros();
    for dir in Direction6::ALL {
        let projection = local_error[dir.axis()] * dir.sign();
        if let Some(action) = direction_action(projection, accel[dir.index()], dt) {
            raw[dir.axis()] += dir.sign() * action;
        }
    }
    raw
}
