use nalgebra::Vector3;

use crate::dynamics::state::{TargetState, VesselState};
use super::mode::{ControlMode, ModeSelector};

// ---------------------------------------------------------------------------
// Velocity error for the active mode, world and local frame
// ---------------------------------------------------------------------------

/// Refresh the selector's world-frame error for this tick and return it.
///
/// Returns `None` when the mode tracks a target and none is available.
/// Gravity is left out of the `TargetVelocity` error: it acts on the target
/// too, and over docking distances the difference is negligible.
pub fn world_error(
    selector: &mut ModeSelector,
    vessel: &VesselState,
    target: Option<&TargetState>,
) -> Option<Vector3<f64>> {
    match selector.mode() {
        ControlMode::TargetVelocity => {
            selector.set_error(vessel.velocity - selector.target_velocity());
        }
        ControlMode::VelocityError => {}
        ControlMode::VelocityRelativeToTarget => {
            let target = target?;
            selector.set_error(target.relative_velocity - selector.target_velocity());
        }
        ControlMode::PositionRelativeToTarget => {}
    }
    Some(selector.error())
}

/// World-frame error rotated into the vessel's local frame.
pub fn local_error(vessel: &VesselState, world: &Vector3<f64>) -> Vector3<f64> {
    vessel.to_local(world)
}
