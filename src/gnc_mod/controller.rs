use nalgebra::Vector3;

use crate::dynamics::state::{TargetState, TranslationCommand, VesselState};
use crate::vehicle::ActionGroup;

/// What an autopilot module asks of a translation controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VelocityRequest {
    /// Hold this absolute world velocity.
    WorldVelocity(Vector3<f64>),
    /// Remaining world delta-v, supplied directly.
    VelocityError(Vector3<f64>),
    /// Hold this velocity relative to the tracked target.
    RelativeToTarget(Vector3<f64>),
}

/// Trait for translation controllers.
///
/// Implement this to plug a custom RCS controller into the simulation loop.
pub trait Controller {
    /// Apply a velocity request from the autopilot.
    fn request(&mut self, request: VelocityRequest);

    /// Run one tick: compute the translation command and drive the
    /// RCS action group.
    fn drive(
        &mut self,
        vessel: &VesselState,
        target: Option<&TargetState>,
        group: &mut dyn ActionGroup,
        dt: f64,
    ) -> TranslationCommand;

    /// Take control at tick `dt`, starting from a clean state.
    fn activate(&mut self, _dt: f64) {
        self.reset();
    }

    /// Reset controller internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
