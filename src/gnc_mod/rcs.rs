use log::{debug, trace, warn};
use nalgebra::Vector3;

use crate::config::RcsTuning;
use crate::dynamics::state::{TargetState, TranslationCommand, VesselState};
use crate::vehicle::action_group::{self, ActionGroup};
use super::allocator;
use super::controller::{Controller, VelocityRequest};
use super::frame;
use super::mode::{ControlMode, ModeSelector};
use super::pid::{self, Gains, VectorPid};

// ---------------------------------------------------------------------------
// RCS velocity controller: mode → frame → allocation → PID → fuel gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RcsController {
    pub tuning: RcsTuning,
    pid: VectorPid,
    selector: ModeSelector,
    last_act: Vector3<f64>,
    active: bool,
}

impl RcsController {
    pub fn new(tuning: RcsTuning) -> Self {
        Self {
            tuning,
            pid: VectorPid::new(0.0, 0.0, 0.0, 1.0, -1.0),
            selector: ModeSelector::new(),
            last_act: Vector3::zeros(),
            active: false,
        }
    }

    /// Start controlling at tick `dt`. Always starts from a clean slate in
    /// `VelocityError` mode.
    pub fn activate(&mut self, dt: f64) {
        self.update_gains(dt);
        self.reset();
        self.active = true;
        debug!("RCS controller activated (tf={:.3}s)", self.tuning.tf);
    }

    /// Stop controlling: drop the thrusters and forget all loop memory.
    pub fn deactivate(&mut self, group: &mut dyn ActionGroup) {
        action_group::ensure(group, false);
        self.reset();
        if self.active {
            debug!("RCS controller deactivated");
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> ControlMode {
        self.selector.mode()
    }

    pub fn set_target_world_velocity(&mut self, velocity: Vector3<f64>) {
        self.selector.set_target_world_velocity(velocity);
    }

    /// `dv` is the world velocity change still wanted.
    pub fn set_world_velocity_error(&mut self, dv: Vector3<f64>) {
        self.selector.set_world_velocity_error(dv);
    }

    pub fn set_target_relative_velocity(&mut self, velocity: Vector3<f64>) {
        self.selector.set_target_relative_velocity(velocity);
    }

    /// Raise `tf` to two ticks if needed, then retune the PID from it.
    pub fn update_gains(&mut self, dt: f64) {
        self.tuning.tf = pid::effective_time_constant(self.tuning.tf, dt);
        self.pid.set_gains(Gains::from_time_constant(self.tuning.tf));
    }

    pub fn gains(&self) -> Gains {
        self.pid.gains()
    }

    /// Fraction of the raw RCS acceleration the loop actually commands.
    /// Other modules scale available thrust by this when planning.
    pub fn accel_factor(&self) -> f64 {
        self.pid.kp
    }

    pub fn integral(&self) -> Vector3<f64> {
        self.pid.integral()
    }

    /// Local-frame actuation from the last tick that fired.
    pub fn last_act(&self) -> Vector3<f64> {
        self.last_act
    }

    pub fn selector(&self) -> &ModeSelector {
        &self.selector
    }

    pub fn reset(&mut self) {
        self.pid.reset();
        self.selector.reset();
        self.last_act = Vector3::zeros();
    }

    /// One control tick.
    pub fn tick(
        &mut self,
        vessel: &VesselState,
        target: Option<&TargetState>,
        group: &mut dyn ActionGroup,
        dt: f64,
    ) -> TranslationCommand {
        if !self.active {
            return TranslationCommand::ZERO;
        }

        self.update_gains(dt);

        let Some(world_error) = frame::world_error(&mut self.selector, vessel, target) else {
            warn!("RCS relative velocity control without a target, deactivating");
            self.deactivate(group);
            return TranslationCommand::ZERO;
        };
        let local_error = frame::local_error(vessel, &world_error);

        if self.tuning.conserve_fuel && local_error.norm() <= self.tuning.conserve_threshold {
            if action_group::ensure(group, false) {
                debug!("RCS idle: error {:.4} m/s inside threshold", local_error.norm());
            }
            return TranslationCommand::ZERO;
        }
        if action_group::ensure(group, true) {
            debug!("RCS enabled: error {:.4} m/s", local_error.norm());
        }

        let accel = vessel.thrust_available.accelerations(vessel.mass);
        let raw = allocator::allocate(&local_error, &accel, dt);

        // Rate feedback, local frame
        let omega = match self.selector.mode() {
            ControlMode::TargetVelocity => vessel.to_local(&(vessel.acceleration - vessel.gravity)),
            ControlMode::VelocityError | ControlMode::VelocityRelativeToTarget => {
                vessel.to_local(&self.selector.take_error_rate(dt))
            }
            ControlMode::PositionRelativeToTarget => Vector3::zeros(),
        };

        let mut act = self.pid.compute(&raw, &omega, dt);
        if self.tuning.smoothing {
            act = pid::low_pass(&self.last_act, &act, self.tuning.tf, dt);
        }
        self.last_act = act;

        let cmd = TranslationCommand::from_local(&act);
        trace!(
            "RCS tick mode={:?} err=[{:.4}, {:.4}, {:.4}] cmd=[{:.3}, {:.3}, {:.3}]",
            self.selector.mode(),
            local_error.x, local_error.y, local_error.z,
            cmd.x, cmd.y, cmd.z,
        );
        cmd
    }
}

impl Default for RcsController {
    fn default() -> Self {
        Self::new(RcsTuning::default())
    }
}

impl Controller for RcsController {
    fn request(&mut self, request: VelocityRequest) {
        match request {
            VelocityRequest::WorldVelocity(v) => self.set_target_world_velocity(v),
            VelocityRequest::VelocityError(dv) => self.set_world_velocity_error(dv),
            VelocityRequest::RelativeToTarget(v) => self.set_target_relative_velocity(v),
        }
    }

    fn drive(
        &mut self,
        vessel: &VesselState,
        target: Option<&TargetState>,
        group: &mut dyn ActionGroup,
        dt: f64,
    ) -> TranslationCommand {
        self.tick(vessel, target, group, dt)
    }

    fn activate(&mut self, dt: f64) {
        RcsController::activate(self, dt);
    }

    fn reset(&mut self) {
        RcsController::reset(self);
    }

    fn name(&self) -> &str {
        "RcsController"
    }
}
