use log::debug;
use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Control modes: which velocity-error source drives the tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Track an absolute world velocity.
    TargetVelocity,
    /// Error supplied directly by the caller each tick.
    VelocityError,
    /// Track a velocity relative to the tracked target.
    VelocityRelativeToTarget,
    /// Declared for position hold against a target. No setter selects it and
    /// the tick has no branch for it: the stored error is used as-is.
    PositionRelativeToTarget,
}

/// Mode plus the velocity memories that go with it. All vectors are world frame.
#[derive(Debug, Clone)]
pub struct ModeSelector {
    mode: ControlMode,
    target_velocity: Vector3<f64>,
    error: Vector3<f64>,
    prev_error: Vector3<f64>,
}

impl ModeSelector {
    pub fn new() -> Self {
        Self {
            mode: ControlMode::VelocityError,
            target_velocity: Vector3::zeros(),
            error: Vector3::zeros(),
            prev_error: Vector3::zeros(),
        }
    }

    /// Back to `VelocityError` with every memory zeroed.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Absolute or relative target velocity, depending on the mode.
    pub fn target_velocity(&self) -> Vector3<f64> {
        self.target_velocity
    }

    pub fn error(&self) -> Vector3<f64> {
        self.error
    }

    pub fn prev_error(&self) -> Vector3<f64> {
        self.prev_error
    }

    pub fn set_target_world_velocity(&mut self, velocity: Vector3<f64>) {
        self.target_velocity = velocity;
        self.switch(ControlMode::TargetVelocity);
    }

    /// `dv` is the velocity change still wanted; the stored error is `-dv`.
    /// Entering the mode seeds the previous error so the first rate is zero.
    pub fn set_world_velocity_error(&mut self, dv: Vector3<f64>) {
        self.error = -dv;
        if self.mode != ControlMode::VelocityError {
            self.prev_error = self.error;
            self.switch(ControlMode::VelocityError);
        }
    }

    pub fn set_target_relative_velocity(&mut self, velocity: Vector3<f64>) {
        self.target_velocity = velocity;
        self.switch(ControlMode::VelocityRelativeToTarget);
    }

    pub(crate) fn set_error(&mut self, error: Vector3<f64>) {
        self.error = error;
    }

    /// Finite-difference rate of the error since the last call, then
    /// remember the current error. Zero for a non-positive `dt`.
    pub(crate) fn take_error_rate(&mut self, dt: f64) -> Vector3<f64> {
        let rate = if dt > 0.0 {
            (self.error - self.prev_error) / dt
        } else {
            Vector3::zeros()
        };
        self.prev_error = self.error;
        rate
    }

    fn switch(&mut self, mode: ControlMode) {
        if self.mode != mode {
            debug!("RCS control mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_velocity_error_with_zero_memories() {
        let sel = ModeSelector::new();
        assert_eq!(sel.mode(), ControlMode::VelocityError);
        assert_eq!(sel.error(), Vector3::zeros());
        assert_eq!(sel.prev_error(), Vector3::zeros());
    }

    #[test]
    fn entering_velocity_error_seeds_previous() {
        let mut sel = ModeSelector::new();
        sel.set_target_world_velocity(Vector3::new(1.0, 0.0, 0.0));
        sel.set_world_velocity_error(Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(sel.mode(), ControlMode::VelocityError);
        assert_eq!(sel.error(), Vector3::new(0.0, -2.0, 0.0));
        assert_eq!(sel.prev_error(), sel.error());
        assert_eq!(sel.take_error_rate(0.02), Vector3::zeros());
    }

    #[test]
    fn staying_in_velocity_error_keeps_previous() {
        let mut sel = ModeSelector::new();
        sel.set_world_velocity_error(Vector3::new(1.0, 0.0, 0.0));
        // Already in VelocityError: previous stays at zero
        assert_eq!(sel.prev_error(), Vector3::zeros());
        let rate = sel.take_error_rate(0.5);
        assert!((rate - Vector3::new(-2.0, 0.0, 0.0)).norm() < 1e-12);
        assert_eq!(sel.prev_error(), sel.error());
    }

    #[test]
    fn setters_switch_unconditionally() {
        let mut sel = ModeSelector::new();
        sel.set_target_relative_velocity(Vector3::new(0.0, 0.0, 0.5));
        assert_eq!(sel.mode(), ControlMode::VelocityRelativeToTarget);
        sel.set_target_world_velocity(Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(sel.mode(), ControlMode::TargetVelocity);
        assert_eq!(sel.target_velocity(), Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn reset_clears_everything() {
        let mut sel = ModeSelector::new();
        sel.set_target_world_velocity(Vector3::new(3.0, 0.0, 0.0));
        sel.set_error(Vector3::new(1.0, 1.0, 1.0));
        sel.reset();
        assert_eq!(sel.mode(), ControlMode::VelocityError);
        assert_eq!(sel.target_velocity(), Vector3::zeros());
        assert_eq!(sel.error(), Vector3::zeros());
    }

    #[test]
    fn zero_dt_rate_is_zero() {
        let mut sel = ModeSelector::new();
        sel.set_error(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(sel.take_error_rate(0.0), Vector3::zeros());
        assert_eq!(sel.prev_error(), Vector3::new(1.0, 0.0, 0.0));
    }
}
