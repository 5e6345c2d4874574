use crate::dynamics::state::State;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Activated,
    RcsEnabled,
    RcsDisabled,
    Converged,
    TargetLost,
    Custom(String),
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: State,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind>;
}

/// Reports every change of the RCS action group.
pub struct RcsToggleDetector;

impl EventDetector for RcsToggleDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        match (prev.rcs_enabled, current.rcs_enabled) {
            (false, true) => Some(EventKind::RcsEnabled),
            (true, false) => Some(EventKind::RcsDisabled),
            _ => None,
        }
    }
}

/// Fires once, the first time the speed error drops inside `tolerance`.
pub struct ConvergenceDetector {
    pub tolerance: f64,
    fired: bool,
}

impl ConvergenceDetector {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance, fired: false }
    }
}

impl EventDetector for ConvergenceDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.speed_error > self.tolerance && current.speed_error <= self.tolerance {
            self.fired = true;
            Some(EventKind::Converged)
        } else {
            None
        }
    }
}

/// Fires once when the speed error climbs back above `limit` after having
/// been below it.
pub struct DivergenceDetector {
    pub limit: f64,
    armed: bool,
    fired: bool,
}

impl DivergenceDetector {
    pub fn new(limit: f64) -> Self {
        Self { limit, armed: false, fired: false }
    }
}

impl EventDetector for DivergenceDetector {
    fn check(&mut self, _prev: &State, current: &State) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if current.speed_error <= self.limit {
            self.armed = true;
            return None;
        }
        if self.armed {
            self.fired = true;
            return Some(EventKind::Custom(format!(
                "Speed error above {:.3} m/s again",
                self.limit
            )));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    fn make_state(speed_error: f64, rcs_enabled: bool) -> State {
        State {
            time: 0.0,
            pos: Vector3::zeros(),
            vel: Vector3::zeros(),
            accel: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
            rcs_enabled,
            speed_error,
        }
    }

    #[test]
    fn toggle_detected_both_ways() {
        let mut det = RcsToggleDetector;
        let off = make_state(1.0, false);
        let on = make_state(1.0, true);
        assert_eq!(det.check(&off, &on), Some(EventKind::RcsEnabled));
        assert_eq!(det.check(&on, &off), Some(EventKind::RcsDisabled));
        assert!(det.check(&on, &on).is_none());
    }

    #[test]
    fn convergence_fires_once() {
        let mut det = ConvergenceDetector::new(0.1);
        let far = make_state(0.5, true);
        let near = make_state(0.05, true);
        assert_eq!(det.check(&far, &near), Some(EventKind::Converged));
        // Should not fire again
        assert!(det.check(&far, &near).is_none());
    }

    #[test]
    fn divergence_needs_prior_convergence() {
        let mut det = DivergenceDetector::new(0.1);
        let far = make_state(0.5, true);
        let near = make_state(0.05, true);
        assert!(det.check(&far, &far).is_none());
        assert!(det.check(&far, &near).is_none());
        assert!(matches!(det.check(&near, &far), Some(EventKind::Custom(_))));
        assert!(det.check(&near, &far).is_none());
    }
}
