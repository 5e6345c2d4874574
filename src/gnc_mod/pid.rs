use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Gain schedule from a single time constant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Gains {
    /// Critically damped tuning for time constant `tf` (s).
    pub fn from_time_constant(tf: f64) -> Self {
        let kd = 0.53 / tf;
        let kp = kd / (3.0 * std::f64::consts::SQRT_2 * tf);
        let ki = kp / (12.0 * std::f64::consts::SQRT_2 * tf);
        Self { kp, ki, kd }
    }
}

/// Smallest time constant usable at tick `dt`: never below two ticks.
pub fn effective_time_constant(tf: f64, dt: f64) -> f64 {
    tf.max(2.0 * dt)
}

// ---------------------------------------------------------------------------
// Three-axis PID with rate feedback
// ---------------------------------------------------------------------------

/// PID over three independent axes.
///
/// The derivative path works on a measured rate (`omega`) rather than on a
/// difference of successive errors. A large derivative action bleeds the
/// integrator instead of letting it accumulate.
#[derive(Debug, Clone)]
pub struct VectorPid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub max: f64,
    pub min: f64,
    integral: Vector3<f64>,
    derivative: Vector3<f64>,
}

impl VectorPid {
    pub fn new(kp: f64, ki: f64, kd: f64, max: f64, min: f64) -> Self {
        Self { kp, ki, kd, max, min, integral: Vector3::zeros(), derivative: Vector3::zeros() }
    }

    pub fn set_gains(&mut self, gains: Gains) {
        self.kp = gains.kp;
        self.ki = gains.ki;
        self.kd = gains.kd;
    }

    pub fn gains(&self) -> Gains {
        Gains { kp: self.kp, ki: self.ki, kd: self.kd }
    }

    pub fn integral(&self) -> Vector3<f64> {
        self.integral
    }

    /// Derivative action from the last `compute`.
    pub fn derivative(&self) -> Vector3<f64> {
        self.derivative
    }

    pub fn compute(&mut self, error: &Vector3<f64>, omega: &Vector3<f64>, dt: f64) -> Vector3<f64> {
        self.derivative = omega * self.kd;

        let windup_limit = 0.6 * self.max;
        for i in 0..3 {
            let rate = self.derivative[i];
            // A NaN rate counts as large
            let acc = if rate.is_nan() || rate.abs() >= windup_limit {
                0.9 * self.integral[i]
            } else {
                self.integral[i] + error[i] * self.ki * dt
            };
            // Anti-windup: integral never exceeds the output range
            if !acc.is_nan() {
                self.integral[i] = acc.clamp(self.min, self.max);
            }
        }

        (error * self.kp + self.integral).map(|v| if v.is_nan() { 0.0 } else { v.clamp(self.min, self.max) })
    }

    pub fn reset(&mut self) {
        self.integral = Vector3::zeros();
        self.derivative = Vector3::zeros();
    }
}

// ---------------------------------------------------------------------------
// Optional first-order smoothing on the output
// ---------------------------------------------------------------------------

/// Move `last` towards `input` by `dt / (tf + dt)` of the gap.
pub fn low_pass(last: &Vector3<f64>, input: &Vector3<f64>, tf: f64, dt: f64) -> Vector3<f64> {
    if dt <= 0.0 {
        return *last;
    }
    last + (input - last) * (1.0 / (tf / dt + 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gains_follow_time_constant_formula() {
        let g = Gains::from_time_constant(0.1);
        assert!((g.kd - 5.3).abs() < 1e-12);
        assert!((g.kp - 5.3 / (3.0 * 2f64.sqrt() * 0.1)).abs() < 1e-12);
        assert!((g.kp - 12.492).abs() < 1e-3);
        assert!((g.ki - g.kp / (12.0 * 2f64.sqrt() * 0.1)).abs() < 1e-12);
        assert!((g.ki - 7.361).abs() < 1e-3);
    }

    #[test]
    fn time_constant_floor() {
        assert_eq!(effective_time_constant(0.01, 0.02), 0.04);
        assert_eq!(effective_time_constant(0.1, 0.02), 0.1);
        assert_eq!(effective_time_constant(0.04, 0.02), 0.04);
    }

    #[test]
    fn proportional_only() {
        let mut pid = VectorPid::new(0.5, 0.0, 0.0, 1.0, -1.0);
        let out = pid.compute(&Vector3::new(1.0, -0.4, 0.0), &Vector3::zeros(), 0.02);
        assert!((out - Vector3::new(0.5, -0.2, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn output_is_clamped() {
        let mut pid = VectorPid::new(10.0, 0.0, 0.0, 1.0, -1.0);
        let out = pid.compute(&Vector3::new(3.0, -3.0, 0.05), &Vector3::zeros(), 0.02);
        assert_eq!(out.x, 1.0);
        assert_eq!(out.y, -1.0);
        assert!((out.z - 0.5).abs() < 1e-12);
    }

    #[test]
    fn integral_accumulates_and_is_bounded() {
        let mut pid = VectorPid::new(0.0, 1.0, 0.0, 1.0, -1.0);
        pid.compute(&Vector3::new(1.0, 0.0, 0.0), &Vector3::zeros(), 0.1);
        let out = pid.compute(&Vector3::new(1.0, 0.0, 0.0), &Vector3::zeros(), 0.1);
        assert!((out.x - 0.2).abs() < 1e-12);
        for _ in 0..100 {
            pid.compute(&Vector3::new(1.0, 0.0, 0.0), &Vector3::zeros(), 0.1);
        }
        assert_eq!(pid.integral().x, 1.0);
    }

    #[test]
    fn large_rate_bleeds_integral() {
        let mut pid = VectorPid::new(0.0, 1.0, 1.0, 1.0, -1.0);
        pid.compute(&Vector3::new(5.0, 0.0, 0.0), &Vector3::zeros(), 0.1);
        assert!((pid.integral().x - 0.5).abs() < 1e-12);
        pid.compute(&Vector3::new(5.0, 0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0), 0.1);
        assert!((pid.integral().x - 0.45).abs() < 1e-12);
        assert_eq!(pid.derivative().x, 1.0);
    }

    #[test]
    fn saturated_output_keeps_integrating() {
        let mut pid = VectorPid::new(2.0, 1.0, 0.0, 1.0, -1.0);
        for _ in 0..3 {
            let out = pid.compute(&Vector3::new(1.0, -1.0, 0.0), &Vector3::zeros(), 0.1);
            assert_eq!(out.x, 1.0);
            assert_eq!(out.y, -1.0);
        }
        assert!((pid.integral().x - 0.3).abs() < 1e-12);
        assert!((pid.integral().y + 0.3).abs() < 1e-12);
    }

    #[test]
    fn non_finite_inputs_never_reach_the_output() {
        let mut pid = VectorPid::new(2.0, 1.0, 1.0, 1.0, -1.0);
        let out = pid.compute(
            &Vector3::new(f64::INFINITY, f64::NAN, 0.2),
            &Vector3::new(0.0, f64::NAN, 0.0),
            0.1,
        );
        assert_eq!(out.x, 1.0);
        assert_eq!(out.y, 0.0);
        assert!((out.z - 0.42).abs() < 1e-12);
        assert_eq!(pid.integral().x, 1.0);
        // NaN rate bleeds the integral
        assert_eq!(pid.integral().y, 0.0);
        let out = pid.compute(&Vector3::new(0.1, 0.1, 0.0), &Vector3::zeros(), 0.1);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn reset_clears_integral() {
        let mut pid = VectorPid::new(0.0, 1.0, 0.0, 1.0, -1.0);
        pid.compute(&Vector3::new(1.0, 1.0, 1.0), &Vector3::zeros(), 0.1);
        pid.reset();
        assert_eq!(pid.integral(), Vector3::zeros());
    }

    #[test]
    fn low_pass_moves_part_way() {
        let out = low_pass(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0), 0.06, 0.02);
        assert!((out.x - 0.25).abs() < 1e-12);
    }
}
