//! Tunable controller parameters and simulation scenarios.
//!
//! Both are plain serde types; where they are stored is up to the caller.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dynamics::state::SimConfig;
use crate::vehicle::{presets, Vessel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be finite and non-negative, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("tick duration must be positive, got {0}")]
    NonPositiveDt(f64),
    #[error("vessel mass must be positive, got {0}")]
    NonPositiveMass(f64),
}

// ---------------------------------------------------------------------------
// Controller tuning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcsTuning {
    /// Response time constant, s. Raised to two ticks when smaller.
    pub tf: f64,
    /// Leave the thrusters idle while the error is inside `conserve_threshold`.
    pub conserve_fuel: bool,
    /// m/s
    pub conserve_threshold: f64,
    /// Allow other autopilot modules to throttle with RCS when the main
    /// engines report zero thrust. Not read by the velocity loop itself.
    pub rcs_throttle: bool,
    /// Enable first-order smoothing of the compensator output.
    pub smoothing: bool,
}

impl Default for RcsTuning {
    fn default() -> Self {
        Self {
            tf: 1.0,
            conserve_fuel: false,
            conserve_threshold: 0.05,
            rcs_throttle: true,
            smoothing: false,
        }
    }
}

impl RcsTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("tf", self.tf)?;
        check_non_negative("conserve_threshold", self.conserve_threshold)?;
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let tuning: RcsTuning = serde_json::from_str(s)?;
        tuning.validate()?;
        Ok(tuning)
    }
}

fn zero() -> Vector3<f64> {
    Vector3::zeros()
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

// ---------------------------------------------------------------------------
// Scenario: what the simulated autopilot asks for
// ---------------------------------------------------------------------------

/// Velocity goal the simulated autopilot hands to the controller every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Goal {
    /// Hold an absolute world velocity.
    HoldVelocity { velocity: Vector3<f64> },
    /// Reach a world velocity, supplying the remaining delta-v directly.
    ReachVelocity { velocity: Vector3<f64> },
    /// Hold a velocity relative to the target.
    MatchTarget { relative_velocity: Vector3<f64> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub vessel: Vessel,
    #[serde(default = "zero")]
    pub initial_velocity: Vector3<f64>,
    /// Body angular rate held constant through the run, rad/s.
    #[serde(default = "zero")]
    pub body_rate: Vector3<f64>,
    #[serde(default = "zero")]
    pub gravity: Vector3<f64>,
    pub goal: Goal,
    /// World velocity of the tracked target; `None` means nothing is targeted.
    #[serde(default)]
    pub target_velocity: Option<Vector3<f64>>,
    /// Time at which target tracking drops out, s.
    #[serde(default)]
    pub target_lost_at: Option<f64>,
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub tuning: RcsTuning,
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sim.dt.is_nan() || self.sim.dt <= 0.0 {
            return Err(ConfigError::NonPositiveDt(self.sim.dt));
        }
        if self.vessel.mass.is_nan() || self.vessel.mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(self.vessel.mass));
        }
        check_non_negative("max_time", self.sim.max_time)?;
        self.tuning.validate()
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = serde_json::from_str(s)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Whether the target is still tracked at time `t`.
    pub fn target_at(&self, t: f64) -> Option<Vector3<f64>> {
        match self.target_lost_at {
            Some(lost) if t >= lost => None,
            _ => self.target_velocity,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod scenarios {
    use super::*;

    /// Null out a lateral drift with the asymmetric docking tug.
    pub fn docking_approach() -> Scenario {
        Scenario {
            name: "Docking approach".into(),
            vessel: Vessel {
                name: "Tug".into(),
                mass: 2_000.0,
                thrusters: presets::docking_tug(),
            },
            initial_velocity: Vector3::new(0.4, 0.3, 1.2),
            body_rate: Vector3::zeros(),
            gravity: Vector3::zeros(),
            goal: Goal::MatchTarget { relative_velocity: Vector3::new(0.0, 0.0, 0.2) },
            target_velocity: Some(Vector3::zeros()),
            target_lost_at: None,
            sim: SimConfig::default(),
            tuning: RcsTuning::default(),
        }
    }

    /// Hold zero world velocity while slowly rolling.
    pub fn station_keeping() -> Scenario {
        Scenario {
            name: "Station keeping".into(),
            vessel: Vessel {
                name: "Block".into(),
                mass: 4_000.0,
                thrusters: presets::symmetric_block(),
            },
            initial_velocity: Vector3::new(0.5, 0.0, -0.25),
            body_rate: Vector3::new(0.0, 0.0, 0.05),
            gravity: Vector3::zeros(),
            goal: Goal::HoldVelocity { velocity: Vector3::zeros() },
            target_velocity: None,
            target_lost_at: None,
            sim: SimConfig::default(),
            tuning: RcsTuning { conserve_fuel: true, ..RcsTuning::default() },
        }
    }

    pub fn by_name(name: &str) -> Option<Scenario> {
        match name {
            "docking" => Some(docking_approach()),
            "station" => Some(station_keeping()),
            _ => None,
        }
    }
}
