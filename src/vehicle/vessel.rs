use serde::{Deserialize, Serialize};

use super::thrusters::ThrusterTable;

// ---------------------------------------------------------------------------
// Vessel: mass plus RCS layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vessel {
    pub name: String,
    pub mass: f64,                 // kg
    pub thrusters: ThrusterTable,  // N per firing direction
}

impl Vessel {
    /// Available acceleration per firing direction, m/s^2.
    pub fn accelerations(&self) -> [f64; 6] {
        self.thrusters.accelerations(self.mass)
    }
}
