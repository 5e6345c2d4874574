pub mod config;
pub mod dynamics;
pub mod vehicle;
mod gnc_mod;
pub mod sim;
pub mod io;
pub mod logging;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub mod types {
    pub use crate::config::{Goal, RcsTuning, Scenario};
    pub use crate::dynamics::state::{SimConfig, State, TargetState, TranslationCommand, VesselState};
    pub use crate::vehicle::{Direction6, ThrusterTable, Vessel};
}
