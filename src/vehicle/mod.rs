pub mod thrusters;
pub mod action_group;
pub mod vessel;

pub use thrusters::{Direction6, ThrusterTable, ThrusterTableBuilder, presets};
pub use action_group::{ActionGroup, SimActionGroup};
pub use vessel::Vessel;
