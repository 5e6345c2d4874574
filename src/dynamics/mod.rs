pub mod state;
pub mod translation;

pub use state::{SimConfig, State, TargetState, TranslationCommand, VesselState};
