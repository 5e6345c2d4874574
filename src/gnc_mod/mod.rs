pub mod controller;
pub mod mode;
pub mod frame;
pub mod allocator;
pub mod pid;
pub mod rcs;

pub use controller::{Controller, VelocityRequest};
pub use mode::{ControlMode, ModeSelector};
pub use pid::{Gains, VectorPid};
pub use rcs::RcsController;
