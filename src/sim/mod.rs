pub mod integrator;
pub mod runner;
pub mod event;

pub use runner::{simulate, simulate_with, Run};
pub use integrator::rk4_step;
