pub mod policy;
pub mod simulator;

pub use policy::Policy;
pub use simulator::{run, SimulationConfig, SimulationReport, Simulator};
