mod job;
pub mod jobset;
pub mod processor;
pub mod scheduler;

pub use job::Job;
pub use jobset::JobSet;
pub use processor::{Processor, Slot};

pub type TimeStep = f64;

pub type ID = u32;
