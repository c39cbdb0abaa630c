//! Time-stepped simulation of real-time jobs dispatched over a pool of identical
//! processors under EDF, SJF, LST or FCFS.

pub mod generator;
pub mod io;
pub mod models;
pub mod report;
pub mod utils;

pub use models::scheduler;
pub use models::{Job, JobSet, Processor, Slot, TimeStep, ID};
pub use utils::constants;
pub use utils::{InputError, SchedulingCode, SchedulingError};
