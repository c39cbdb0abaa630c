pub mod constants;
pub mod errors;

pub use constants::SchedulingCode;
pub use errors::{InputError, SchedulingError};
