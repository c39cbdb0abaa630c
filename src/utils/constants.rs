use crate::TimeStep;

/// Timeline label of a step during which a processor ran nothing.
pub const IDLE_MARKER: &str = "i";

/// Times and amounts of work closer than this compare equal.
pub const TIME_EPSILON: TimeStep = 1e-9;

pub const DEFAULT_UNITS: usize = 3;
pub const DEFAULT_STEP: TimeStep = 1.0;
pub const DEFAULT_JOBS: usize = 20;

/// Process exit codes of the simulator binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SchedulingCode {
    AllDeadlinesMet = 0,
    DeadlinesMissed = 1,
    Rejected = 2,
    NothingToSchedule = 3,
    InvalidInput = 5,
}

impl SchedulingCode {
    /// Keeps the most severe of two outcomes.
    pub fn worst(self, other: SchedulingCode) -> SchedulingCode {
        self.max(other)
    }
}

/// Strategy used to synthesise job sets when no file is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    SemiRandom,
    Random,
}

impl std::str::FromStr for Generator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "semi" => Ok(Generator::SemiRandom),
            "random" => Ok(Generator::Random),
            other => Err(format!("unknown generator '{other}', expected 'semi' or 'random'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_code() {
        assert_eq!(
            SchedulingCode::AllDeadlinesMet.worst(SchedulingCode::DeadlinesMissed),
            SchedulingCode::DeadlinesMissed
        );
        assert_eq!(
            SchedulingCode::Rejected.worst(SchedulingCode::DeadlinesMissed),
            SchedulingCode::Rejected
        );
        assert_eq!(
            SchedulingCode::Rejected.worst(SchedulingCode::NothingToSchedule),
            SchedulingCode::NothingToSchedule
        );
        assert_eq!(SchedulingCode::NothingToSchedule as i32, 3);
        assert_eq!(SchedulingCode::InvalidInput as i32, 5);
    }

    #[test]
    fn test_generator_parse() {
        assert_eq!("semi".parse::<Generator>(), Ok(Generator::SemiRandom));
        assert_eq!("RANDOM".parse::<Generator>(), Ok(Generator::Random));
        assert!("gauss".parse::<Generator>().is_err());
    }
}
