use std::path::PathBuf;

use thiserror::Error;

use crate::models::TimeStep;

/// Reasons a simulation refuses to start or aborts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("no jobs to schedule")]
    EmptyJobSet,
    #[error("job {name} cannot be executed: r={release} e={execution} d={deadline}")]
    InfeasibleJob {
        name: String,
        release: TimeStep,
        execution: TimeStep,
        deadline: TimeStep,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("simulation has not been started")]
    NotStarted,
    #[error("simulation stalled at t={time} without completing every job")]
    Stalled { time: TimeStep },
}

/// Failures while loading a job set.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read job file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read csv job file: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected 'release execution deadline', got '{content}'")]
    Malformed { line: usize, content: String },
}
