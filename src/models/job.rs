use std::fmt;

use crate::constants::TIME_EPSILON;
use crate::TimeStep;

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    name: String,                   // Unique identifier for the job
    release_time: TimeStep,         // Earliest time the job may start
    execution_time: TimeStep,       // Total work the job needs
    deadline: TimeStep,             // Absolute deadline of the job
    executed: TimeStep,             // Work done so far in the current run
    steps: u64,                     // Steps executed so far in the current run
    finish_time: Option<TimeStep>,  // Start of the step during which the job completed
}

impl Job {
    pub fn new(name: impl Into<String>, release_time: TimeStep, execution_time: TimeStep, deadline: TimeStep) -> Self {
        Self {
            name: name.into(),
            release_time,
            execution_time,
            deadline,
            executed: 0.0,
            steps: 0,
            finish_time: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn release_time(&self) -> TimeStep {
        self.release_time
    }

    pub fn execution_time(&self) -> TimeStep {
        self.execution_time
    }

    pub fn deadline(&self) -> TimeStep {
        self.deadline
    }

    pub fn executed(&self) -> TimeStep {
        self.executed
    }

    pub fn finish_time(&self) -> Option<TimeStep> {
        self.finish_time
    }

    pub fn set_finish_time(&mut self, t: TimeStep) {
        self.finish_time = Some(t);
    }

    pub fn is_released(&self, t: TimeStep) -> bool {
        self.release_time <= t + TIME_EPSILON
    }

    pub fn is_complete(&self) -> bool {
        self.executed + TIME_EPSILON >= self.execution_time
    }

    /// A job is feasible when it can meet its deadline running alone from its release.
    pub fn is_feasible(&self) -> bool {
        self.release_time + self.execution_time <= self.deadline + TIME_EPSILON
    }

    /// Finished strictly after the deadline. Unfinished jobs are not counted.
    pub fn is_missed(&self) -> bool {
        match self.finish_time {
            Some(finish) => self.deadline - finish < -TIME_EPSILON,
            None => false,
        }
    }

    /// Time left before the remaining work would overrun the deadline if started at `t`.
    pub fn slack(&self, t: TimeStep) -> TimeStep {
        self.deadline - t - (self.execution_time - self.executed)
    }

    /// Executes `step` units of work and returns true if this call completed the job.
    /// Work is derived from the step count so fractional steps do not accumulate
    /// rounding error; `step` must stay the same within a run.
    pub fn advance(&mut self, step: TimeStep) -> bool {
        let was_complete = self.is_complete();
        self.steps += 1;
        self.executed = self.steps as TimeStep * step;
        !was_complete && self.is_complete()
    }

    pub fn reset(&mut self) {
        self.executed = 0.0;
        self.steps = 0;
        self.finish_time = None;
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: r={} e={} d={}", self.name, self.release_time, self.execution_time, self.deadline)
    }
}
