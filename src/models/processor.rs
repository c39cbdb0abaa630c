use std::fmt;

use log::trace;

use super::{Job, TimeStep, ID};
use crate::constants::IDLE_MARKER;

/// What a processor did during one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Idle,
    Busy(String),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Idle => f.write_str(IDLE_MARKER),
            Slot::Busy(name) => f.write_str(name),
        }
    }
}

/// Represents a single processing unit of the pool.
#[derive(Debug, Clone)]
pub struct Processor {
    id: ID,                     // Unique identifier for the processor
    step: TimeStep,             // Work executed per step, shared by the pool
    current: Option<usize>,     // Index of the assigned job in the run's job state
    jobs_completed: usize,      // Jobs that finished on this processor
    idle_steps: u64,            // Steps recorded without work
    timeline: Vec<Slot>,        // One slot per executed step
}

impl Processor {
    pub fn new(id: ID, step: TimeStep) -> Self {
        Self {
            id,
            step,
            current: None,
            jobs_completed: 0,
            idle_steps: 0,
            timeline: Vec::new(),
        }
    }

    /// Name used in reports, `cpu-0` for the first processor.
    pub fn name(&self) -> String {
        format!("cpu-{}", self.id)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn jobs_completed(&self) -> usize {
        self.jobs_completed
    }

    pub fn idle_time(&self) -> TimeStep {
        self.idle_steps as TimeStep * self.step
    }

    pub fn timeline(&self) -> &[Slot] {
        &self.timeline
    }

    /// Takes the job at `index`. The dispatcher guarantees the processor is idle
    /// and that no other processor holds the same job.
    pub fn assign(&mut self, index: usize) {
        debug_assert!(self.current.is_none(), "processor {} already busy", self.id);
        self.current = Some(index);
    }

    /// Executes one step and returns true if the assigned job completed.
    ///
    /// # Arguments
    /// * `jobs` - The run's job state the assignment indexes into.
    pub fn step(&mut self, jobs: &mut [Job]) -> bool {
        match self.current {
            Some(index) => {
                let job = &mut jobs[index];
                self.timeline.push(Slot::Busy(job.name().to_string()));
                trace!("{} executes {}", self.name(), job.name());
                job.advance(self.step)
            }
            None => {
                self.record_idle();
                false
            }
        }
    }

    /// Records a step without work.
    pub fn record_idle(&mut self) {
        self.timeline.push(Slot::Idle);
        self.idle_steps += 1;
    }

    /// Frees the processor after its job completed.
    pub fn release(&mut self) {
        self.jobs_completed += 1;
        self.current = None;
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.jobs_completed = 0;
        self.idle_steps = 0;
        self.timeline.clear();
    }
}
