use log::warn;

use super::{Job, TimeStep};
use crate::SchedulingError;

/// Immutable job definitions shared by every run of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSet {
    jobs: Vec<Job>,
}

impl JobSet {
    pub fn new(mut jobs: Vec<Job>) -> Self {
        jobs.iter_mut().for_each(Job::reset);
        Self { jobs }
    }

    /// Builds a set from `(release, execution, deadline)` triples, naming jobs `J0..Jn`.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (TimeStep, TimeStep, TimeStep)>,
    {
        Self::new(
            triples
                .into_iter()
                .enumerate()
                .map(|(n, (r, e, d))| Job::new(format!("J{n}"), r, e, d))
                .collect(),
        )
    }

    pub fn get_jobs(&self) -> &Vec<Job> {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    /// Fresh per-run execution state for every job, in insertion order.
    pub fn instantiate(&self) -> Vec<Job> {
        self.jobs
            .iter()
            .cloned()
            .map(|mut job| {
                job.reset();
                job
            })
            .collect()
    }

    pub fn max_release(&self) -> TimeStep {
        self.jobs.iter().map(Job::release_time).fold(0.0, TimeStep::max)
    }

    pub fn total_execution(&self) -> TimeStep {
        self.jobs.iter().map(Job::execution_time).sum()
    }

    /// Admission test run before any simulation.
    pub fn all_jobs_executable(&self) -> Result<(), SchedulingError> {
        if self.jobs.is_empty() {
            warn!("No jobs to test");
            return Err(SchedulingError::EmptyJobSet);
        }

        if let Some(job) = self.jobs.iter().find(|job| !job.is_feasible()) {
            warn!("Job {} cannot be executed", job);
            return Err(SchedulingError::InfeasibleJob {
                name: job.name().to_string(),
                release: job.release_time(),
                execution: job.execution_time(),
                deadline: job.deadline(),
            });
        }

        Ok(())
    }
}
