use log::{debug, info, warn};

use super::Policy;
use crate::constants::{DEFAULT_STEP, DEFAULT_UNITS};
use crate::{Job, JobSet, Processor, SchedulingError, Slot, TimeStep, ID};

/// Parameters of the processor pool shared by every run of a simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub units: usize,             // Number of identical processors
    pub step: TimeStep,           // Duration of one simulation step
    pub record_starvation: bool,  // Record idle slots on steps where nothing is runnable
}

impl SimulationConfig {
    pub fn new(units: usize, step: TimeStep) -> Self {
        Self {
            units,
            step,
            record_starvation: false,
        }
    }

    pub fn with_starvation_recording(mut self, record: bool) -> Self {
        self.record_starvation = record;
        self
    }

    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.units == 0 {
            return Err(SchedulingError::InvalidConfig("at least one processor is required".into()));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SchedulingError::InvalidConfig(format!(
                "step duration must be positive, got {}",
                self.step
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_UNITS, DEFAULT_STEP)
    }
}

/// Outcome of one policy run over a job set.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub policy: Policy,
    pub missed: Vec<String>,
    pub timelines: Vec<Vec<Slot>>,
    pub finish_times: Vec<(String, TimeStep)>,
    pub idle_times: Vec<TimeStep>,
    pub jobs_completed: Vec<usize>,
    pub makespan: TimeStep,
}

impl SimulationReport {
    pub fn missed_count(&self) -> usize {
        self.missed.len()
    }

    pub fn all_deadlines_met(&self) -> bool {
        self.missed.is_empty()
    }

    pub fn total_idle_time(&self) -> TimeStep {
        self.idle_times.iter().sum()
    }
}

/// Time-stepped dispatcher of a job set over a fixed pool of processors.
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,   // Pool size, step duration and starvation recording
    job_set: JobSet,            // Job definitions, replayed by every run
    processors: Vec<Processor>, // The processor pool, in assignment order
    jobs: Vec<Job>,             // Execution state of the current run
    policy: Option<Policy>,     // Policy of the current run, `None` before `start`
    order: Vec<usize>,          // Job indices in the policy's priority order
    eligible: Vec<usize>,       // Released, incomplete and unassigned jobs in priority order
    completed: Vec<bool>,       // Completion flag per job
    completed_count: usize,     // Number of set flags in `completed`
    tick: u64,                  // Steps elapsed since the run started
    time: TimeStep,             // Simulated clock, `tick * step`
    ceiling: TimeStep,          // Clock value past which the run is considered stalled
}

impl Simulator {
    /// Creates a simulator for `job_set` on the pool described by `config`.
    ///
    /// # Arguments
    /// * `job_set` - The jobs to schedule. Admission is checked when a run starts.
    /// * `config` - The pool parameters.
    ///
    /// # Returns
    /// The simulator, or `InvalidConfig` if the pool parameters are unusable.
    pub fn new(job_set: JobSet, config: SimulationConfig) -> Result<Self, SchedulingError> {
        config.validate()?;

        let processors = (0..config.units)
            .map(|id| Processor::new(id as ID, config.step))
            .collect();
        let jobs = job_set.instantiate();
        let completed = vec![false; jobs.len()];

        Ok(Self {
            config,
            job_set,
            processors,
            jobs,
            policy: None,
            order: Vec::new(),
            eligible: Vec::new(),
            completed,
            completed_count: 0,
            tick: 0,
            time: 0.0,
            ceiling: 0.0,
        })
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn eligible(&self) -> &[usize] {
        &self.eligible
    }

    pub fn time(&self) -> TimeStep {
        self.time
    }

    pub fn is_done(&self) -> bool {
        self.completed_count == self.jobs.len()
    }

    /// Restores every job and processor to its initial state and rewinds the clock.
    /// Job definitions are kept so the same batch can be replayed.
    pub fn reset_state(&mut self) {
        self.jobs = self.job_set.instantiate();
        self.processors.iter_mut().for_each(Processor::reset);
        self.policy = None;
        self.order.clear();
        self.eligible.clear();
        self.completed = vec![false; self.jobs.len()];
        self.completed_count = 0;
        self.tick = 0;
        self.time = 0.0;
        self.ceiling = 0.0;
    }

    /// Runs `policy` over the job set until every job has completed.
    ///
    /// # Returns
    /// The run's report, or the admission failure that kept the run from starting.
    pub fn run(&mut self, policy: Policy) -> Result<SimulationReport, SchedulingError> {
        self.start(policy)?;

        while !self.is_done() {
            self.step()?;
        }

        let report = self.report(policy);
        info!(
            "{} finished at t={} with {} missed deadline(s)",
            policy,
            report.makespan,
            report.missed_count()
        );
        Ok(report)
    }

    /// Checks admission and prepares a fresh run of `policy`.
    pub fn start(&mut self, policy: Policy) -> Result<(), SchedulingError> {
        self.job_set.all_jobs_executable()?;
        self.reset_state();

        let n = self.jobs.len() as TimeStep;
        self.ceiling = self.job_set.max_release()
            + self.job_set.total_execution()
            + (n + 1.0) * self.config.step;
        self.order = policy.order(&self.jobs, self.time);
        self.policy = Some(policy);

        info!(
            "Running {} over {} job(s) on {} processor(s)",
            policy,
            self.jobs.len(),
            self.processors.len()
        );
        Ok(())
    }

    /// Advances the simulation by one step.
    pub fn step(&mut self) -> Result<(), SchedulingError> {
        let policy = self.policy.ok_or(SchedulingError::NotStarted)?;
        if self.is_done() {
            return Ok(());
        }
        if self.time > self.ceiling {
            warn!("Run stalled at t={} with {} job(s) left", self.time, self.jobs.len() - self.completed_count);
            return Err(SchedulingError::Stalled { time: self.time });
        }

        if policy.is_dynamic() {
            self.order = policy.order(&self.jobs, self.time);
        }
        self.get_eligible_jobs();

        // Nothing released is left to run
        if self.eligible.is_empty() && self.processors.iter().all(Processor::is_idle) {
            if self.config.record_starvation {
                self.processors.iter_mut().for_each(Processor::record_idle);
            }
            self.advance_clock();
            return Ok(());
        }

        self.assign_idle_processors();
        self.execute();
        self.advance_clock();
        Ok(())
    }

    /// The clock is derived from the tick count so fractional steps do not drift.
    fn advance_clock(&mut self) {
        self.tick += 1;
        self.time = self.tick as TimeStep * self.config.step;
    }

    /// Fills `eligible` with released, incomplete and unassigned jobs in priority order.
    fn get_eligible_jobs(&mut self) {
        let t = self.time;
        let eligible: Vec<usize> = self
            .order
            .iter()
            .copied()
            .filter(|&index| {
                self.jobs[index].is_released(t) && !self.completed[index] && !self.is_assigned(index)
            })
            .collect();
        self.eligible = eligible;
    }

    fn is_assigned(&self, index: usize) -> bool {
        self.processors.iter().any(|cpu| cpu.current() == Some(index))
    }

    /// Each idle processor, in pool order, takes the highest priority unclaimed job.
    fn assign_idle_processors(&mut self) {
        for p in 0..self.processors.len() {
            if self.eligible.is_empty() {
                break;
            }
            if !self.processors[p].is_idle() {
                continue;
            }

            let index = self.eligible[0];
            debug_assert!(!self.is_assigned(index), "job {index} already assigned");
            self.processors[p].assign(index);
            debug!(
                "t={}: {} takes {}",
                self.time,
                self.processors[p].name(),
                self.jobs[index].name()
            );

            self.get_eligible_jobs();
        }
    }

    /// Steps every processor and harvests completions.
    fn execute(&mut self) {
        let now = self.time;
        for cpu in self.processors.iter_mut() {
            if !cpu.step(&mut self.jobs) {
                continue;
            }
            if let Some(index) = cpu.current() {
                self.jobs[index].set_finish_time(now);
                self.completed[index] = true;
                self.completed_count += 1;
                debug!("t={}: {} completed on {}", now, self.jobs[index].name(), cpu.name());
                cpu.release();
            }
        }
    }

    /// Names of the jobs that finished after their deadline.
    pub fn handle_misses(&self) -> Vec<String> {
        let misses: Vec<String> = self
            .jobs
            .iter()
            .filter(|job| job.is_missed())
            .map(|job| job.name().to_string())
            .collect();

        if misses.is_empty() {
            info!("All jobs completed with no problem");
        } else {
            warn!(
                "{} job(s) have missed their deadline: {}",
                misses.len(),
                misses.join(", ")
            );
        }
        misses
    }

    fn report(&self, policy: Policy) -> SimulationReport {
        SimulationReport {
            policy,
            missed: self.handle_misses(),
            timelines: self.processors.iter().map(|cpu| cpu.timeline().to_vec()).collect(),
            finish_times: self
                .jobs
                .iter()
                .filter_map(|job| job.finish_time().map(|t| (job.name().to_string(), t)))
                .collect(),
            idle_times: self.processors.iter().map(Processor::idle_time).collect(),
            jobs_completed: self.processors.iter().map(Processor::jobs_completed).collect(),
            makespan: self.time,
        }
    }
}

/// Runs `policy` over `job_set` on a fresh pool.
///
/// # Returns
/// The number of missed deadlines and one timeline per processor.
pub fn run(
    policy: Policy,
    job_set: &JobSet,
    unit_count: usize,
    step: TimeStep,
) -> Result<(usize, Vec<Vec<Slot>>), SchedulingError> {
    let mut simulator = Simulator::new(job_set.clone(), SimulationConfig::new(unit_count, step))?;
    let report = simulator.run(policy)?;
    Ok((report.missed_count(), report.timelines))
}
