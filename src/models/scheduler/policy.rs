use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Job, TimeStep};

/// Dispatch policy deciding which ready job gets a free processor first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Earliest Deadline First
    EarliestDeadlineFirst,
    /// Shortest Job First
    ShortestJobFirst,
    /// Least Slack Time, re-evaluated every step
    LeastSlackTime,
    /// First Come First Served
    FirstComeFirstServed,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::EarliestDeadlineFirst,
        Policy::ShortestJobFirst,
        Policy::LeastSlackTime,
        Policy::FirstComeFirstServed,
    ];

    /// Whether the ordering depends on the current time and must be rebuilt every step.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Policy::LeastSlackTime)
    }

    fn key(&self, job: &Job, t: TimeStep) -> TimeStep {
        match self {
            Policy::EarliestDeadlineFirst => job.deadline(),
            Policy::ShortestJobFirst => job.execution_time(),
            Policy::LeastSlackTime => job.slack(t),
            Policy::FirstComeFirstServed => job.release_time(),
        }
    }

    /// Compares two jobs by priority at time `t`, `Less` meaning `a` goes first.
    pub fn compare(&self, a: &Job, b: &Job, t: TimeStep) -> Ordering {
        self.key(a, t).total_cmp(&self.key(b, t))
    }

    /// Indices of `jobs` in priority order. The sort is stable so equal keys keep
    /// their insertion order.
    pub fn order(&self, jobs: &[Job], t: TimeStep) -> Vec<usize> {
        let mut order: Vec<usize> = (0..jobs.len()).collect();
        order.sort_by(|&a, &b| self.compare(&jobs[a], &jobs[b], t));
        order
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Policy::EarliestDeadlineFirst => "EDF",
            Policy::ShortestJobFirst => "SJF",
            Policy::LeastSlackTime => "LST",
            Policy::FirstComeFirstServed => "FCFS",
        };
        f.write_str(label)
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "edf" => Ok(Policy::EarliestDeadlineFirst),
            "sjf" => Ok(Policy::ShortestJobFirst),
            "lst" => Ok(Policy::LeastSlackTime),
            "fcfs" => Ok(Policy::FirstComeFirstServed),
            other => Err(format!("unknown policy '{other}', expected edf, sjf, lst or fcfs")),
        }
    }
}
