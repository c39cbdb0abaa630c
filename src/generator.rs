//! Synthetic job sets. Every generated job is feasible: its deadline is at least
//! its release time plus its execution requirement.

use rand::Rng;

use crate::constants::Generator;
use crate::{JobSet, TimeStep};

/// Jobs whose release times spread with their index and whose deadline slack
/// grows with the pool size.
///
/// Job `n` gets `r = step * U[0, n + 1]`, `e = step * U[1, n_jobs]` and
/// `d = r + e + step * U[0, n_jobs * units]`.
pub fn semi_random<R: Rng>(rng: &mut R, n_jobs: usize, units: usize, step: TimeStep) -> JobSet {
    let n_jobs_max = n_jobs.max(1);
    JobSet::from_triples((0..n_jobs).map(|n| {
        let r = step * rng.random_range(0..=n + 1) as TimeStep;
        let e = step * rng.random_range(1..=n_jobs_max) as TimeStep;
        let d = r + e + step * rng.random_range(0..=n_jobs * units) as TimeStep;
        (r, e, d)
    }))
}

/// Independent jobs: `r = units * U[0, 25]`, `e = step * U[1, 50]`,
/// `d = r + e + step * U[0, 100]`.
pub fn random<R: Rng>(rng: &mut R, n_jobs: usize, units: usize, step: TimeStep) -> JobSet {
    JobSet::from_triples((0..n_jobs).map(|_| {
        let r = (units * rng.random_range(0..=25usize)) as TimeStep;
        let e = step * rng.random_range(1..=50u32) as TimeStep;
        let d = r + e + step * rng.random_range(0..=100u32) as TimeStep;
        (r, e, d)
    }))
}

pub fn generate<R: Rng>(
    generator: Generator,
    rng: &mut R,
    n_jobs: usize,
    units: usize,
    step: TimeStep,
) -> JobSet {
    match generator {
        Generator::SemiRandom => semi_random(rng, n_jobs, units, step),
        Generator::Random => random(rng, n_jobs, units, step),
    }
}
