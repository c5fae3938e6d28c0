//! Pluggable data-generation strategies.
//!
//! `FieldSampler` supplies the randomised fields (class capacity, attendance
//! presence, result score); `AssignmentPolicy` decides which record of a pool
//! a new row points at.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const CAPACITY_RANGE: RangeInclusive<i32> = 15..=20;
pub const SCORE_RANGE: RangeInclusive<i32> = 60..=100;
pub const PRESENT_PROBABILITY: f64 = 0.9;

pub trait FieldSampler: Send {
    fn class_capacity(&mut self) -> i32;
    fn is_present(&mut self) -> bool;
    fn score(&mut self) -> i32;
}

/// Uniform sampling within the documented ranges.
pub struct RandomSampler<R = StdRng> {
    rng: R,
}

impl RandomSampler<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible sampler, the same seed yields the same dataset.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> FieldSampler for RandomSampler<R> {
    fn class_capacity(&mut self) -> i32 {
        self.rng.random_range(CAPACITY_RANGE)
    }

    fn is_present(&mut self) -> bool {
        self.rng.random_bool(PRESENT_PROBABILITY)
    }

    fn score(&mut self) -> i32 {
        self.rng.random_range(SCORE_RANGE)
    }
}

pub trait AssignmentPolicy: Send + Sync {
    /// Position in a pool of `len` records for the `index`-th new row,
    /// `None` when nothing can be picked.
    fn pick(&self, index: usize, len: usize) -> Option<usize>;
}

/// `index mod len`, the sample dataset's pairing rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl AssignmentPolicy for RoundRobin {
    fn pick(&self, index: usize, len: usize) -> Option<usize> {
        (len > 0).then(|| index % len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_fields_stay_in_range() {
        let mut sampler = RandomSampler::from_seed(7);
        for _ in 0..1_000 {
            assert!(CAPACITY_RANGE.contains(&sampler.class_capacity()));
            assert!(SCORE_RANGE.contains(&sampler.score()));
        }
    }

    #[test]
    fn presence_rate_is_close_to_ninety_percent() {
        let mut sampler = RandomSampler::from_seed(42);
        let samples = 10_000;
        let present = (0..samples).filter(|_| sampler.is_present()).count();
        let rate = present as f64 / samples as f64;
        assert!((rate - PRESENT_PROBABILITY).abs() < 0.02, "rate was {rate}");
    }

    #[test]
    fn same_seed_gives_same_samples() {
        let mut a = RandomSampler::from_seed(3);
        let mut b = RandomSampler::from_seed(3);
        let left: Vec<i32> = (0..20).map(|_| a.score()).collect();
        let right: Vec<i32> = (0..20).map(|_| b.score()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn round_robin_wraps_and_rejects_empty_pool() {
        let policy = RoundRobin;
        assert_eq!(policy.pick(0, 6), Some(0));
        assert_eq!(policy.pick(7, 6), Some(1));
        assert_eq!(policy.pick(3, 0), None);
    }
}
