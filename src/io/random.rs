//! Randomness used to place field-test groups.
//!
//! Placement only ever needs "a number below `bound`". Production code draws from
//! the thread RNG; tests inject a seeded or scripted source to assert exact
//! positions.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource: Send + Sync {
    /// A value in `0..bound`. `bound` is never zero.
    fn next_below(&self, bound: u32) -> u32;
}

/// Draws from `rand`'s thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_below(&self, bound: u32) -> u32 {
        rand::rng().random_range(0..bound.max(1))
    }
}

/// Reproducible draws from a seeded `StdRng`.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&self, bound: u32) -> u32 {
        self.rng.lock().random_range(0..bound.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_stay_below_bound() {
        let random = ThreadRandom;
        for _ in 0..200 {
            assert!(random.next_below(7) < 7);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let first: Vec<u32> = (0..10).map(|_| a.next_below(1000)).collect();
        let second: Vec<u32> = (0..10).map(|_| b.next_below(1000)).collect();
        assert_eq!(first, second);
    }
}
