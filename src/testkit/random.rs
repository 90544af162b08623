//! Scripted randomness.

use crate::io::RandomSource;
use parking_lot::Mutex;

/// Replays `draws` in order, cycling when exhausted.
///
/// Each draw is reduced modulo the requested bound, so a script can be reused
/// with any bound. An empty script always yields zero.
#[derive(Debug)]
pub struct SequenceRandom {
    draws: Vec<u32>,
    cursor: Mutex<usize>,
}

impl SequenceRandom {
    pub fn new(draws: Vec<u32>) -> Self {
        Self {
            draws,
            cursor: Mutex::new(0),
        }
    }

    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far.
    pub fn calls(&self) -> usize {
        *self.cursor.lock()
    }
}

impl RandomSource for SequenceRandom {
    fn next_below(&self, bound: u32) -> u32 {
        let mut cursor = self.cursor.lock();
        let draw = match self.draws.len() {
            0 => 0,
            len => self.draws[*cursor % len],
        };
        *cursor += 1;
        draw % bound.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_and_cycles() {
        let random = SequenceRandom::new(vec![3, 8]);
        let draws: Vec<u32> = (0..4).map(|_| random.next_below(100)).collect();
        assert_eq!(draws, vec![3, 8, 3, 8]);
        assert_eq!(random.calls(), 4);
    }

    #[test]
    fn test_draws_respect_bound() {
        let random = SequenceRandom::constant(1234);
        assert_eq!(random.next_below(1000), 234);
        assert_eq!(SequenceRandom::new(vec![]).next_below(5), 0);
    }
}
