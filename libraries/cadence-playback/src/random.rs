//! Random index selection for shuffled navigation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed list indices
pub trait IndexPicker {
    /// Pick an index in `[0, len)`
    ///
    /// `len` is never zero when called by the sequencer.
    fn pick(&mut self, len: usize) -> usize;
}

/// Picker backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl IndexPicker for ThreadRngPicker {
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic picker for reproducible sequences
#[derive(Debug, Clone)]
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IndexPicker for SeededPicker {
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_stay_in_range() {
        let mut picker = ThreadRngPicker;
        for len in 1..20 {
            for _ in 0..50 {
                assert!(picker.pick(len) < len);
            }
        }
    }

    #[test]
    fn single_element_always_zero() {
        assert_eq!(ThreadRngPicker.pick(1), 0);
        assert_eq!(SeededPicker::new(7).pick(1), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededPicker::new(42);
        let mut b = SeededPicker::new(42);
        let left: Vec<_> = (0..16).map(|_| a.pick(10)).collect();
        let right: Vec<_> = (0..16).map(|_| b.pick(10)).collect();
        assert_eq!(left, right);
    }
}
