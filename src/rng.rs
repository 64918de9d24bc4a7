//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single source of randomness for the
//! engine: genome synthesis, weight initialization, parent selection, crossover
//! and mutation all draw from it. It wraps the `rand` crate's `StdRng` so that a
//! whole run can be made reproducible with [`RandomNumberGenerator::from_seed`].
//!
//! ## Example
//!
//! ```rust
//! use neurogen::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let layers = rng.rand_int_inclusive(1, 4);
//! assert!((1..=4).contains(&layers));
//!
//! let alpha = rng.rand_float_rounded(0.001, 0.1, 4);
//! assert!((0.001..=0.1).contains(&alpha));
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// A wrapper around the `rand` crate's `StdRng` that provides the bounded draws
/// the engine needs.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `num` random numbers in `[from, to)`.
    ///
    /// Returns an empty queue when `num` is zero or the range is empty.
    pub fn fetch_uniform(&mut self, from: f64, to: f64, num: usize) -> VecDeque<f64> {
        let mut uniform_numbers = VecDeque::with_capacity(num);
        if from < to {
            uniform_numbers.extend((0..num).map(|_| self.rng.gen_range(from..to)));
        }
        uniform_numbers
    }

    /// Returns an integer in `[min, max)`, or `min` when the range is empty.
    pub fn rand_int(&mut self, min: usize, max: usize) -> usize {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Returns an integer in `[min, max]`, or `min` when `max < min`.
    pub fn rand_int_inclusive(&mut self, min: usize, max: usize) -> usize {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Returns a float in `[min, max]`.
    pub fn rand_float(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Returns a float in `[min, max]` rounded to `decimals` decimal places.
    pub fn rand_float_rounded(&mut self, min: f64, max: f64, decimals: u32) -> f64 {
        round_to(self.rand_float(min, max), decimals)
    }

    /// Returns `true` with probability `rate`. Rates outside `[0, 1]` are clamped.
    pub fn probability(&mut self, rate: f64) -> bool {
        if rate.is_nan() {
            return false;
        }
        self.rng.gen_bool(rate.clamp(0.0, 1.0))
    }

    /// A fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_uniform_with_positive_range() {
        let mut rng = RandomNumberGenerator::new();
        let result = rng.fetch_uniform(0.0, 1.0, 5);

        assert_eq!(result.len(), 5);
        for &num in result.iter() {
            assert!((0.0..1.0).contains(&num));
        }
    }

    #[test]
    fn test_fetch_uniform_with_empty_result() {
        let mut rng = RandomNumberGenerator::new();
        assert!(rng.fetch_uniform(1.0, 2.0, 0).is_empty());
        assert!(rng.fetch_uniform(2.0, 1.0, 4).is_empty());
    }

    #[test]
    fn test_rand_int_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        for _ in 0..1000 {
            assert!((0..4).contains(&rng.rand_int(0, 4)));
            assert!((1..=4).contains(&rng.rand_int_inclusive(1, 4)));
        }
        assert_eq!(rng.rand_int(3, 3), 3);
        assert_eq!(rng.rand_int_inclusive(5, 5), 5);
    }

    #[test]
    fn test_rand_int_inclusive_reaches_upper_bound() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let hits = (0..1000).filter(|_| rng.rand_int_inclusive(1, 3) == 3).count();
        assert!(hits > 0);
    }

    #[test]
    fn test_rand_float_rounded() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        for _ in 0..100 {
            let value = rng.rand_float_rounded(0.001, 0.999, 4);
            assert!((0.001..=0.999).contains(&value));
            assert!((value * 10_000.0 - (value * 10_000.0).round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_probability_extremes() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        assert!((0..100).all(|_| !rng.probability(0.0)));
        assert!((0..100).all(|_| rng.probability(1.0)));
        assert!(!rng.probability(f64::NAN));
        assert!(rng.probability(3.0));
    }

    #[test]
    fn test_clone() {
        let mut rng1 = RandomNumberGenerator::from_seed(42);
        let mut rng2 = rng1.clone();

        let nums1 = rng1.fetch_uniform(0.0, 1.0, 5);
        let nums2 = rng2.fetch_uniform(0.0, 1.0, 5);

        assert_eq!(nums1, nums2);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(2.5, 0), 3.0);
    }
}
