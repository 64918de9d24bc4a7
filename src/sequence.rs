//! # Sequence operations
//!
//! In-place operations over ordered sequences used by breeding and mutation:
//!
//! - [`shuffle`]: Fisher–Yates permutation.
//! - [`create_distribution`]: expands weighted items into a sequence whose
//!   frequencies follow the weights.
//! - [`crossover`]: multi-point crossover of two sequences.
//!
//! ## Example
//!
//! ```rust
//! use neurogen::sequence::crossover;
//!
//! let mut a = vec![1, 2, 3, 4, 5];
//! let mut b = vec![6, 7, 8, 9, 0];
//! crossover(&mut a, &mut b, &[1, 3]);
//!
//! assert_eq!(a, vec![1, 7, 8, 4, 5]);
//! assert_eq!(b, vec![6, 2, 3, 9, 0]);
//! ```

use crate::rng::RandomNumberGenerator;

/// Shuffles `items` in place.
///
/// Every permutation is equally likely and the multiset of elements is preserved.
pub fn shuffle<T>(items: &mut [T], rng: &mut RandomNumberGenerator) {
    for i in (1..items.len()).rev() {
        let j = rng.rand_int_inclusive(0, i);
        items.swap(i, j);
    }
}

/// Creates a sequence of roughly `size` elements in which `items[i]` appears
/// `round(size * weights[i] / sum(weights))` times.
///
/// Items keep their input order, so equal weights give a deterministic layout.
/// Missing weights count as zero, and a non-positive total yields an empty sequence.
pub fn create_distribution<T: Clone>(items: &[T], weights: &[f64], size: usize) -> Vec<T> {
    let sum: f64 = weights.iter().take(items.len()).sum();
    if sum.is_nan() || sum <= 0.0 {
        return Vec::new();
    }

    let quant = size as f64 / sum;
    let mut distribution = Vec::with_capacity(size + items.len());
    for (item, weight) in items.iter().zip(weights) {
        let count = (quant * weight).round().max(0.0) as usize;
        distribution.extend(std::iter::repeat(item).take(count).cloned());
    }
    distribution
}

/// Crosses over `a` and `b` in place at each of the given pivots.
///
/// Pivots are applied in ascending order. Each pivot `p` swaps `a[p..n]` with
/// `b[p..n]`, where `n` is the length of the shorter sequence, so consecutive
/// pivots produce alternating bands. A pivot greater than `n` leaves both
/// sequences untouched for that pivot, and elements of the longer sequence past
/// `n` are never moved.
pub fn crossover<T>(a: &mut [T], b: &mut [T], pivots: &[usize]) {
    let length = a.len().min(b.len());
    let mut sorted = pivots.to_vec();
    sorted.sort_unstable();

    for pivot in sorted {
        if pivot > length {
            continue;
        }
        a[pivot..length].swap_with_slice(&mut b[pivot..length]);
    }
}

/// Distinct pivots at 25, 50 and 75 percent of `length`.
///
/// Short sequences collapse to one or two pivots.
pub fn quarter_pivots(length: usize) -> Vec<usize> {
    let mut pivots = vec![length / 4, length / 2, length * 3 / 4];
    pivots.dedup();
    pivots
}
