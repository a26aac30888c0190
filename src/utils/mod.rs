/*!
# Utilities

Small numeric helpers shared by the scoring code:
- [`div_zero`] for ratios that are defined as `0` on an empty denominator,
- [`Probability`] to validate probabilities of the simulators,
- [`compact_labels`] to map arbitrary cluster labels onto `0..k`.
*/

use fxhash::FxHashMap;
use num::{Float, One, Zero};

/// Helper trait for probabilities
pub trait Probability {
    /// Returns *true* if the probability is valid (ie. between `0` and `1`)
    fn is_valid_probability(&self) -> bool;
}

impl<P> Probability for P
where
    P: Zero + One + PartialOrd,
{
    fn is_valid_probability(&self) -> bool {
        Self::zero().le(self) && Self::one().ge(self)
    }
}

/// Computes `numerator / denominator`, or `0` if the denominator is zero.
///
/// ```
/// use bimatch::utils::div_zero;
///
/// assert_eq!(div_zero(3.0, 4.0), 0.75);
/// assert_eq!(div_zero(3.0, 0.0), 0.0);
/// ```
#[inline]
pub fn div_zero<T: Float>(numerator: T, denominator: T) -> T {
    if denominator.is_zero() {
        T::zero()
    } else {
        numerator / denominator
    }
}

/// Maps every distinct label onto `0..k` in order of first occurrence.
/// Returns the compacted labels and `k`.
///
/// ```
/// use bimatch::utils::compact_labels;
///
/// let (labels, k) = compact_labels(&[7, -3, 7, 100]);
/// assert_eq!(labels, vec![0, 1, 0, 2]);
/// assert_eq!(k, 3);
/// ```
pub fn compact_labels(labels: &[i32]) -> (Vec<u32>, usize) {
    let mut ids: FxHashMap<i32, u32> = FxHashMap::default();
    let compacted = labels
        .iter()
        .map(|&label| {
            let next = ids.len() as u32;
            *ids.entry(label).or_insert(next)
        })
        .collect();
    (compacted, ids.len())
}
