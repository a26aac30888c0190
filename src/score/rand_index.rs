/*!
# Rand Index

Compares two partitions of the same `n` elements, given as one cluster label per element. Every
pair of elements is either placed together in both partitions (true positive), only in the second
(false positive), only in the first (false negative) or in neither (true negative). The Rand index
is the fraction of pairs on which both partitions agree; the adjusted Rand index corrects it for
agreement by chance.

All pair counts are derived from the contingency table of both labelings and accumulated in `u64`
with checked arithmetic.

```
use bimatch::score::*;

// label permutations describe the same partition
assert_eq!(rand_index(&[0, 0, 1, 1], &[1, 1, 0, 0]).unwrap(), 1.0);

let mut ri = RandIndex::new();
ri.compute(&[0, 0, 0, 1, 1, 1], &[0, 0, 1, 1, 2, 2]).unwrap();
assert_eq!(ri.true_positives(), 2);
assert!((ri.rand_index() - 10.0 / 15.0).abs() < 1e-12);
assert!((ri.adjusted_rand_index() - 0.8 / 3.3).abs() < 1e-12);
```
*/

use fxhash::FxHashMap;
use tracing::trace;

use crate::{error::*, utils::compact_labels};

/// Number of unordered pairs among `k` elements
fn pairs(k: u64) -> Option<u64> {
    if k % 2 == 0 {
        (k / 2).checked_mul(k.saturating_sub(1))
    } else {
        k.checked_mul((k - 1) / 2)
    }
}

fn overflow() -> MatchError {
    MatchError::overflow("pair count exceeds u64")
}

/// Sum of `pairs(c)` over all counts
fn sum_of_pairs(counts: impl IntoIterator<Item = u64>) -> Result<u64> {
    counts.into_iter().try_fold(0u64, |sum, c| {
        pairs(c)
            .and_then(|p| sum.checked_add(p))
            .ok_or_else(overflow)
    })
}

/// Labels mapped onto `0..k`. Compacts only if a label is negative or not below `n`.
fn dense_labels(labels: &[i32]) -> (Vec<u32>, usize) {
    let n = labels.len();
    let in_range = labels.iter().all(|&l| l >= 0 && (l as usize) < n);
    if in_range {
        let k = labels.iter().map(|&l| l as usize + 1).max().unwrap_or(0);
        (labels.iter().map(|&l| l as u32).collect(), k)
    } else {
        compact_labels(labels)
    }
}

/// Pair counts of the comparison of two partitions.
///
/// The state is overwritten by every call of [`RandIndex::compute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandIndex {
    number_of_elements: usize,
    true_positives: u64,
    true_positives_plus_false_positives: u64,
    true_positives_plus_false_negatives: u64,
    number_of_pairs: u64,
}

impl RandIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares the partitions `set1` and `set2` of the same elements. Labels may be arbitrary
    /// integers; only equality matters.
    ///
    /// # Errors
    /// - `InvalidArgument` if both sets have different lengths
    /// - `Overflow` if a pair count does not fit into `u64`
    pub fn compute(&mut self, set1: &[i32], set2: &[i32]) -> Result<&mut Self> {
        raise_error_unless!(
            set1.len() == set2.len(),
            MatchError::invalid_argument(
                "set2",
                format!("length {} differs from set1 of length {}", set2.len(), set1.len())
            )
        );

        let n = set1.len();
        let (labels1, clusters1) = dense_labels(set1);
        let (labels2, clusters2) = dense_labels(set2);

        let mut margin1 = vec![0u64; clusters1];
        let mut margin2 = vec![0u64; clusters2];
        for (&l1, &l2) in labels1.iter().zip(&labels2) {
            margin1[l1 as usize] += 1;
            margin2[l2 as usize] += 1;
        }

        let cells = clusters1.saturating_mul(clusters2);
        let true_positives = if cells <= n.max(1024) {
            let mut table = vec![0u64; cells];
            for (&l1, &l2) in labels1.iter().zip(&labels2) {
                table[l1 as usize * clusters2 + l2 as usize] += 1;
            }
            sum_of_pairs(table)?
        } else {
            let mut table: FxHashMap<(u32, u32), u64> = FxHashMap::default();
            for (&l1, &l2) in labels1.iter().zip(&labels2) {
                *table.entry((l1, l2)).or_default() += 1;
            }
            sum_of_pairs(table.into_values())?
        };

        trace!(n, clusters1, clusters2, cells, "contingency table");

        *self = Self {
            number_of_elements: n,
            true_positives,
            true_positives_plus_false_positives: sum_of_pairs(margin2)?,
            true_positives_plus_false_negatives: sum_of_pairs(margin1)?,
            number_of_pairs: pairs(n as u64).ok_or_else(overflow)?,
        };

        Ok(self)
    }

    /// Number of compared elements
    pub fn number_of_elements(&self) -> usize {
        self.number_of_elements
    }

    /// Pairs in the same cluster in both partitions
    pub fn true_positives(&self) -> u64 {
        self.true_positives
    }

    /// Pairs in the same cluster only in the second partition
    pub fn false_positives(&self) -> u64 {
        self.true_positives_plus_false_positives - self.true_positives
    }

    /// Pairs in the same cluster only in the first partition
    pub fn false_negatives(&self) -> u64 {
        self.true_positives_plus_false_negatives - self.true_positives
    }

    /// Pairs in different clusters in both partitions
    pub fn true_negatives(&self) -> u64 {
        self.number_of_pairs - self.true_positives_plus_false_positives - self.false_negatives()
    }

    /// Fraction of pairs both partitions agree on. Defined as `0` for no and `1` for a single
    /// element.
    pub fn rand_index(&self) -> f64 {
        match self.number_of_elements {
            0 => 0.0,
            1 => 1.0,
            _ => {
                (self.true_positives + self.true_negatives()) as f64 / self.number_of_pairs as f64
            }
        }
    }

    /// Rand index adjusted for chance: `1` for identical partitions, about `0` for random ones.
    /// Defined as `0` for no and `1` for a single element.
    pub fn adjusted_rand_index(&self) -> f64 {
        match self.number_of_elements {
            0 => return 0.0,
            1 => return 1.0,
            _ => {}
        }

        let index = self.true_positives as f64;
        let pairs1 = self.true_positives_plus_false_negatives as f64;
        let pairs2 = self.true_positives_plus_false_positives as f64;
        let expected = pairs1 * pairs2 / self.number_of_pairs as f64;
        let max = 0.5 * (pairs1 + pairs2);

        if max == expected {
            return 1.0;
        }
        (index - expected) / (max - expected)
    }
}

/// Rand index of two partitions, see [`RandIndex`]
pub fn rand_index(set1: &[i32], set2: &[i32]) -> Result<f64> {
    Ok(RandIndex::new().compute(set1, set2)?.rand_index())
}

/// Adjusted Rand index of two partitions, see [`RandIndex`]
pub fn adjusted_rand_index(set1: &[i32], set2: &[i32]) -> Result<f64> {
    Ok(RandIndex::new().compute(set1, set2)?.adjusted_rand_index())
}
