/*!
# Nearest Neighbour Matching

Greedy matching: all pairs within the distance threshold are sorted by ascending distance and
committed in that order whenever both endpoints are still free.

The result is a *maximal* matching of the threshold graph, which is neither guaranteed to be of
maximum cardinality nor of minimum total distance. It is however fast (`O(|A| |B|)` distance
evaluations plus sorting the candidates) and matches what a human would pair up by eye.
*/

use itertools::Itertools;
use tracing::debug;

use super::*;
use crate::assignment::{Assignment, MutableAssignment, sort_by_distance};

/// Greedy closest-pair-first matcher.
///
/// # Example
/// ```
/// use bimatch::algo::*;
///
/// let a = [0.0, 1.0];
/// let b = [0.9, 2.0];
/// let matching = NearestNeighbour::new(1.0)
///     .matching(&a, &b, |x: &f64, y: &f64| (x - y).abs());
///
/// // 1.0 <=> 0.9 is the closest pair; 0.0 cannot be matched to 2.0 anymore
/// assert_eq!(matching.pairs(), &[(1, 0)]);
/// assert_eq!(matching.unmatched_a(), &[0]);
/// assert_eq!(matching.unmatched_b(), &[1]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NearestNeighbour {
    threshold: f64,
}

impl NearestNeighbour {
    /// Creates a matcher that accepts pairs with `distance <= threshold`.
    ///
    /// A `NaN` threshold accepts no pair at all.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Updates the threshold
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Computes the greedy matching.
    ///
    /// Pairs are reported in the order they were committed, i.e. by ascending distance where
    /// equal distances keep the enumeration order (ascending `a`, then ascending `b`).
    pub fn matching<A, B, F>(&self, a: &[A], b: &[B], mut distance: F) -> Matching
    where
        F: FnMut(&A, &B) -> f64,
    {
        let size_a = num_nodes_of(a);
        let size_b = num_nodes_of(b);

        if size_a == 0 || size_b == 0 {
            return Matching::unmatched(size_a, size_b);
        }

        let mut candidates = a
            .iter()
            .enumerate()
            .flat_map(|(u, x)| {
                b.iter()
                    .enumerate()
                    .map(move |(v, y)| (u as Node, v as Node, x, y))
            })
            .filter_map(|(u, v, x, y)| {
                let d = distance(x, y);
                (d <= self.threshold).then_some(MutableAssignment::new(u, v, d))
            })
            .collect_vec();

        sort_by_distance(&mut candidates);

        let max_pairs = size_a.min(size_b) as usize;
        let mut matched_a = NodeBitSet::new(size_a);
        let mut matched_b = NodeBitSet::new(size_b);
        let mut pairs = Vec::with_capacity(max_pairs.min(candidates.len()));

        for candidate in &candidates {
            let (u, v) = (candidate.target_id(), candidate.predicted_id());
            if matched_a.get_bit(u) || matched_b.get_bit(v) {
                continue;
            }

            matched_a.set_bit(u);
            matched_b.set_bit(v);
            pairs.push((u, v));

            if pairs.len() == max_pairs {
                break;
            }
        }

        debug!(
            size_a,
            size_b,
            candidates = candidates.len(),
            cardinality = pairs.len(),
            "nearest neighbour matching"
        );

        Matching::from_pairs(size_a, size_b, pairs)
    }
}

impl DistanceMatcher for NearestNeighbour {
    fn compute<A, B, F>(&self, a: &[A], b: &[B], distance: F) -> Result<Matching>
    where
        F: FnMut(&A, &B) -> f64,
    {
        Ok(self.matching(a, b, distance))
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn with_threshold(&self, threshold: f64) -> Self {
        Self { threshold }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coord::*, testing::test_distance_matcher};

    test_distance_matcher!(nearest_neighbour_invariants, NearestNeighbour::new);

    #[test]
    fn empty_sides() {
        let m = NearestNeighbour::new(1.0).matching(&[] as &[f64], &[1.0], |x, y| x - y);
        assert_eq!(m.cardinality(), 0);
        assert_eq!(m.unmatched_b(), &[0]);
    }

    #[test]
    fn closest_pairs_first() {
        let a = [BasePoint::new(0.0, 0.0), BasePoint::new(10.0, 10.0)];
        let b = [BasePoint::new(10.5, 10.5), BasePoint::new(0.5, 0.5)];

        let m = NearestNeighbour::new(1.0).matching(&a, &b, |x, y| x.distance_xy(y));
        assert_eq!(m.cardinality(), 2);
        assert_eq!(m.pairs().len(), 2);
        assert!(m.pairs().contains(&(0, 1)));
        assert!(m.pairs().contains(&(1, 0)));
    }

    #[test]
    fn greedy_may_under_match() {
        // a0 -- 1.0 -- b0 -- 0.5 -- a1 ; a0 -- 2.0 -- b1 is beyond threshold 1.5
        let dist = [[1.0, 2.0], [0.5, 5.0]];
        let a = [0usize, 1];
        let b = [0usize, 1];

        let m = NearestNeighbour::new(1.5).matching(&a, &b, |&u, &v| dist[u][v]);
        assert_eq!(m.pairs(), &[(1, 0)]);

        // with a larger threshold, both are matched
        let m = NearestNeighbour::new(2.0).matching(&a, &b, |&u, &v| dist[u][v]);
        assert_eq!(m.pairs(), &[(1, 0), (0, 1)]);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let a = [0usize, 1];
        let b = [0usize, 1];

        let m = NearestNeighbour::new(1.0).matching(&a, &b, |_, _| 1.0);
        assert_eq!(m.pairs(), &[(0, 0), (1, 1)]);
    }

    #[test]
    fn negative_zero_ties_with_zero() {
        let dist = [[0.0, 5.0], [5.0, -0.0]];
        let a = [0usize, 1];
        let b = [0usize, 1];

        let m = NearestNeighbour::new(1.0).matching(&a, &b, |&u, &v| dist[u][v]);
        assert_eq!(m.pairs(), &[(0, 0), (1, 1)]);
    }

    #[test]
    fn nan_is_never_matched() {
        let a = [0usize];
        let b = [0usize];

        assert_eq!(
            NearestNeighbour::new(1.0)
                .matching(&a, &b, |_, _| f64::NAN)
                .cardinality(),
            0
        );
        assert_eq!(
            NearestNeighbour::new(f64::NAN)
                .matching(&a, &b, |_, _| 0.0)
                .cardinality(),
            0
        );
        assert_eq!(
            NearestNeighbour::new(f64::INFINITY)
                .matching(&a, &b, |_, _| 1e300)
                .cardinality(),
            1
        );
    }
}
