/*!
# Minimum Distance Matching

Computes a matching that minimizes the sum of distances among all pairs within a threshold by
reducing the problem to a linear assignment problem solved by [`KuhnMunkres`].

Real-valued distances are discretized into integer costs in `0..=MAX_COST` based on the smallest
and largest in-threshold distance, so the solver works on exact integers. Pairs beyond the
threshold receive [`DISALLOWED_COST`], which exceeds the cost of any two legitimate pairs
combined. Hence the solver always prefers two pairs of maximal cost over one optimal pair plus a
disallowed one. Every pair proposed by the solver is validated against the real distance again.

Only vertices with at least one in-threshold partner enter the assignment problem; all others are
reported unmatched directly. The assignment runs in `O(n^3)` for `n = max(|A'|, |B'|)`. For large
sparse problems, [`MinimumDistance::split_components`] solves each connected component of the
threshold graph on its own.
*/

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, trace};

use super::*;

/// Largest discretized cost of a pair within the threshold
pub const MAX_COST: i64 = 65536;

/// Cost of a pair beyond the threshold. Must exceed `2 * MAX_COST`.
pub const DISALLOWED_COST: i64 = 2 * MAX_COST + 1;

/// Largest number of cells of a single packed cost matrix
const MAX_CELLS: usize = i32::MAX as usize;

/// Matcher minimizing the sum of distances of all pairs within a threshold.
///
/// # Example
/// ```
/// use bimatch::algo::*;
///
/// let a = [0.0, 1.0];
/// let b = [0.9, 2.0];
/// let dist = |x: &f64, y: &f64| (x - y).abs();
///
/// // The greedy matcher pairs the closest pair 1.0 <=> 0.9 and is stuck afterwards
/// assert_eq!(NearestNeighbour::new(1.0).matching(&a, &b, dist).cardinality(), 1);
///
/// // Minimizing the total distance finds both pairs
/// let matching = MinimumDistance::new(1.0).matching(&a, &b, dist).unwrap();
/// assert_eq!(matching.pairs(), &[(0, 0), (1, 1)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MinimumDistance {
    threshold: f64,
    split_components: bool,
}

impl MinimumDistance {
    /// Creates a matcher that accepts pairs with `distance <= threshold`.
    /// The threshold must be finite (checked when computing a matching).
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            split_components: false,
        }
    }

    /// If set, every connected component of the threshold graph is solved independently.
    /// This bounds the size of each assignment problem by the size of the largest component.
    pub fn set_split_components(&mut self, split: bool) {
        self.split_components = split;
    }

    /// Builder variant of [`MinimumDistance::set_split_components`]
    pub fn split_components(mut self, split: bool) -> Self {
        self.set_split_components(split);
        self
    }

    /// Computes the matching. Pairs are reported in ascending order of their vertex in `A`.
    ///
    /// # Errors
    /// - `InvalidArgument` if the threshold is not finite
    /// - `Overflow` if a cost matrix has more than `i32::MAX` cells
    pub fn matching<A, B, F>(&self, a: &[A], b: &[B], mut distance: F) -> Result<Matching>
    where
        F: FnMut(&A, &B) -> f64,
    {
        check_finite_threshold(self.threshold)?;

        let size_a = num_nodes_of(a);
        let size_b = num_nodes_of(b);

        let mut within = FxHashMap::default();
        for (u, x) in a.iter().enumerate() {
            for (v, y) in b.iter().enumerate() {
                let d = distance(x, y);
                if d <= self.threshold {
                    within.insert((u as Node, v as Node), d);
                }
            }
        }

        if within.is_empty() {
            return Ok(Matching::unmatched(size_a, size_b));
        }

        // Only vertices with at least one partner enter the assignment problem
        let indices_a = within.keys().map(|&(u, _)| u).sorted().dedup().collect_vec();
        let indices_b = within.keys().map(|&(_, v)| v).sorted().dedup().collect_vec();

        let groups = if self.split_components {
            extract_bipartite_subgraphs(
                indices_a.len() as NumNodes,
                indices_b.len() as NumNodes,
                |u, v| within.contains_key(&(indices_a[u as usize], indices_b[v as usize])),
            )
            .into_iter()
            .map(|s| {
                (
                    s.indices_a.iter().map(|&u| indices_a[u as usize]).collect_vec(),
                    s.indices_b.iter().map(|&v| indices_b[v as usize]).collect_vec(),
                )
            })
            .collect_vec()
        } else {
            vec![(indices_a, indices_b)]
        };

        let mut pairs = Vec::new();
        for (group_a, group_b) in &groups {
            self.solve_group(group_a, group_b, &within, &mut pairs)?;
        }
        pairs.sort_unstable();

        debug!(
            size_a,
            size_b,
            candidates = within.len(),
            groups = groups.len(),
            cardinality = pairs.len(),
            "minimum distance matching"
        );

        Ok(Matching::from_pairs(size_a, size_b, pairs))
    }

    /// Solves the assignment problem between `group_a` and `group_b` and appends all valid
    /// pairs to `pairs`
    fn solve_group(
        &self,
        group_a: &[Node],
        group_b: &[Node],
        within: &FxHashMap<(Node, Node), f64>,
        pairs: &mut Vec<(Node, Node)>,
    ) -> Result<()> {
        let n = group_a.len().max(group_b.len());
        let cells = n
            .checked_mul(n)
            .filter(|&cells| cells <= MAX_CELLS)
            .ok_or_else(|| MatchError::overflow("cost matrix exceeds i32::MAX cells"))?;

        let (min, max) = group_a
            .iter()
            .cartesian_product(group_b.iter())
            .filter_map(|(&u, &v)| within.get(&(u, v)).copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            });
        let scale = if max > min {
            MAX_COST as f64 / (max - min)
        } else {
            0.0
        };

        // padded rows and columns cost nothing
        let mut costs = vec![0i64; cells];
        for (i, &u) in group_a.iter().enumerate() {
            let row = &mut costs[i * n..i * n + group_b.len()];
            for (cost, &v) in row.iter_mut().zip(group_b) {
                *cost = match within.get(&(u, v)) {
                    Some(&d) => ((d - min) * scale).round() as i64,
                    None => DISALLOWED_COST,
                };
            }
        }

        let assignment = KuhnMunkres::from_square(costs, n)?.solve();

        let before = pairs.len();
        for (&u, &col) in group_a.iter().zip(&assignment) {
            let Some(&v) = group_b.get(col as usize) else {
                continue;
            };
            if within.get(&(u, v)).is_some_and(|&d| d <= self.threshold) {
                pairs.push((u, v));
            }
        }

        trace!(
            rows = group_a.len(),
            cols = group_b.len(),
            pairs = pairs.len() - before,
            "solved assignment group"
        );

        Ok(())
    }
}

impl DistanceMatcher for MinimumDistance {
    fn compute<A, B, F>(&self, a: &[A], b: &[B], distance: F) -> Result<Matching>
    where
        F: FnMut(&A, &B) -> f64,
    {
        self.matching(a, b, distance)
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn with_threshold(&self, threshold: f64) -> Self {
        Self { threshold, ..*self }
    }
}
