/*!
# Kuhn–Munkres Assignment Solver

Solves the linear assignment problem on a dense square matrix of integer costs: find a
permutation assigning every row to a distinct column with minimum total cost. Integer costs keep
the solver exact; callers with real-valued costs discretize first (see
[`MinimumDistance`](super::MinimumDistance)).

The implementation is the `O(n^3)` Hungarian algorithm with row and column potentials which
processes one row at a time and grows the assignment along shortest augmenting paths.

# Example
```
use bimatch::algo::KuhnMunkres;

let solver = KuhnMunkres::from_square(vec![
    4, 1, 3,
    2, 0, 5,
    3, 2, 2,
], 3).unwrap();

let assignment = solver.solve();
assert_eq!(assignment, vec![1, 0, 2]);
assert_eq!(solver.total_cost(&assignment), 5);
```
*/

use super::*;

/// A square assignment problem with `i64` costs in row-major order.
#[derive(Debug, Clone)]
pub struct KuhnMunkres {
    costs: Vec<i64>,
    n: usize,
}

impl KuhnMunkres {
    /// Creates a solver for the `n x n` matrix `costs` given in row-major order.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `costs` does not hold exactly `n * n` entries.
    pub fn from_square(costs: Vec<i64>, n: usize) -> Result<Self> {
        raise_error_unless!(
            n.checked_mul(n) == Some(costs.len()),
            MatchError::invalid_argument(
                "costs",
                format!("expected {n} x {n} entries, got {}", costs.len())
            )
        );
        Ok(Self { costs, n })
    }

    /// Side length of the matrix
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    fn cost(&self, row: usize, col: usize) -> i64 {
        self.costs[row * self.n + col]
    }

    /// Returns the column assigned to each row in a minimum cost assignment
    pub fn solve(&self) -> Vec<Node> {
        let n = self.n;
        if n == 0 {
            return Vec::new();
        }

        // 1-based indices; row/column 0 is a virtual source
        let mut row_potential = vec![0i64; n + 1];
        let mut col_potential = vec![0i64; n + 1];
        let mut row_of_col = vec![0usize; n + 1];
        let mut predecessor = vec![0usize; n + 1];

        let mut min_slack = vec![i64::MAX; n + 1];
        let mut used = NodeBitSet::new((n + 1) as NumNodes);

        for row in 1..=n {
            row_of_col[0] = row;
            min_slack.fill(i64::MAX);
            used.clear_all();

            let mut col0 = 0usize;
            loop {
                used.set_bit(col0 as Node);
                let row0 = row_of_col[col0];

                let mut delta = i64::MAX;
                let mut col1 = 0usize;
                for col in 1..=n {
                    if used.get_bit(col as Node) {
                        continue;
                    }

                    let slack =
                        self.cost(row0 - 1, col - 1) - row_potential[row0] - col_potential[col];
                    if slack < min_slack[col] {
                        min_slack[col] = slack;
                        predecessor[col] = col0;
                    }
                    if min_slack[col] < delta {
                        delta = min_slack[col];
                        col1 = col;
                    }
                }

                for col in 0..=n {
                    if used.get_bit(col as Node) {
                        row_potential[row_of_col[col]] += delta;
                        col_potential[col] -= delta;
                    } else {
                        min_slack[col] -= delta;
                    }
                }

                col0 = col1;
                if row_of_col[col0] == 0 {
                    break;
                }
            }

            // flip the augmenting path
            loop {
                let col1 = predecessor[col0];
                row_of_col[col0] = row_of_col[col1];
                col0 = col1;
                if col0 == 0 {
                    break;
                }
            }
        }

        let mut assignment = vec![INVALID_NODE; n];
        for col in 1..=n {
            assignment[row_of_col[col] - 1] = (col - 1) as Node;
        }
        assignment
    }

    /// Sum of the costs of an assignment as returned by [`KuhnMunkres::solve`]
    pub fn total_cost(&self, assignment: &[Node]) -> i64 {
        assignment
            .iter()
            .enumerate()
            .map(|(row, &col)| self.cost(row, col as usize))
            .sum()
    }
}
