/*!
# Maximum Cardinality Matching

Implements the Hopcroft–Karp algorithm for bipartite graphs given implicitly by an edge predicate
over two slices. The predicate is evaluated exactly once for every pair `(a, b)` to build the
adjacency, so the runtime is `O(|A| |B|)` for the construction plus `O(E sqrt(V))` for the
matching itself.

A *maximum* matching is the largest set of vertex-disjoint edges. In contrast to
[`NearestNeighbour`](super::NearestNeighbour), which only yields a *maximal* matching, no other
matching of the same graph can have more pairs.
*/

use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::debug;

use super::*;

/// Infinite layer in the BFS phase
const UNREACHED: u32 = u32::MAX;

/// Computes maximum cardinality matchings via Hopcroft–Karp.
///
/// # Example
/// ```
/// use bimatch::algo::*;
///
/// // 0 <=> 0, 1 <=> {0, 1}: greedy matching of 1 <=> 0 first would only give one pair
/// let a = [0, 1];
/// let b = [0, 1];
/// let matching = MaximumCardinality::new().compute(&a, &b, |&x, &y| y <= x);
///
/// assert_eq!(matching.cardinality(), 2);
/// assert_eq!(matching.pairs(), &[(0, 0), (1, 1)]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MaximumCardinality;

impl MaximumCardinality {
    pub fn new() -> Self {
        Self
    }

    /// Computes a maximum matching where `edges(a, b)` decides whether `a` and `b` are adjacent.
    ///
    /// Pairs are reported in ascending order of their vertex in `A`.
    pub fn compute<A, B, E>(&self, a: &[A], b: &[B], mut edges: E) -> Matching
    where
        E: FnMut(&A, &B) -> bool,
    {
        let size_a = num_nodes_of(a);
        let size_b = num_nodes_of(b);

        if size_a == 0 || size_b == 0 {
            return Matching::unmatched(size_a, size_b);
        }

        let adjacency = a
            .iter()
            .map(|u| {
                b.iter()
                    .enumerate()
                    .filter_map(|(v, w)| edges(u, w).then_some(v as Node))
                    .collect()
            })
            .collect();

        let mut solver = HopcroftKarp::new(adjacency, size_b);
        let cardinality = solver.run();

        debug!(size_a, size_b, cardinality, "maximum cardinality matching");

        Matching::from_pairs(size_a, size_b, solver.into_pairs())
    }
}

type Neighbors = SmallVec<[Node; 8]>;

/// State of the Hopcroft–Karp algorithm on an explicit adjacency of `A`
struct HopcroftKarp {
    adjacency: Vec<Neighbors>,

    partner_of_a: Vec<Option<OptionalNode>>,
    partner_of_b: Vec<Option<OptionalNode>>,

    layer: Vec<u32>,
    free_layer: u32,

    next_edge: Vec<usize>,
    queue: VecDeque<Node>,
    path_stack: Vec<Node>,
}

impl HopcroftKarp {
    fn new(adjacency: Vec<Neighbors>, size_b: NumNodes) -> Self {
        let size_a = adjacency.len();
        Self {
            adjacency,
            partner_of_a: vec![None; size_a],
            partner_of_b: vec![None; size_b as usize],
            layer: vec![UNREACHED; size_a],
            free_layer: UNREACHED,
            next_edge: vec![0; size_a],
            queue: VecDeque::with_capacity(size_a),
            path_stack: Vec::with_capacity(32),
        }
    }

    /// Runs phases until no augmenting path remains and returns the matching size
    fn run(&mut self) -> usize {
        let mut cardinality = 0;

        while self.compute_layers() {
            self.next_edge.fill(0);
            for u in 0..self.adjacency.len() as Node {
                if self.partner_of_a[u as usize].is_none() && self.augment_from(u) {
                    cardinality += 1;
                }
            }
        }

        cardinality
    }

    /// BFS from all free vertices of `A` along alternating paths.
    /// Returns *true* if a free vertex of `B` is reachable.
    fn compute_layers(&mut self) -> bool {
        self.queue.clear();
        for (u, partner) in self.partner_of_a.iter().enumerate() {
            if partner.is_none() {
                self.layer[u] = 0;
                self.queue.push_back(u as Node);
            } else {
                self.layer[u] = UNREACHED;
            }
        }

        self.free_layer = UNREACHED;
        while let Some(u) = self.queue.pop_front() {
            let next = self.layer[u as usize] + 1;
            if next > self.free_layer {
                continue;
            }

            for &v in &self.adjacency[u as usize] {
                match self.partner_of_b[v as usize] {
                    None => self.free_layer = self.free_layer.min(next),
                    Some(w) => {
                        let w = w.get() as usize;
                        if self.layer[w] == UNREACHED {
                            self.layer[w] = next;
                            self.queue.push_back(w as Node);
                        }
                    }
                }
            }
        }

        self.free_layer != UNREACHED
    }

    /// Iterative DFS for a shortest augmenting path starting at the free vertex `root`.
    /// Flips the path and returns *true* if one was found.
    fn augment_from(&mut self, root: Node) -> bool {
        self.path_stack.clear();
        self.path_stack.push(root);

        while let Some(&u) = self.path_stack.last() {
            let ui = u as usize;

            let Some(&v) = self.adjacency[ui].get(self.next_edge[ui]) else {
                // dead end for the remainder of this phase
                self.layer[ui] = UNREACHED;
                self.path_stack.pop();
                continue;
            };
            self.next_edge[ui] += 1;

            let next = self.layer[ui] + 1;
            match self.partner_of_b[v as usize] {
                None if next == self.free_layer => {
                    self.flip_path(v);
                    return true;
                }
                Some(w) if self.layer[w.get() as usize] == next => {
                    self.path_stack.push(w.get());
                }
                _ => {}
            }
        }

        false
    }

    /// Flips the alternating path stored in `path_stack` that ends in the free vertex `v`
    fn flip_path(&mut self, mut v: Node) {
        for &u in self.path_stack.iter().rev() {
            let previous = self.partner_of_a[u as usize];
            self.partner_of_a[u as usize] = OptionalNode::new(v);
            self.partner_of_b[v as usize] = OptionalNode::new(u);

            match previous {
                Some(p) => v = p.get(),
                None => break,
            }
        }
    }

    fn into_pairs(self) -> Vec<(Node, Node)> {
        self.partner_of_a
            .into_iter()
            .enumerate()
            .filter_map(|(u, v)| Some((u as Node, v?.get())))
            .collect()
    }
}
