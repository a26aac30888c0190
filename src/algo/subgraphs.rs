/*!
# Bipartite Subgraphs

Splits a bipartite graph, given implicitly by an edge predicate over the index sets `0..size_a`
and `0..size_b`, into its connected components. Since matchings never cross component borders,
expensive matchers (e.g. [`MinimumDistance`](super::MinimumDistance) with its cubic runtime) can
be run on every component independently.

# Example
```
use bimatch::algo::*;

// (0, 1), (1, 1), (1, 0), (2, 0) form one component; (3, 2) another; A-vertex 4 is isolated.
let edges = [(0, 1), (1, 1), (1, 0), (2, 0), (3, 2)];
let subgraphs = extract_bipartite_subgraphs(5, 3, |u, v| edges.contains(&(u, v)));

assert_eq!(subgraphs.len(), 2);
assert_eq!(subgraphs[0].indices_a, vec![0, 1, 2]);
assert_eq!(subgraphs[0].indices_b, vec![0, 1]);
assert_eq!(subgraphs[1].indices_a, vec![3]);
assert_eq!(subgraphs[1].indices_b, vec![2]);
```
*/

use std::collections::VecDeque;
use tracing::trace;

use super::*;

/// A connected component of a bipartite graph with at least one edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BipartiteSubgraph {
    /// Vertices of side `A` in ascending order
    pub indices_a: Vec<Node>,
    /// Vertices of side `B` in ascending order
    pub indices_b: Vec<Node>,
}

impl BipartiteSubgraph {
    /// Number of vertices on both sides
    pub fn len(&self) -> usize {
        self.indices_a.len() + self.indices_b.len()
    }

    /// Returns *true* if the subgraph has no vertices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes the connected components of the bipartite graph on `0..size_a` and `0..size_b` where
/// `edge(u, v)` decides whether `u` in `A` and `v` in `B` are adjacent.
///
/// Components are returned in ascending order of their smallest `A`-vertex. Vertices of `A`
/// without any edge are not part of any returned component; every vertex of `B` with at least one
/// edge is part of exactly one component.
///
/// The predicate is evaluated at most `O(size_a * size_b)` times.
pub fn extract_bipartite_subgraphs<E>(
    size_a: NumNodes,
    size_b: NumNodes,
    mut edge: E,
) -> Vec<BipartiteSubgraph>
where
    E: FnMut(Node, Node) -> bool,
{
    if size_a == 0 || size_b == 0 {
        return Vec::new();
    }

    let mut component_of_a = vec![INVALID_NODE; size_a as usize];
    let mut component_of_b = vec![INVALID_NODE; size_b as usize];
    let mut remaining_b = size_b;

    let mut num_components: Node = 0;
    let mut queue = VecDeque::new();

    for start in 0..size_a {
        if remaining_b == 0 {
            break;
        }
        if component_of_a[start as usize] != INVALID_NODE {
            continue;
        }

        let id = num_components;
        num_components += 1;
        component_of_a[start as usize] = id;
        queue.push_back(start);

        'bfs: while let Some(u) = queue.pop_front() {
            for v in 0..size_b {
                if component_of_b[v as usize] != INVALID_NODE || !edge(u, v) {
                    continue;
                }

                component_of_b[v as usize] = id;
                remaining_b -= 1;

                // Vertices of A up to `start` are either in this component already or were
                // resolved into earlier components, which cannot be adjacent to `v`.
                for w in (start + 1)..size_a {
                    if component_of_a[w as usize] == INVALID_NODE && edge(w, v) {
                        component_of_a[w as usize] = id;
                        queue.push_back(w);
                    }
                }

                if remaining_b == 0 {
                    queue.clear();
                    break 'bfs;
                }
            }
        }
    }

    let mut subgraphs = vec![BipartiteSubgraph::default(); num_components as usize];
    for (v, &id) in component_of_b.iter().enumerate() {
        if id != INVALID_NODE {
            subgraphs[id as usize].indices_b.push(v as Node);
        }
    }
    for (u, &id) in component_of_a.iter().enumerate() {
        if id != INVALID_NODE && !subgraphs[id as usize].indices_b.is_empty() {
            subgraphs[id as usize].indices_a.push(u as Node);
        }
    }
    subgraphs.retain(|s| !s.indices_b.is_empty());

    trace!(
        size_a,
        size_b,
        components = subgraphs.len(),
        "extracted bipartite subgraphs"
    );

    subgraphs
}
