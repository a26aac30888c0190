/*!
# Matchings

A *matching* is a set of vertex-disjoint pairs between the two sides `A` and `B` of a bipartite
problem. All matchers of this crate return a [`Matching`] of vertex indices, which accounts for
every vertex exactly once: either as part of a pair or as unmatched.

Callers that prefer reacting to the result element-wise register closures on [`Consumers`] and
use the façade functions [`maximum_cardinality`], [`nearest_neighbour`] and [`minimum_distance`].

```
use bimatch::{algo::*, prelude::*};

let a = [BasePoint::new(0.0, 0.0), BasePoint::new(10.0, 10.0)];
let b = [BasePoint::new(10.5, 10.5), BasePoint::new(0.5, 0.5), BasePoint::new(50.0, 50.0)];

let mut pairs = Vec::new();
let mut missed = Vec::new();
let mut consumers = Consumers::new()
    .on_matched(|x: &BasePoint, y: &BasePoint| pairs.push(x.distance_xy(y)))
    .on_unmatched_b(|y: &BasePoint| missed.push(*y));

let n = nearest_neighbour(&a, &b, |x, y| x.distance_xy(y), 1.0, &mut consumers);
drop(consumers);

assert_eq!(n, 2);
assert_eq!(pairs.len(), 2);
assert_eq!(missed, vec![BasePoint::new(50.0, 50.0)]);
```
*/

use super::*;

/// Result of a bipartite matching over vertex indices.
///
/// Every vertex of `A` occurs exactly once in either [`Matching::pairs`] or
/// [`Matching::unmatched_a`], analogously for `B`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    pairs: Vec<(Node, Node)>,
    unmatched_a: Vec<Node>,
    unmatched_b: Vec<Node>,
}

impl Matching {
    /// Creates a matching from its pairs; the unmatched vertices are derived from the sizes of
    /// both sides. Pairs keep the given order, unmatched vertices are sorted ascending.
    ///
    /// # Panics
    /// If a vertex occurs in more than one pair or is out of range.
    pub fn from_pairs(size_a: NumNodes, size_b: NumNodes, pairs: Vec<(Node, Node)>) -> Self {
        let mut seen_a = NodeBitSet::new(size_a);
        let mut seen_b = NodeBitSet::new(size_b);
        for &(a, b) in &pairs {
            assert!(!seen_a.set_bit(a), "Vertex {a} of A matched twice");
            assert!(!seen_b.set_bit(b), "Vertex {b} of B matched twice");
        }

        Self {
            pairs,
            unmatched_a: (0..size_a).filter(|&a| !seen_a.get_bit(a)).collect(),
            unmatched_b: (0..size_b).filter(|&b| !seen_b.get_bit(b)).collect(),
        }
    }

    /// Matching in which every vertex is unmatched
    pub fn unmatched(size_a: NumNodes, size_b: NumNodes) -> Self {
        Self {
            pairs: Vec::new(),
            unmatched_a: (0..size_a).collect(),
            unmatched_b: (0..size_b).collect(),
        }
    }

    /// Number of matched pairs
    pub fn cardinality(&self) -> usize {
        self.pairs.len()
    }

    /// Matched pairs `(a, b)` in the order the matcher committed them
    pub fn pairs(&self) -> &[(Node, Node)] {
        &self.pairs
    }

    /// Vertices of `A` without partner in ascending order
    pub fn unmatched_a(&self) -> &[Node] {
        &self.unmatched_a
    }

    /// Vertices of `B` without partner in ascending order
    pub fn unmatched_b(&self) -> &[Node] {
        &self.unmatched_b
    }

    /// Returns the partner of every vertex in `A` (`None` if unmatched)
    pub fn partners_of_a(&self) -> Vec<Option<Node>> {
        let mut partners = vec![None; self.pairs.len() + self.unmatched_a.len()];
        for &(a, b) in &self.pairs {
            partners[a as usize] = Some(b);
        }
        partners
    }

    /// Feeds the matching element-wise into `consumers`: first all pairs, then all unmatched
    /// vertices of `A`, then all unmatched vertices of `B`.
    pub fn dispatch<A, B>(&self, a: &[A], b: &[B], consumers: &mut Consumers<'_, A, B>) {
        if !consumers.matched.is_empty() {
            for &(u, v) in &self.pairs {
                let (u, v) = (&a[u as usize], &b[v as usize]);
                for f in consumers.matched.iter_mut() {
                    f(u, v);
                }
            }
        }

        if !consumers.unmatched_a.is_empty() {
            for &u in &self.unmatched_a {
                for f in consumers.unmatched_a.iter_mut() {
                    f(&a[u as usize]);
                }
            }
        }

        if !consumers.unmatched_b.is_empty() {
            for &v in &self.unmatched_b {
                for f in consumers.unmatched_b.iter_mut() {
                    f(&b[v as usize]);
                }
            }
        }
    }
}

type MatchedFn<'a, A, B> = Box<dyn FnMut(&A, &B) + 'a>;
type UnmatchedFn<'a, T> = Box<dyn FnMut(&T) + 'a>;

/// Ordered lists of callbacks receiving the elements of a [`Matching`].
///
/// Every registered closure is called once per pair (or unmatched element), in registration
/// order. Lists without closures are skipped entirely.
pub struct Consumers<'a, A, B> {
    matched: Vec<MatchedFn<'a, A, B>>,
    unmatched_a: Vec<UnmatchedFn<'a, A>>,
    unmatched_b: Vec<UnmatchedFn<'a, B>>,
}

impl<A, B> Default for Consumers<'_, A, B> {
    fn default() -> Self {
        Self {
            matched: Vec::new(),
            unmatched_a: Vec::new(),
            unmatched_b: Vec::new(),
        }
    }
}

impl<'a, A, B> Consumers<'a, A, B> {
    /// Consumers without any callback
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for matched pairs
    pub fn on_matched<F>(mut self, f: F) -> Self
    where
        F: FnMut(&A, &B) + 'a,
    {
        self.matched.push(Box::new(f));
        self
    }

    /// Registers a callback for unmatched elements of `A`
    pub fn on_unmatched_a<F>(mut self, f: F) -> Self
    where
        F: FnMut(&A) + 'a,
    {
        self.unmatched_a.push(Box::new(f));
        self
    }

    /// Registers a callback for unmatched elements of `B`
    pub fn on_unmatched_b<F>(mut self, f: F) -> Self
    where
        F: FnMut(&B) + 'a,
    {
        self.unmatched_b.push(Box::new(f));
        self
    }

    /// Returns *true* if no callback is registered
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.unmatched_a.is_empty() && self.unmatched_b.is_empty()
    }
}

/// A matcher that pairs elements based on a real-valued distance and a threshold.
///
/// Only pairs with `distance <= threshold` may be matched.
pub trait DistanceMatcher {
    /// Computes a matching between `a` and `b`
    fn compute<A, B, F>(&self, a: &[A], b: &[B], distance: F) -> Result<Matching>
    where
        F: FnMut(&A, &B) -> f64;

    /// Threshold for a pair to be matchable
    fn threshold(&self) -> f64;

    /// Returns a copy of this matcher with a different threshold, keeping all other settings
    fn with_threshold(&self, threshold: f64) -> Self
    where
        Self: Sized;
}

/// Computes a maximum cardinality matching where `edges(a, b)` decides whether `a` and `b` may be
/// paired. Returns the number of pairs.
///
/// See [`MaximumCardinality`].
pub fn maximum_cardinality<A, B, E>(
    a: &[A],
    b: &[B],
    edges: E,
    consumers: &mut Consumers<'_, A, B>,
) -> usize
where
    E: FnMut(&A, &B) -> bool,
{
    let matching = MaximumCardinality::new().compute(a, b, edges);
    matching.dispatch(a, b, consumers);
    matching.cardinality()
}

/// Greedily matches closest pairs first. Returns the number of pairs.
///
/// See [`NearestNeighbour`].
pub fn nearest_neighbour<A, B, F>(
    a: &[A],
    b: &[B],
    distance: F,
    threshold: f64,
    consumers: &mut Consumers<'_, A, B>,
) -> usize
where
    F: FnMut(&A, &B) -> f64,
{
    let matching = NearestNeighbour::new(threshold).matching(a, b, distance);
    matching.dispatch(a, b, consumers);
    matching.cardinality()
}

/// Computes a matching minimizing the sum of distances. Returns the number of pairs.
///
/// # Errors
/// See [`MinimumDistance`].
pub fn minimum_distance<A, B, F>(
    a: &[A],
    b: &[B],
    distance: F,
    threshold: f64,
    consumers: &mut Consumers<'_, A, B>,
) -> Result<usize>
where
    F: FnMut(&A, &B) -> f64,
{
    let matching = MinimumDistance::new(threshold).compute(a, b, distance)?;
    matching.dispatch(a, b, consumers);
    Ok(matching.cardinality())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[test]
    fn from_pairs_derives_unmatched() {
        let matching = Matching::from_pairs(4, 3, vec![(2, 0), (0, 2)]);
        assert_eq!(matching.cardinality(), 2);
        assert_eq!(matching.unmatched_a(), &[1, 3]);
        assert_eq!(matching.unmatched_b(), &[1]);
        assert_eq!(matching.partners_of_a(), vec![Some(2), None, Some(0), None]);
    }

    #[test]
    #[should_panic]
    fn from_pairs_rejects_duplicates() {
        Matching::from_pairs(3, 3, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn dispatch_order_and_multiplicity() {
        let log = RefCell::new(Vec::new());
        let a = ['a', 'b', 'c'];
        let b = [10, 20];

        let mut consumers = Consumers::new()
            .on_matched(|x: &char, y: &i32| log.borrow_mut().push(format!("m1 {x}{y}")))
            .on_matched(|x: &char, y: &i32| log.borrow_mut().push(format!("m2 {x}{y}")))
            .on_unmatched_a(|x: &char| log.borrow_mut().push(format!("a {x}")))
            .on_unmatched_b(|y: &i32| log.borrow_mut().push(format!("b {y}")));

        Matching::from_pairs(3, 2, vec![(2, 1)]).dispatch(&a, &b, &mut consumers);
        drop(consumers);

        assert_eq!(
            log.into_inner(),
            vec!["m1 c20", "m2 c20", "a a", "a b", "b 10"]
        );
    }

    #[test]
    fn empty_consumers_are_noop() {
        let consumers: Consumers<'_, u8, u8> = Consumers::new();
        assert!(consumers.is_empty());

        let mut consumers = consumers;
        Matching::unmatched(2, 2).dispatch(&[1u8, 2], &[3u8, 4], &mut consumers);
    }

    #[test]
    fn facades_report_cardinality() {
        let a = [0.0f64, 10.0, 20.0];
        let b = [0.4f64, 10.2, 30.0];
        let dist = |x: &f64, y: &f64| (x - y).abs();

        let unmatched = Cell::new(0);
        let mut consumers = Consumers::new()
            .on_unmatched_a(|_: &f64| unmatched.set(unmatched.get() + 1))
            .on_unmatched_b(|_: &f64| unmatched.set(unmatched.get() + 1));
        assert_eq!(nearest_neighbour(&a, &b, dist, 0.5, &mut consumers), 2);
        assert_eq!(unmatched.get(), 2);

        assert_eq!(
            minimum_distance(&a, &b, dist, 0.5, &mut Consumers::new()),
            Ok(2)
        );
        assert_eq!(
            maximum_cardinality(&a, &b, |x, y| dist(x, y) <= 10.0, &mut Consumers::new()),
            3
        );
    }
}
