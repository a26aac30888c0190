use itertools::Itertools;
use rand::Rng;

use crate::{coord::*, gens::RandomPoints};

/// Draws `n` random points from the square `[0, extent)^2`
pub fn random_points(rng: &mut impl Rng, n: usize, extent: f32) -> Vec<BasePoint> {
    RandomPoints::new()
        .count(n)
        .extent(extent, extent, 0.0)
        .generate(rng)
}

/// Exhaustive maximum cardinality matching for tiny instances
pub fn brute_force_maximum_cardinality(
    size_a: usize,
    size_b: usize,
    edge: impl Fn(usize, usize) -> bool,
) -> usize {
    fn recurse(u: usize, used_b: &mut [bool], edge: &dyn Fn(usize, usize) -> bool) -> usize {
        if u == 0 {
            return 0;
        }
        let u = u - 1;

        let mut best = recurse(u, used_b, edge);
        for v in 0..used_b.len() {
            if !used_b[v] && edge(u, v) {
                used_b[v] = true;
                best = best.max(1 + recurse(u, used_b, edge));
                used_b[v] = false;
            }
        }
        best
    }

    recurse(size_a, &mut vec![false; size_b], &edge)
}

/// Smallest total distance of a perfect matching between two equally sized sets
pub fn brute_force_minimum_total(
    a: &[BasePoint],
    b: &[BasePoint],
    distance: impl Fn(&BasePoint, &BasePoint) -> f64,
) -> f64 {
    assert_eq!(a.len(), b.len());
    (0..b.len())
        .permutations(b.len())
        .map(|perm| {
            a.iter()
                .zip(perm)
                .map(|(x, v)| distance(x, &b[v]))
                .sum::<f64>()
        })
        .fold(f64::INFINITY, f64::min)
}

/// Random instances `(a, b, threshold)` of varying density
pub fn random_instances(seed: u64, count: usize) -> Vec<(Vec<BasePoint>, Vec<BasePoint>, f64)> {
    use rand::SeedableRng;
    let rng = &mut rand_pcg::Pcg64Mcg::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let (n, m) = (rng.random_range(0..25), rng.random_range(0..25));
            let a = random_points(rng, n, 20.0);
            let b = random_points(rng, m, 20.0);
            let threshold = rng.random_range(0.0..6.0);
            (a, b, threshold)
        })
        .collect()
}

/// Every matcher based on distances must satisfy the same invariants.
/// `$ctor` builds a `DistanceMatcher` from a threshold.
macro_rules! test_distance_matcher {
    ($name:ident, $ctor:expr) => {
        mod $name {
            use itertools::Itertools;

            use super::*;
            use crate::{algo::DistanceMatcher, coord::*, node::*, testing::random_instances};

            fn dist(x: &BasePoint, y: &BasePoint) -> f64 {
                x.distance_xy(y)
            }

            #[test]
            fn reports_threshold() {
                let ctor = $ctor;
                assert_eq!(ctor(2.5).threshold(), 2.5);
                assert_eq!(ctor(1.0).with_threshold(2.5).threshold(), 2.5);
            }

            #[test]
            fn threshold_respected() {
                let ctor = $ctor;
                for (a, b, t) in random_instances(1, 100) {
                    let matching = ctor(t).compute(&a, &b, dist).unwrap();
                    for &(u, v) in matching.pairs() {
                        assert!(dist(&a[u as usize], &b[v as usize]) <= t);
                    }
                }
            }

            #[test]
            fn cardinality_bounded() {
                let ctor = $ctor;
                for (a, b, t) in random_instances(2, 100) {
                    let matching = ctor(t).compute(&a, &b, dist).unwrap();
                    assert!(matching.cardinality() <= a.len().min(b.len()));
                }
            }

            #[test]
            fn idempotent() {
                let ctor = $ctor;
                for (a, b, t) in random_instances(3, 50) {
                    let first = ctor(t).compute(&a, &b, dist).unwrap();
                    let second = ctor(t).compute(&a, &b, dist).unwrap();
                    assert_eq!(first, second);
                }
            }

            #[test]
            fn every_vertex_accounted_once() {
                let ctor = $ctor;
                for (a, b, t) in random_instances(4, 100) {
                    let matching = ctor(t).compute(&a, &b, dist).unwrap();

                    let side_a = matching
                        .pairs()
                        .iter()
                        .map(|&(u, _)| u)
                        .chain(matching.unmatched_a().iter().copied())
                        .sorted()
                        .collect_vec();
                    assert_eq!(side_a, (0..a.len() as Node).collect_vec());

                    let side_b = matching
                        .pairs()
                        .iter()
                        .map(|&(_, v)| v)
                        .chain(matching.unmatched_b().iter().copied())
                        .sorted()
                        .collect_vec();
                    assert_eq!(side_b, (0..b.len() as Node).collect_vec());
                }
            }

            #[test]
            fn empty_sides() {
                let ctor = $ctor;
                let points = [BasePoint::new(1.0, 1.0)];

                let matching = ctor(1.0).compute(&[] as &[BasePoint], &points, dist).unwrap();
                assert_eq!(matching.cardinality(), 0);
                assert_eq!(matching.unmatched_b(), &[0]);

                let matching = ctor(1.0).compute(&points, &[] as &[BasePoint], dist).unwrap();
                assert_eq!(matching.unmatched_a(), &[0]);
            }
        }
    };
}

pub(crate) use test_distance_matcher;
