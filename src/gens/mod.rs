/*!
# Point Set Generators

Random localisation sets for exercising and benchmarking matchers:
- [`RandomPoints`] draws points uniformly from a box,
- [`SimulatedPredictions`] derives a *predicted* set from an actual one by adding localisation
  jitter, dropping detections and adding spurious ones.

Both are configured with the *Builder* pattern and only draw from the random number generator
passed to `generate`, hence are reproducible with a seeded generator:

```
use bimatch::{gens::*, prelude::*};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let rng = &mut Pcg64Mcg::seed_from_u64(42);

let actual = RandomPoints::new().count(100).extent(512.0, 512.0, 0.0).generate(rng);
let predicted = SimulatedPredictions::new()
    .sigma(0.5)
    .miss_probability(0.1)
    .spurious(5)
    .extent(512.0, 512.0, 0.0)
    .generate(&actual, rng)
    .unwrap();

assert_eq!(actual.len(), 100);
assert!(predicted.len() <= 105);
```
*/

use rand::{Rng, seq::SliceRandom};
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::{coord::*, error::*, utils::Probability};

/// Uniformly distributed points in `[0, width) x [0, height) x [0, depth)`.
#[derive(Debug, Copy, Clone)]
pub struct RandomPoints {
    count: usize,
    extent: (f32, f32, f32),
}

impl Default for RandomPoints {
    fn default() -> Self {
        Self {
            count: 0,
            extent: (1.0, 1.0, 0.0),
        }
    }
}

impl RandomPoints {
    /// Creates a generator for zero points in the unit square
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the number of points
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Updates the box the points are drawn from. A `depth` of `0` yields points in the plane.
    pub fn extent(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.extent = (width, height, depth);
        self
    }

    /// Draws the points
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<BasePoint> {
        let (width, height, depth) = self.extent;
        (0..self.count)
            .map(|_| {
                BasePoint::new_3d(
                    rng.random::<f32>() * width,
                    rng.random::<f32>() * height,
                    rng.random::<f32>() * depth,
                )
            })
            .collect()
    }
}

/// Simulates the output of a detector run on a known ground truth.
///
/// Every actual point is missed with probability `miss_probability`; otherwise it is reported
/// with normally distributed jitter of standard deviation `sigma` on every axis of the extent.
/// Additionally `spurious` points are drawn uniformly from the extent. The result is shuffled,
/// so indices of actual and predicted points are unrelated.
#[derive(Debug, Copy, Clone)]
pub struct SimulatedPredictions {
    sigma: f64,
    miss_probability: f64,
    spurious: usize,
    extent: (f32, f32, f32),
}

impl Default for SimulatedPredictions {
    fn default() -> Self {
        Self {
            sigma: 0.0,
            miss_probability: 0.0,
            spurious: 0,
            extent: (1.0, 1.0, 0.0),
        }
    }
}

impl SimulatedPredictions {
    /// Creates a simulator that reports every actual point exactly
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the standard deviation of the localisation error
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Updates the probability of missing an actual point
    pub fn miss_probability(mut self, p: f64) -> Self {
        self.miss_probability = p;
        self
    }

    /// Updates the number of spurious detections
    pub fn spurious(mut self, n: usize) -> Self {
        self.spurious = n;
        self
    }

    /// Updates the box spurious detections are drawn from
    pub fn extent(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.extent = (width, height, depth);
        self
    }

    /// Simulates predictions for `actual`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `sigma` is negative or not finite, or if `miss_probability`
    /// is not in `[0, 1]`.
    pub fn generate<C: Coordinate, R: Rng>(
        &self,
        actual: &[C],
        rng: &mut R,
    ) -> Result<Vec<BasePoint>> {
        raise_error_unless!(
            self.miss_probability.is_valid_probability(),
            MatchError::invalid_argument(
                "miss_probability",
                format!("must be in [0, 1], got {}", self.miss_probability)
            )
        );
        let jitter = Normal::new(0.0, self.sigma).map_err(|_| {
            MatchError::invalid_argument(
                "sigma",
                format!("must be finite and non-negative, got {}", self.sigma),
            )
        })?;

        let depth = self.extent.2;
        let mut predicted = Vec::with_capacity(actual.len() + self.spurious);
        for p in actual {
            if rng.random_bool(self.miss_probability) {
                continue;
            }

            let dz = if depth > 0.0 {
                jitter.sample(rng) as f32
            } else {
                0.0
            };
            predicted.push(BasePoint::new_3d(
                p.x() + jitter.sample(rng) as f32,
                p.y() + jitter.sample(rng) as f32,
                p.z() + dz,
            ));
        }
        let detected = predicted.len();

        let (width, height, depth) = self.extent;
        predicted.extend(
            RandomPoints::new()
                .count(self.spurious)
                .extent(width, height, depth)
                .generate(rng),
        );
        predicted.shuffle(rng);

        debug!(
            actual = actual.len(),
            detected,
            spurious = self.spurious,
            "simulated predictions"
        );

        Ok(predicted)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn points_within_extent() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1);

        let points = RandomPoints::new()
            .count(500)
            .extent(10.0, 20.0, 0.0)
            .generate(rng);
        assert_eq!(points.len(), 500);
        assert!(points.iter().all(|p| (0.0..10.0).contains(&p.x())
            && (0.0..20.0).contains(&p.y())
            && p.z() == 0.0));

        assert!(RandomPoints::new().generate(rng).is_empty());
    }

    #[test]
    fn reproducible() {
        let gen_points = |seed| {
            RandomPoints::new()
                .count(10)
                .extent(5.0, 5.0, 5.0)
                .generate(&mut Pcg64Mcg::seed_from_u64(seed))
        };
        assert_eq!(gen_points(3), gen_points(3));
        assert_ne!(gen_points(3), gen_points(4));
    }

    #[test]
    fn exact_predictions() {
        let rng = &mut Pcg64Mcg::seed_from_u64(2);
        let actual = RandomPoints::new().count(50).generate(rng);

        let mut predicted = SimulatedPredictions::new().generate(&actual, rng).unwrap();
        assert_eq!(predicted.len(), actual.len());

        let key = |p: &BasePoint| (p.x().to_bits(), p.y().to_bits());
        predicted.sort_by_key(key);
        let mut expected = actual.clone();
        expected.sort_by_key(key);
        assert_eq!(predicted, expected);
    }

    #[test]
    fn misses_and_spurious() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let actual = RandomPoints::new().count(20).generate(rng);

        let predicted = SimulatedPredictions::new()
            .miss_probability(1.0)
            .spurious(7)
            .extent(3.0, 3.0, 0.0)
            .generate(&actual, rng)
            .unwrap();
        assert_eq!(predicted.len(), 7);
    }

    #[test]
    fn invalid_parameters() {
        let rng = &mut Pcg64Mcg::seed_from_u64(4);
        let actual = [BasePoint::new(0.0, 0.0)];

        for sim in [
            SimulatedPredictions::new().sigma(-1.0),
            SimulatedPredictions::new().sigma(f64::NAN),
            SimulatedPredictions::new().miss_probability(1.5),
        ] {
            assert!(matches!(
                sim.generate(&actual, rng),
                Err(MatchError::InvalidArgument { .. })
            ));
        }
    }
}
