/*!
# Match Calculator

Scores a set of predicted localisations against the actual (ground truth) localisations. Both
sets are matched with a [`DistanceMatcher`], by default [`NearestNeighbour`]; every matched pair is
a true positive, every unmatched prediction a false positive and every unmatched actual point a
false negative.

```
use bimatch::{prelude::*, score::*};

let actual = [BasePoint::new(0.0, 0.0), BasePoint::new(10.0, 10.0)];
let predicted = [BasePoint::new(0.5, 0.5), BasePoint::new(10.5, 10.5)];

let mut pairs = Vec::new();
let result = MatchCalculator::new(1.0)
    .unwrap()
    .analyse_2d(&actual, &predicted, &mut MatchOutputs::new().pairs(&mut pairs))
    .unwrap();

assert_eq!((result.tp(), result.fp(), result.fn_()), (2, 0, 0));
assert!((result.rmsd() - 0.5f64.sqrt()).abs() < 1e-6);
assert_eq!(pairs.len(), 2);
```
*/

use fxhash::FxHashSet;
use tracing::debug;

use super::*;
use crate::{
    algo::{Consumers, DistanceMatcher, Matching, NearestNeighbour},
    coord::*,
    error::*,
    utils::div_zero,
};

/// Optional sinks for the individual elements of a match.
///
/// Every present sink is cleared before it is refilled.
pub struct MatchOutputs<'a, C> {
    /// Predicted points that were matched
    pub true_positives: Option<&'a mut Vec<C>>,
    /// Predicted points that were not matched
    pub false_positives: Option<&'a mut Vec<C>>,
    /// Actual points that were not matched
    pub false_negatives: Option<&'a mut Vec<C>>,
    /// All matched pairs
    pub pairs: Option<&'a mut Vec<PointPair<C>>>,
}

impl<C> Default for MatchOutputs<'_, C> {
    fn default() -> Self {
        Self {
            true_positives: None,
            false_positives: None,
            false_negatives: None,
            pairs: None,
        }
    }
}

impl<'a, C> MatchOutputs<'a, C> {
    /// Outputs that collect nothing
    pub fn new() -> Self {
        Self::default()
    }

    pub fn true_positives(mut self, sink: &'a mut Vec<C>) -> Self {
        self.true_positives = Some(sink);
        self
    }

    pub fn false_positives(mut self, sink: &'a mut Vec<C>) -> Self {
        self.false_positives = Some(sink);
        self
    }

    pub fn false_negatives(mut self, sink: &'a mut Vec<C>) -> Self {
        self.false_negatives = Some(sink);
        self
    }

    pub fn pairs(mut self, sink: &'a mut Vec<PointPair<C>>) -> Self {
        self.pairs = Some(sink);
        self
    }
}

fn clear_sink<T>(sink: &mut Option<&mut Vec<T>>) {
    if let Some(sink) = sink.as_deref_mut() {
        sink.clear();
    }
}

/// Result of matching pulses: the classification counts plus the overlap score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PulseMatchResult {
    pub result: MatchResult,
    /// Sum of the scores of all matched pulses normalized by the larger total number of time
    /// points of both sets
    pub score: f64,
}

/// Computes [`MatchResult`]s of predicted against actual coordinates.
#[derive(Debug, Clone, Copy)]
pub struct MatchCalculator<M = NearestNeighbour> {
    threshold: f64,
    matcher: M,
}

impl MatchCalculator<NearestNeighbour> {
    /// Creates a calculator that matches points at most `threshold` apart.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the threshold is negative or not finite.
    pub fn new(threshold: f64) -> Result<Self> {
        raise_error_unless!(
            threshold >= 0.0 && threshold.is_finite(),
            MatchError::invalid_argument(
                "threshold",
                format!("must be finite and non-negative, got {threshold}")
            )
        );

        Ok(Self {
            threshold,
            matcher: NearestNeighbour::new(threshold),
        })
    }
}

impl<M: DistanceMatcher> MatchCalculator<M> {
    /// Replaces the matching strategy. The threshold of `matcher` is ignored; the calculator
    /// always applies its own.
    pub fn matcher<N: DistanceMatcher>(self, matcher: N) -> MatchCalculator<N> {
        MatchCalculator {
            threshold: self.threshold,
            matcher,
        }
    }

    /// Maximum distance of a matched pair
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Matches points by their euclidean distance in the XY-plane
    pub fn analyse_2d<C>(
        &self,
        actual: &[C],
        predicted: &[C],
        outputs: &mut MatchOutputs<'_, C>,
    ) -> Result<MatchResult>
    where
        C: Coordinate + Clone,
    {
        self.analyse_points(
            actual,
            predicted,
            outputs,
            |x: &C, y: &C| x.distance_xy(y),
            |x: &C, y: &C| x.distance_xy_squared(y),
        )
    }

    /// Matches points by their euclidean distance in 3D
    pub fn analyse_3d<C>(
        &self,
        actual: &[C],
        predicted: &[C],
        outputs: &mut MatchOutputs<'_, C>,
    ) -> Result<MatchResult>
    where
        C: Coordinate + Clone,
    {
        self.analyse_points(
            actual,
            predicted,
            outputs,
            |x: &C, y: &C| x.distance_xyz(y),
            |x: &C, y: &C| x.distance_xyz_squared(y),
        )
    }

    /// Matches pulses that overlap in time and are at most `threshold` apart in the XY-plane,
    /// preferring pairs with a higher [`Pulse::score`]. The returned score is the sum of the
    /// scores of all matched pairs normalized by the larger number of time points of both sets.
    pub fn analyse_pulses(
        &self,
        actual: &[Pulse],
        predicted: &[Pulse],
        outputs: &mut MatchOutputs<'_, Pulse>,
    ) -> Result<PulseMatchResult> {
        let threshold = self.threshold;
        let edge = move |x: &Pulse, y: &Pulse| {
            let score = x.score(y, x.distance_xy_squared(y), threshold);
            if score > 0.0 { -score } else { 1.0 }
        };

        let matching = self.run(actual, predicted, 0.0, edge, outputs)?;
        let total: f64 = matching
            .pairs()
            .iter()
            .map(|&(u, v)| -edge(&actual[u as usize], &predicted[v as usize]))
            .sum();

        let time_points = |pulses: &[Pulse]| pulses.iter().map(Pulse::time_points).sum::<u64>();
        let max_time_points = time_points(actual).max(time_points(predicted));

        Ok(PulseMatchResult {
            result: Self::summarize(actual, predicted, &matching, |x: &Pulse, y: &Pulse| {
                x.distance_xy_squared(y)
            }),
            score: div_zero(total, max_time_points as f64),
        })
    }

    /// Matching minimizes (or greedily orders by) `distance`; the RMSD uses `distance_squared`
    fn analyse_points<C, D, S>(
        &self,
        actual: &[C],
        predicted: &[C],
        outputs: &mut MatchOutputs<'_, C>,
        distance: D,
        distance_squared: S,
    ) -> Result<MatchResult>
    where
        C: Coordinate + Clone,
        D: Fn(&C, &C) -> f64,
        S: Fn(&C, &C) -> f64,
    {
        let matching = self.run(actual, predicted, self.threshold, distance, outputs)?;
        Ok(Self::summarize(actual, predicted, &matching, distance_squared))
    }

    /// Computes the matching and feeds it into the present sinks of `outputs`
    fn run<C, D>(
        &self,
        actual: &[C],
        predicted: &[C],
        threshold: f64,
        distance: D,
        outputs: &mut MatchOutputs<'_, C>,
    ) -> Result<Matching>
    where
        C: Clone,
        D: Fn(&C, &C) -> f64,
    {
        let matching = self
            .matcher
            .with_threshold(threshold)
            .compute(actual, predicted, distance)?;

        let MatchOutputs {
            true_positives,
            false_positives,
            false_negatives,
            pairs,
        } = outputs;
        clear_sink(true_positives);
        clear_sink(false_positives);
        clear_sink(false_negatives);
        clear_sink(pairs);

        let mut consumers = Consumers::new();
        if true_positives.is_some() || pairs.is_some() {
            consumers = consumers.on_matched(|x: &C, y: &C| {
                if let Some(sink) = true_positives.as_deref_mut() {
                    sink.push(y.clone());
                }
                if let Some(sink) = pairs.as_deref_mut() {
                    sink.push(PointPair {
                        actual: x.clone(),
                        predicted: y.clone(),
                    });
                }
            });
        }
        if let Some(sink) = false_negatives.as_deref_mut() {
            consumers = consumers.on_unmatched_a(move |x: &C| sink.push(x.clone()));
        }
        if let Some(sink) = false_positives.as_deref_mut() {
            consumers = consumers.on_unmatched_b(move |y: &C| sink.push(y.clone()));
        }

        if !consumers.is_empty() {
            matching.dispatch(actual, predicted, &mut consumers);
        }

        Ok(matching)
    }

    fn summarize<C, D>(
        actual: &[C],
        predicted: &[C],
        matching: &Matching,
        distance_squared: D,
    ) -> MatchResult
    where
        D: Fn(&C, &C) -> f64,
    {
        let tp = matching.cardinality();
        let sum: f64 = matching
            .pairs()
            .iter()
            .map(|&(u, v)| distance_squared(&actual[u as usize], &predicted[v as usize]))
            .sum();
        let rmsd = div_zero(sum, tp as f64).sqrt();

        let result = MatchResult::new(tp, predicted.len() - tp, actual.len() - tp, rmsd);
        debug!(
            tp = result.tp(),
            fp = result.fp(),
            fn_ = result.fn_(),
            rmsd,
            "match result"
        );
        result
    }
}

/// Compares two sets of ids (duplicates ignored).
///
/// ```
/// use bimatch::score::intersection;
///
/// let result = intersection(&[1, 2, 2, 3], &[3, 4]);
/// assert_eq!(result.intersection, 1);
/// assert_eq!(result.only_a, 2);
/// assert_eq!(result.only_b, 1);
/// ```
pub fn intersection(actual: &[i32], predicted: &[i32]) -> IntersectionResult {
    let set_a: FxHashSet<i32> = actual.iter().copied().collect();
    let set_b: FxHashSet<i32> = predicted.iter().copied().collect();

    let both = set_a.intersection(&set_b).count();
    IntersectionResult::new(both, set_a.len() - both, set_b.len() - both)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::algo::MinimumDistance;

    #[test]
    fn rejects_invalid_threshold() {
        for t in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(MatchCalculator::new(t).is_err());
        }
        assert!(MatchCalculator::new(0.0).is_ok());
        assert!(MatchCalculator::new(1e200).is_ok());
    }

    #[test]
    fn two_close_pairs() {
        let actual = [BasePoint::new(0.0, 0.0), BasePoint::new(10.0, 10.0)];
        let predicted = [BasePoint::new(0.5, 0.5), BasePoint::new(10.5, 10.5)];

        let nn = MatchCalculator::new(1.0).unwrap();
        let md = nn.matcher(MinimumDistance::new(0.0));

        for result in [
            nn.analyse_2d(&actual, &predicted, &mut MatchOutputs::new()).unwrap(),
            md.analyse_2d(&actual, &predicted, &mut MatchOutputs::new()).unwrap(),
        ] {
            assert_eq!((result.tp(), result.fp(), result.fn_()), (2, 0, 0));
            assert_relative_eq!(result.rmsd(), 0.5f64.sqrt(), epsilon = 1e-6);
        }
    }

    #[test]
    fn minimum_distance_sums_unsquared_distances() {
        // the crossed pairing has the smaller sum of squared distances but the larger sum of
        // distances
        let angle = 139f32.to_radians();
        let actual = [BasePoint::new(0.0, 0.0), BasePoint::new(1.6, 0.0)];
        let predicted = [
            BasePoint::new(0.0, 0.0),
            BasePoint::new(1.6 * angle.cos(), 1.6 * angle.sin()),
        ];

        let direct = MinimumDistance::new(3.5)
            .matching(&actual, &predicted, |x, y| x.distance_xy(y))
            .unwrap();
        assert_eq!(direct.pairs(), &[(0, 0), (1, 1)]);

        let mut pairs = Vec::new();
        let result = MatchCalculator::new(3.5)
            .unwrap()
            .matcher(MinimumDistance::new(0.0))
            .analyse_2d(&actual, &predicted, &mut MatchOutputs::new().pairs(&mut pairs))
            .unwrap();

        assert_eq!(result.tp(), 2);
        assert_eq!(
            pairs,
            direct
                .pairs()
                .iter()
                .map(|&(u, v)| PointPair::new(actual[u as usize], predicted[v as usize]))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn no_match() {
        let actual = [BasePoint::new(0.0, 0.0)];
        let predicted = [BasePoint::new(5.0, 5.0)];

        let mut tp = vec![BasePoint::new(1.0, 1.0)];
        let mut fp = Vec::new();
        let mut fn_ = Vec::new();
        let result = MatchCalculator::new(1.0)
            .unwrap()
            .analyse_2d(
                &actual,
                &predicted,
                &mut MatchOutputs::new()
                    .true_positives(&mut tp)
                    .false_positives(&mut fp)
                    .false_negatives(&mut fn_),
            )
            .unwrap();

        assert_eq!((result.tp(), result.fp(), result.fn_()), (0, 1, 1));
        assert_eq!(result.precision(), 0.0);
        assert_eq!(result.recall(), 0.0);
        assert_eq!(result.jaccard(), 0.0);
        assert_eq!(result.rmsd(), 0.0);

        assert!(tp.is_empty());
        assert_eq!(fp, predicted);
        assert_eq!(fn_, actual);
    }

    #[test]
    fn depth_matters_in_3d() {
        let actual = [BasePoint::new_3d(0.0, 0.0, 0.0)];
        let predicted = [BasePoint::new_3d(0.0, 0.0, 2.0)];
        let calc = MatchCalculator::new(1.0).unwrap();

        let result = calc.analyse_2d(&actual, &predicted, &mut MatchOutputs::new()).unwrap();
        assert_eq!(result.tp(), 1);

        let result = calc.analyse_3d(&actual, &predicted, &mut MatchOutputs::new()).unwrap();
        assert_eq!(result.tp(), 0);
    }

    #[test]
    fn outputs_partition_inputs() {
        let actual = [
            BasePoint::new(0.0, 0.0),
            BasePoint::new(5.0, 0.0),
            BasePoint::new(9.0, 9.0),
        ];
        let predicted = [BasePoint::new(5.2, 0.1), BasePoint::new(30.0, 30.0)];

        let (mut tp, mut fp, mut fn_) = (Vec::new(), Vec::new(), Vec::new());
        let mut pairs = Vec::new();
        let result = MatchCalculator::new(1.0)
            .unwrap()
            .analyse_2d(
                &actual,
                &predicted,
                &mut MatchOutputs::new()
                    .true_positives(&mut tp)
                    .false_positives(&mut fp)
                    .false_negatives(&mut fn_)
                    .pairs(&mut pairs),
            )
            .unwrap();

        assert_eq!(result.number_predicted(), predicted.len());
        assert_eq!(result.number_actual(), actual.len());
        assert_eq!(tp, vec![predicted[0]]);
        assert_eq!(fp, vec![predicted[1]]);
        assert_eq!(fn_, vec![actual[0], actual[2]]);
        assert_eq!(pairs, vec![PointPair::new(actual[1], predicted[0])]);
    }

    #[test]
    fn pulses() {
        let actual = [Pulse::new(0.0, 0.0, 1, 4), Pulse::new(20.0, 20.0, 1, 10)];
        let predicted = [
            // overlaps 3 frames at distance 0
            Pulse::new(0.0, 0.0, 2, 10),
            // close in space but no overlap in time
            Pulse::new(20.0, 20.0, 11, 12),
        ];

        let result = MatchCalculator::new(1.0)
            .unwrap()
            .analyse_pulses(&actual, &predicted, &mut MatchOutputs::new())
            .unwrap();

        assert_eq!(
            (result.result.tp(), result.result.fp(), result.result.fn_()),
            (1, 1, 1)
        );
        // 3 overlapping frames, max(4 + 10, 9 + 2) time points
        assert_relative_eq!(result.score, 3.0 / 14.0);
    }

    #[test]
    fn pulses_prefer_higher_scores() {
        let actual = [Pulse::new(0.0, 0.0, 1, 10)];
        let predicted = [Pulse::new(0.0, 0.0, 1, 2), Pulse::new(0.5, 0.0, 1, 10)];

        let mut tp = Vec::new();
        let result = MatchCalculator::new(1.0)
            .unwrap()
            .analyse_pulses(&actual, &predicted, &mut MatchOutputs::new().true_positives(&mut tp))
            .unwrap();

        // 10 * (1 - 0.5 * 0.25) beats 2 * 1
        assert_eq!(tp, vec![predicted[1]]);
        assert_relative_eq!(result.score, 8.75 / 12.0);
    }

    #[test]
    fn empty_pulses() {
        let result = MatchCalculator::new(1.0)
            .unwrap()
            .analyse_pulses(&[], &[], &mut MatchOutputs::new())
            .unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.result, MatchResult::default());
    }

    #[test]
    fn intersections() {
        assert_eq!(intersection(&[], &[]), IntersectionResult::default());
        let result = intersection(&[1, 1, 5, 7], &[7, 5, 9, 9, 10]);
        assert_eq!(result, IntersectionResult::new(2, 1, 2));
        assert_eq!(result.size_a(), 3);
        assert_eq!(result.size_b(), 4);
    }
}
