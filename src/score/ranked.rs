/*!
# Ranked Scoring

Evaluates a *ranked* prediction: predictions are identified by their rank `0..number_of_predicted`
and linked to actual elements by [`FractionalAssignment`]s. Scoring the first `n` predictions
answers how good the prediction would be if it were truncated after rank `n`.

Assignments are consumed in ascending order of distance. In single-match mode an actual and a
predicted element take part in at most one accepted assignment each. In multi-match mode only
actual elements are exclusive; a prediction may collect score from several actual elements, but
counts at most once as a false positive.
*/

use itertools::Itertools;
use tracing::debug;

use crate::{assignment::*, error::*, node::*, utils::div_zero};

/// Counts of a ranked score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RankedScore {
    /// Sum of the scores of all accepted assignments
    pub tp: f64,
    /// Fractional false positives
    pub fp: f64,
    /// Number of predictions with at least one accepted assignment
    pub tp_count: usize,
    /// Number of predictions without accepted assignment
    pub fp_count: usize,
}

impl RankedScore {
    /// Returns `[tp, fp, tp_count, fp_count]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.tp, self.fp, self.tp_count as f64, self.fp_count as f64]
    }
}

/// Precision, recall and Jaccard index after considering the first `i` predictions, for
/// `i = 0..=n`. By convention the precision without any prediction is `1`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrecisionRecallCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub jaccard: Vec<f64>,
}

impl PrecisionRecallCurve {
    /// Number of points on the curve
    pub fn len(&self) -> usize {
        self.precision.len()
    }

    pub fn is_empty(&self) -> bool {
        self.precision.is_empty()
    }
}

/// Scores ranked predictions given as fractional assignments.
///
/// # Example
/// ```
/// use bimatch::{prelude::*, score::RankedScoreCalculator};
///
/// let assignments = vec![
///     ImmutableFractionalAssignment::new(0, 0, 0.1, 1.0),
///     ImmutableFractionalAssignment::new(1, 2, 0.2, 1.0),
/// ];
/// let mut calc = RankedScoreCalculator::new(assignments, 2, 3).unwrap();
///
/// // the second prediction is wrong
/// let score = calc.score(2, false, false);
/// assert_eq!(score.to_array(), [1.0, 1.0, 1.0, 1.0]);
///
/// let score = calc.score(3, false, false);
/// assert_eq!(score.to_array(), [2.0, 1.0, 2.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct RankedScoreCalculator<F> {
    assignments: Vec<F>,
    number_of_actual: usize,
    number_of_predicted: usize,
    scored: Vec<F>,
}

impl<F: FractionalAssignment + Clone> RankedScoreCalculator<F> {
    /// Creates a calculator for `number_of_actual` actual elements and `number_of_predicted`
    /// ranked predictions. The assignments are sorted by ascending distance.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if an assignment refers to an id out of range.
    pub fn new(
        mut assignments: Vec<F>,
        number_of_actual: usize,
        number_of_predicted: usize,
    ) -> Result<Self> {
        raise_error_unless!(
            number_of_actual <= INVALID_NODE as usize
                && number_of_predicted <= INVALID_NODE as usize,
            MatchError::invalid_argument("number_of_actual", "too many elements")
        );

        if let Some(a) = assignments.iter().find(|a| {
            a.target_id() as usize >= number_of_actual
                || a.predicted_id() as usize >= number_of_predicted
        }) {
            return Err(MatchError::invalid_argument(
                "assignments",
                format!(
                    "assignment {} <=> {} out of range {number_of_actual} x {number_of_predicted}",
                    a.target_id(),
                    a.predicted_id()
                ),
            ));
        }

        sort_by_distance(&mut assignments);

        Ok(Self {
            assignments,
            number_of_actual,
            number_of_predicted,
            scored: Vec::new(),
        })
    }

    /// Creates a calculator with the number of actual and predicted elements derived from the
    /// largest ids of the assignments
    ///
    /// # Errors
    /// Returns `InvalidArgument` if an id is [`INVALID_NODE`].
    pub fn create(assignments: Vec<F>) -> Result<Self> {
        let count = |id: Option<Node>| id.map_or(0, |id| (id as usize).saturating_add(1));
        let number_of_actual = count(assignments.iter().map(|a| a.target_id()).max());
        let number_of_predicted = count(assignments.iter().map(|a| a.predicted_id()).max());

        Self::new(assignments, number_of_actual, number_of_predicted)
    }

    pub fn number_of_actual(&self) -> usize {
        self.number_of_actual
    }

    pub fn number_of_predicted(&self) -> usize {
        self.number_of_predicted
    }

    /// Assignments sorted by ascending distance
    pub fn assignments(&self) -> &[F] {
        &self.assignments
    }

    /// Assignments accepted by the last call of [`RankedScoreCalculator::score`] with `save`
    pub fn scored_assignments(&self) -> &[F] {
        &self.scored
    }

    /// Scores the first `number_of_predictions` predictions (clamped to the number of
    /// predictions). If `multiple_matches` is set, a prediction may be matched to several actual
    /// elements. If `save` is set, the accepted assignments are kept for
    /// [`RankedScoreCalculator::scored_assignments`].
    pub fn score(
        &mut self,
        number_of_predictions: usize,
        multiple_matches: bool,
        save: bool,
    ) -> RankedScore {
        let n = number_of_predictions.min(self.number_of_predicted);

        let mut accepted = Vec::new();
        let score = if multiple_matches {
            self.score_multiple(n, &mut accepted)
        } else {
            self.score_single(n, &mut accepted)
        };

        if save {
            self.scored = accepted.into_iter().map(|i| self.assignments[i].clone()).collect();
        }

        debug!(
            n,
            multiple_matches,
            tp = score.tp,
            fp = score.fp,
            "ranked score"
        );

        score
    }

    /// Greedy single-match pass over the assignments with `predicted_id < n`.
    /// Calls `accept` with the index of every accepted assignment.
    fn single_matches(&self, n: usize, mut accept: impl FnMut(usize)) -> usize {
        let mut matched_actual = NodeBitSet::new(self.number_of_actual as NumNodes);
        let mut matched_predicted = NodeBitSet::new(n as NumNodes);
        let limit = self.number_of_actual.min(n);

        let mut count = 0;
        for (i, a) in self.assignments.iter().enumerate() {
            if count == limit {
                break;
            }

            let (t, p) = (a.target_id(), a.predicted_id());
            if p as usize >= n || matched_actual.get_bit(t) || matched_predicted.get_bit(p) {
                continue;
            }

            matched_actual.set_bit(t);
            matched_predicted.set_bit(p);
            accept(i);
            count += 1;
        }

        count
    }

    fn score_single(&self, n: usize, accepted: &mut Vec<usize>) -> RankedScore {
        let tp_count = self.single_matches(n, |i| accepted.push(i));
        let tp: f64 = accepted.iter().map(|&i| self.assignments[i].score()).sum();

        RankedScore {
            tp,
            fp: n as f64 - tp,
            tp_count,
            fp_count: n - tp_count,
        }
    }

    fn score_multiple(&self, n: usize, accepted: &mut Vec<usize>) -> RankedScore {
        let mut matched_actual = NodeBitSet::new(self.number_of_actual as NumNodes);
        let mut score_of_predicted = vec![0.0; n];
        let mut tp = 0.0;

        for (i, a) in self.assignments.iter().enumerate() {
            if accepted.len() == self.number_of_actual {
                break;
            }

            let (t, p) = (a.target_id(), a.predicted_id() as usize);
            if p >= n || matched_actual.set_bit(t) {
                continue;
            }

            score_of_predicted[p] += a.score();
            tp += a.score();
            accepted.push(i);
        }

        let tp_count = accepted
            .iter()
            .map(|&i| self.assignments[i].predicted_id())
            .unique()
            .count();
        let fp: f64 = score_of_predicted.iter().map(|&s| 1.0 - s.min(1.0)).sum();

        RankedScore {
            tp,
            fp,
            tp_count,
            fp_count: n - tp_count,
        }
    }

    /// Computes the precision-recall curve of the first `number_of_predictions` predictions
    /// (clamped to the number of predictions).
    ///
    /// Assignments are matched greedily in single-match mode over all considered predictions;
    /// the score of every accepted assignment is attributed to the rank of its prediction.
    pub fn precision_recall_curve(&self, number_of_predictions: usize) -> PrecisionRecallCurve {
        let n = number_of_predictions.min(self.number_of_predicted);

        let mut score_at = vec![0.0; n];
        self.single_matches(n, |i| {
            let a = &self.assignments[i];
            score_at[a.predicted_id() as usize] += a.score();
        });

        let actual = self.number_of_actual as f64;
        let mut curve = PrecisionRecallCurve {
            precision: Vec::with_capacity(n + 1),
            recall: Vec::with_capacity(n + 1),
            jaccard: Vec::with_capacity(n + 1),
        };
        curve.precision.push(1.0);
        curve.recall.push(0.0);
        curve.jaccard.push(0.0);

        let mut tp = 0.0;
        for (i, s) in score_at.into_iter().enumerate() {
            tp += s;
            let predictions = (i + 1) as f64;
            curve.precision.push(tp / predictions);
            curve.recall.push(div_zero(tp, actual));
            curve.jaccard.push(tp / (predictions + actual - tp));
        }

        curve
    }
}
