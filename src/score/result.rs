/*!
# Match Results

Counts of a classification ([`MatchResult`]) and of an id set comparison ([`IntersectionResult`]),
together with the ratios derived from them. Ratios with a zero denominator are `0`.
*/

use crate::utils::div_zero;

/// Classification statistics of a predicted set against an actual set.
///
/// All ratios are derived from the counts of true positives (`tp`), false positives (`fp`) and
/// false negatives (`fn_`) and are defined as `0` if their denominator is `0`.
///
/// ```
/// use bimatch::score::MatchResult;
///
/// let result = MatchResult::new(3, 1, 2, 0.5);
/// assert_eq!(result.number_predicted(), 4);
/// assert_eq!(result.number_actual(), 5);
/// assert_eq!(result.precision(), 0.75);
/// assert_eq!(result.recall(), 0.6);
/// assert_eq!(result.jaccard(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatchResult {
    tp: usize,
    fp: usize,
    fn_: usize,
    rmsd: f64,
}

impl MatchResult {
    pub fn new(tp: usize, fp: usize, fn_: usize, rmsd: f64) -> Self {
        Self { tp, fp, fn_, rmsd }
    }

    /// Number of true positives
    pub fn tp(&self) -> usize {
        self.tp
    }

    /// Number of false positives
    pub fn fp(&self) -> usize {
        self.fp
    }

    /// Number of false negatives
    pub fn fn_(&self) -> usize {
        self.fn_
    }

    /// Root mean squared distance of all matched pairs
    pub fn rmsd(&self) -> f64 {
        self.rmsd
    }

    /// `tp + fp`
    pub fn number_predicted(&self) -> usize {
        self.tp + self.fp
    }

    /// `tp + fn`
    pub fn number_actual(&self) -> usize {
        self.tp + self.fn_
    }

    /// `tp / (tp + fp)`
    pub fn precision(&self) -> f64 {
        div_zero(self.tp as f64, (self.tp + self.fp) as f64)
    }

    /// `tp / (tp + fn)`
    pub fn recall(&self) -> f64 {
        div_zero(self.tp as f64, (self.tp + self.fn_) as f64)
    }

    /// `tp / (tp + fp + fn)`
    pub fn jaccard(&self) -> f64 {
        div_zero(self.tp as f64, (self.tp + self.fp + self.fn_) as f64)
    }

    /// Weighted harmonic mean of precision and recall, where recall is `beta` times as important
    /// as precision. Returns `0` if undefined.
    pub fn f_score(&self, beta: f64) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        let b2 = beta * beta;
        let f = ((1.0 + b2) * p * r) / (b2 * p + r);
        if f.is_nan() { 0.0 } else { f }
    }

    /// Harmonic mean of precision and recall
    pub fn f1_score(&self) -> f64 {
        self.f_score(1.0)
    }
}

/// Sizes of two sets `A`, `B` and their intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntersectionResult {
    /// `|A ∩ B|`
    pub intersection: usize,
    /// `|A \ B|`
    pub only_a: usize,
    /// `|B \ A|`
    pub only_b: usize,
}

impl IntersectionResult {
    pub fn new(intersection: usize, only_a: usize, only_b: usize) -> Self {
        Self {
            intersection,
            only_a,
            only_b,
        }
    }

    /// `|A|`
    pub fn size_a(&self) -> usize {
        self.intersection + self.only_a
    }

    /// `|B|`
    pub fn size_b(&self) -> usize {
        self.intersection + self.only_b
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn empty_result() {
        let result = MatchResult::default();
        assert_eq!(result.precision(), 0.0);
        assert_eq!(result.recall(), 0.0);
        assert_eq!(result.jaccard(), 0.0);
        assert_eq!(result.f1_score(), 0.0);
    }

    #[test]
    fn no_true_positives() {
        let result = MatchResult::new(0, 1, 1, 0.0);
        assert_eq!(result.number_predicted(), 1);
        assert_eq!(result.number_actual(), 1);
        assert_eq!(result.precision(), 0.0);
        assert_eq!(result.recall(), 0.0);
        assert_eq!(result.jaccard(), 0.0);
        assert_eq!(result.f_score(2.0), 0.0);
    }

    #[test]
    fn f_scores() {
        let result = MatchResult::new(3, 1, 2, 0.0);
        let (p, r) = (0.75, 0.6);

        assert_relative_eq!(result.f1_score(), 2.0 * p * r / (p + r));
        assert_relative_eq!(result.f_score(2.0), 5.0 * p * r / (4.0 * p + r));
        // beta = 0 degenerates to precision
        assert_relative_eq!(result.f_score(0.0), p);
    }

    #[test]
    fn perfect() {
        let result = MatchResult::new(10, 0, 0, 0.1);
        assert_eq!(result.precision(), 1.0);
        assert_eq!(result.recall(), 1.0);
        assert_eq!(result.jaccard(), 1.0);
        assert_relative_eq!(result.f1_score(), 1.0);
        assert_eq!(result.rmsd(), 0.1);
    }

    #[test]
    fn intersection_sizes() {
        let result = IntersectionResult::new(2, 3, 0);
        assert_eq!(result.size_a(), 5);
        assert_eq!(result.size_b(), 2);
    }
}
