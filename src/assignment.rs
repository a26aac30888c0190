/*!
# Assignments

An assignment is a candidate pairing between a *target* (element of the actual set) and a
*predicted* element, together with the distance between both. Fractional assignments carry an
additional score, used when a match only counts partially (e.g. in ranked scoring).

Both kinds come in an immutable and a mutable flavour; the mutable ones allow reusing one
contiguous buffer in hot loops. Algorithms are generic over the [`Assignment`] and
[`FractionalAssignment`] traits.
*/

use std::cmp::Ordering;

use crate::node::Node;

/// Read access to a pairing between a target and a predicted element.
pub trait Assignment {
    /// Id of the element in the actual set
    fn target_id(&self) -> Node;

    /// Id of the element in the predicted set
    fn predicted_id(&self) -> Node;

    /// Distance between both elements
    fn distance(&self) -> f64;
}

/// An [`Assignment`] that contributes `score` (usually in `[0, 1]`) to a match.
pub trait FractionalAssignment: Assignment {
    /// Fractional score of the pairing
    fn score(&self) -> f64;
}

/// Total order of assignments by ascending distance (NaN sorts last, `-0.0` equals `0.0`).
pub fn compare_by_distance<A: Assignment>(a: &A, b: &A) -> Ordering {
    // adding zero turns -0.0 into 0.0
    (a.distance() + 0.0).total_cmp(&(b.distance() + 0.0))
}

/// Sorts assignments by ascending distance.
///
/// The sort is stable, i.e. assignments with equal distances keep their relative order.
pub fn sort_by_distance<A: Assignment>(assignments: &mut [A]) {
    assignments.sort_by(compare_by_distance);
}

macro_rules! impl_assignment {
    ($($name:ident),*) => {
        $(
            impl Assignment for $name {
                #[inline]
                fn target_id(&self) -> Node {
                    self.target_id
                }

                #[inline]
                fn predicted_id(&self) -> Node {
                    self.predicted_id
                }

                #[inline]
                fn distance(&self) -> f64 {
                    self.distance
                }
            }
        )*
    };
}

macro_rules! impl_fractional_assignment {
    ($($name:ident),*) => {
        $(
            impl FractionalAssignment for $name {
                #[inline]
                fn score(&self) -> f64 {
                    self.score
                }
            }
        )*
    };
}

/// An assignment that cannot change after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImmutableAssignment {
    target_id: Node,
    predicted_id: Node,
    distance: f64,
}

impl ImmutableAssignment {
    pub const fn new(target_id: Node, predicted_id: Node, distance: f64) -> Self {
        Self {
            target_id,
            predicted_id,
            distance,
        }
    }
}

/// An assignment whose fields can be updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MutableAssignment {
    pub target_id: Node,
    pub predicted_id: Node,
    pub distance: f64,
}

impl MutableAssignment {
    pub const fn new(target_id: Node, predicted_id: Node, distance: f64) -> Self {
        Self {
            target_id,
            predicted_id,
            distance,
        }
    }

    /// Overwrites all fields at once
    pub fn set(&mut self, target_id: Node, predicted_id: Node, distance: f64) {
        self.target_id = target_id;
        self.predicted_id = predicted_id;
        self.distance = distance;
    }

    /// Returns an immutable copy
    pub fn to_immutable(&self) -> ImmutableAssignment {
        ImmutableAssignment::new(self.target_id, self.predicted_id, self.distance)
    }
}

/// A fractional assignment that cannot change after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImmutableFractionalAssignment {
    target_id: Node,
    predicted_id: Node,
    distance: f64,
    score: f64,
}

impl ImmutableFractionalAssignment {
    pub const fn new(target_id: Node, predicted_id: Node, distance: f64, score: f64) -> Self {
        Self {
            target_id,
            predicted_id,
            distance,
            score,
        }
    }
}

/// A fractional assignment whose fields can be updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MutableFractionalAssignment {
    pub target_id: Node,
    pub predicted_id: Node,
    pub distance: f64,
    pub score: f64,
}

impl MutableFractionalAssignment {
    pub const fn new(target_id: Node, predicted_id: Node, distance: f64, score: f64) -> Self {
        Self {
            target_id,
            predicted_id,
            distance,
            score,
        }
    }

    /// Overwrites all fields at once
    pub fn set(&mut self, target_id: Node, predicted_id: Node, distance: f64, score: f64) {
        self.target_id = target_id;
        self.predicted_id = predicted_id;
        self.distance = distance;
        self.score = score;
    }

    /// Returns an immutable copy
    pub fn to_immutable(&self) -> ImmutableFractionalAssignment {
        ImmutableFractionalAssignment::new(
            self.target_id,
            self.predicted_id,
            self.distance,
            self.score,
        )
    }
}

impl_assignment!(
    ImmutableAssignment,
    MutableAssignment,
    ImmutableFractionalAssignment,
    MutableFractionalAssignment
);
impl_fractional_assignment!(ImmutableFractionalAssignment, MutableFractionalAssignment);

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn stable_distance_sort() {
        let mut assignments = vec![
            ImmutableAssignment::new(0, 0, 3.0),
            ImmutableAssignment::new(1, 1, 1.0),
            ImmutableAssignment::new(2, 2, f64::NAN),
            ImmutableAssignment::new(3, 3, 1.0),
            ImmutableAssignment::new(4, 4, 0.5),
        ];
        sort_by_distance(&mut assignments);

        assert_eq!(
            assignments.iter().map(|a| a.target_id()).collect_vec(),
            vec![4, 1, 3, 0, 2]
        );
    }

    #[test]
    fn signed_zeros_are_equal() {
        let mut assignments = vec![
            ImmutableAssignment::new(0, 0, 0.0),
            ImmutableAssignment::new(1, 1, -0.0),
        ];
        assert_eq!(
            compare_by_distance(&assignments[0], &assignments[1]),
            Ordering::Equal
        );

        sort_by_distance(&mut assignments);
        assert_eq!(
            assignments.iter().map(|a| a.target_id()).collect_vec(),
            vec![0, 1]
        );
    }

    #[test]
    fn mutable_reuse() {
        let mut buffer = vec![MutableFractionalAssignment::default(); 3];
        for (i, a) in buffer.iter_mut().enumerate() {
            a.set(i as Node, 2 - i as Node, i as f64 * 0.5, 1.0 - i as f64 * 0.25);
        }

        assert_eq!(buffer[2].predicted_id(), 0);
        assert_eq!(buffer[1].score(), 0.75);
        assert_eq!(
            buffer[2].to_immutable(),
            ImmutableFractionalAssignment::new(2, 0, 1.0, 0.5)
        );

        let mut a = MutableAssignment::new(1, 2, 3.0);
        a.distance = 4.0;
        assert_eq!(a.to_immutable(), ImmutableAssignment::new(1, 2, 4.0));
    }
}
