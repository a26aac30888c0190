/*!
# Coordinates

Matching in microscopy compares localisations: points in the image plane (optionally with a depth)
and *pulses*, i.e. points that are visible for an inclusive range of frames.

The matching core only ever reads coordinates through the [`Coordinate`] trait, so callers can
plug in their own localisation types. [`BasePoint`] and [`Pulse`] are the provided
implementations.
*/

/// Read access to a 3D coordinate with single precision components.
///
/// All distances are computed in `f64` to avoid losing precision on large images.
pub trait Coordinate {
    /// Returns the X-coordinate
    fn x(&self) -> f32;

    /// Returns the Y-coordinate
    fn y(&self) -> f32;

    /// Returns the Z-coordinate
    fn z(&self) -> f32;

    /// Squared euclidean distance to `other` in the XY-plane
    fn distance_xy_squared<C: Coordinate + ?Sized>(&self, other: &C) -> f64 {
        let dx = self.x() as f64 - other.x() as f64;
        let dy = self.y() as f64 - other.y() as f64;
        dx * dx + dy * dy
    }

    /// Squared euclidean distance to `other` in 3D
    fn distance_xyz_squared<C: Coordinate + ?Sized>(&self, other: &C) -> f64 {
        let dz = self.z() as f64 - other.z() as f64;
        self.distance_xy_squared(other) + dz * dz
    }

    /// Euclidean distance to `other` in the XY-plane
    fn distance_xy<C: Coordinate + ?Sized>(&self, other: &C) -> f64 {
        self.distance_xy_squared(other).sqrt()
    }

    /// Euclidean distance to `other` in 3D
    fn distance_xyz<C: Coordinate + ?Sized>(&self, other: &C) -> f64 {
        self.distance_xyz_squared(other).sqrt()
    }
}

/// A plain localisation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BasePoint {
    x: f32,
    y: f32,
    z: f32,
}

impl BasePoint {
    /// Creates a new point in the plane `z = 0`
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Creates a new point in 3D
    pub const fn new_3d(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Coordinate for BasePoint {
    #[inline]
    fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    fn z(&self) -> f32 {
        self.z
    }
}

impl<C: Coordinate> Coordinate for &C {
    #[inline]
    fn x(&self) -> f32 {
        (*self).x()
    }

    #[inline]
    fn y(&self) -> f32 {
        (*self).y()
    }

    #[inline]
    fn z(&self) -> f32 {
        (*self).z()
    }
}

/// A localisation that is visible in the inclusive frame range `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    point: BasePoint,
    start: i32,
    end: i32,
}

impl Pulse {
    /// Creates a new pulse in the plane. A reversed frame range is swapped.
    pub fn new(x: f32, y: f32, start: i32, end: i32) -> Self {
        Self {
            point: BasePoint::new(x, y),
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// First frame the pulse is visible in
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Last frame the pulse is visible in
    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of frames the pulse is visible in
    pub fn time_points(&self) -> u64 {
        (self.end as i64 - self.start as i64 + 1) as u64
    }

    /// Number of frames both pulses are visible in
    pub fn overlap(&self, other: &Pulse) -> u64 {
        let start = self.start.max(other.start) as i64;
        let end = self.end.min(other.end) as i64;
        if end < start { 0 } else { (end - start + 1) as u64 }
    }

    /// Scores the agreement with `other` given the squared XY-distance `d2` between both pulses.
    ///
    /// The score is the temporal overlap weighted by a distance factor that is `1` for coincident
    /// pulses and falls quadratically to `0.5` at `threshold`. Pulses further apart than
    /// `threshold` or without overlap score `0`.
    pub fn score(&self, other: &Pulse, d2: f64, threshold: f64) -> f64 {
        let t2 = threshold * threshold;
        if !(d2 <= t2) {
            return 0.0;
        }

        let overlap = self.overlap(other);
        if overlap == 0 {
            return 0.0;
        }

        let factor = if t2 > 0.0 { 1.0 - 0.5 * d2 / t2 } else { 1.0 };
        overlap as f64 * factor
    }
}

impl Coordinate for Pulse {
    #[inline]
    fn x(&self) -> f32 {
        self.point.x
    }

    #[inline]
    fn y(&self) -> f32 {
        self.point.y
    }

    #[inline]
    fn z(&self) -> f32 {
        self.point.z
    }
}

/// A matched pair of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPair<C> {
    /// Element of the actual (ground truth) set
    pub actual: C,
    /// Element of the predicted set
    pub predicted: C,
}

impl<C: Coordinate> PointPair<C> {
    /// Creates a new pair
    pub fn new(actual: C, predicted: C) -> Self {
        Self { actual, predicted }
    }

    /// Euclidean distance of both points in the XY-plane
    pub fn distance_xy(&self) -> f64 {
        self.actual.distance_xy(&self.predicted)
    }

    /// Euclidean distance of both points in 3D
    pub fn distance_xyz(&self) -> f64 {
        self.actual.distance_xyz(&self.predicted)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn distances() {
        let a = BasePoint::new_3d(1.0, 2.0, 3.0);
        let b = BasePoint::new_3d(4.0, 6.0, 15.0);

        assert_relative_eq!(a.distance_xy_squared(&b), 25.0);
        assert_relative_eq!(a.distance_xy(&b), 5.0);
        assert_relative_eq!(a.distance_xyz_squared(&b), 169.0);
        assert_relative_eq!(a.distance_xyz(&b), 13.0);
        assert_relative_eq!(b.distance_xyz(&a), 13.0);
    }

    #[test]
    fn pulse_frames() {
        let p = Pulse::new(0.0, 0.0, 7, 3);
        assert_eq!((p.start(), p.end()), (3, 7));
        assert_eq!(p.time_points(), 5);

        let q = Pulse::new(0.0, 0.0, 6, 10);
        assert_eq!(p.overlap(&q), 2);
        assert_eq!(q.overlap(&p), 2);
        assert_eq!(p.overlap(&Pulse::new(0.0, 0.0, 8, 9)), 0);
        assert_eq!(p.overlap(&Pulse::new(0.0, 0.0, 7, 7)), 1);
    }

    #[test]
    fn pulse_score() {
        let p = Pulse::new(0.0, 0.0, 1, 4);
        let q = Pulse::new(3.0, 4.0, 2, 10);

        assert_relative_eq!(p.score(&q, 0.0, 10.0), 3.0);
        assert_relative_eq!(p.score(&q, p.distance_xy_squared(&q), 5.0), 1.5);
        assert_relative_eq!(p.score(&q, p.distance_xy_squared(&q), 4.9), 0.0);
        assert_relative_eq!(p.score(&q, f64::NAN, 5.0), 0.0);
        assert_relative_eq!(p.score(&Pulse::new(0.0, 0.0, 5, 6), 0.0, 5.0), 0.0);
    }

    #[test]
    fn point_pair() {
        let pair = PointPair::new(BasePoint::new(0.0, 0.0), BasePoint::new_3d(3.0, 4.0, 12.0));
        assert_relative_eq!(pair.distance_xy(), 5.0);
        assert_relative_eq!(pair.distance_xyz(), 13.0);
    }
}
