use crate::Segment;
use vis_core::nalgebra::{Point3, Unit, Vector3};
use vis_core::Tolerance;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// An oriented plane through `origin`.
///
/// The unit `normal` points into the contained side. Points closer to the plane than epsilon are
/// on its boundary and are not contained.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Halfspace {
    pub origin: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
}

impl Halfspace {
    pub fn new(origin: Point3<f64>, normal: Unit<Vector3<f64>>) -> Self {
        Self { origin, normal }
    }

    /// Creates a halfspace from a normal that is not yet normalized.
    ///
    /// Returns `None` if the normal is shorter than epsilon.
    pub fn try_new(
        origin: Point3<f64>,
        normal: Vector3<f64>,
        tolerance: Tolerance,
    ) -> Option<Self> {
        Unit::try_new(normal, tolerance.epsilon).map(|normal| Self { origin, normal })
    }

    /// Distance from the plane, positive on the contained side.
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    /// Checks if the point is on the contained side by at least epsilon.
    ///
    /// ```
    /// use vis_core::Tolerance;
    /// use vis_core::nalgebra::{Point3, Vector3};
    /// use vis_geom::Halfspace;
    ///
    /// let floor = Halfspace::new(Point3::origin(), Vector3::z_axis());
    /// let tolerance = Tolerance::default();
    /// assert!(floor.contains(&Point3::new(3.0, -1.0, 0.5), tolerance));
    /// assert!(!floor.contains(&Point3::new(3.0, -1.0, 0.0), tolerance));
    /// assert!(!floor.contains(&Point3::new(0.0, 0.0, -0.5), tolerance));
    /// ```
    pub fn contains(&self, point: &Point3<f64>, tolerance: Tolerance) -> bool {
        self.signed_distance(point) >= tolerance.epsilon
    }

    /// The point where the segment passes through the plane.
    ///
    /// Returns `None` if the segment is parallel to the plane or if the plane is only reached
    /// beyond either end of the segment. The ends are given epsilon of slack.
    pub fn intersection(&self, segment: &Segment, tolerance: Tolerance) -> Option<Point3<f64>> {
        let length = segment.length();
        if length < tolerance.epsilon {
            return None;
        }
        let direction = segment.direction();
        let rate = self.normal.dot(&direction);
        if tolerance.is_zero(rate / length) {
            return None;
        }
        let t = self.normal.dot(&(self.origin - segment.p0)) / rate;
        let slack = tolerance.epsilon / length;
        (-slack..=1.0 + slack)
            .contains(&t)
            .then(|| segment.at(t))
    }
}
