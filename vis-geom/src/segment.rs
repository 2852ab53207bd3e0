use vis_core::nalgebra::{Point3, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A finite segment in space, such as a camera ray truncated at the maximum range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Segment {
    pub p0: Point3<f64>,
    pub p1: Point3<f64>,
}

impl Segment {
    pub fn new(p0: Point3<f64>, p1: Point3<f64>) -> Self {
        Self { p0, p1 }
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.p1 - self.p0
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// The point at parameter `t`, where `0` is `p0` and `1` is `p1`.
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.p0 + self.direction() * t
    }

    pub fn midpoint(&self) -> Point3<f64> {
        self.at(0.5)
    }

    pub fn closest_point_to(&self, point: &Point3<f64>) -> Point3<f64> {
        let direction = self.direction();
        let length_squared = direction.norm_squared();
        if length_squared == 0.0 {
            return self.p0;
        }
        self.at(((point - self.p0).dot(&direction) / length_squared).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn closest_point_is_clamped() {
        let segment = Segment::new(Point3::origin(), Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(
            segment.closest_point_to(&Point3::new(1.0, 3.0, -1.0)),
            Point3::new(1.0, 0.0, 0.0)
        );
        assert_relative_eq!(
            segment.closest_point_to(&Point3::new(-5.0, 1.0, 0.0)),
            Point3::origin()
        );
        assert_relative_eq!(
            segment.closest_point_to(&Point3::new(9.0, 0.0, 0.0)),
            segment.p1
        );
    }
}
