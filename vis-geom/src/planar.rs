//! Segments and triangles on the image plane.
//!
//! These are used both on their own (the image-plane arrangement of projected occluders) and as the
//! reduction target of the 3d [`Triangle`](crate::Triangle) once it has been rotated flat.

use core::f64::consts::TAU;
use float_ord::FloatOrd;
use vis_core::nalgebra::{Point2, Vector2};
use vis_core::Tolerance;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A finite segment from `p0` to `p1`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Segment {
    pub p0: Point2<f64>,
    pub p1: Point2<f64>,
}

impl Segment {
    pub fn new(p0: Point2<f64>, p1: Point2<f64>) -> Self {
        Self { p0, p1 }
    }

    pub fn direction(&self) -> Vector2<f64> {
        self.p1 - self.p0
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    pub fn midpoint(&self) -> Point2<f64> {
        vis_core::nalgebra::center(&self.p0, &self.p1)
    }

    pub fn is_degenerate(&self, tolerance: Tolerance) -> bool {
        self.length() < tolerance.epsilon
    }

    /// Checks if the directions of the two segments are parallel.
    ///
    /// The cross product of the unit directions (the sine of the angle between them) is compared
    /// against epsilon. A degenerate segment is parallel to everything.
    pub fn is_parallel(&self, other: &Self, tolerance: Tolerance) -> bool {
        if self.is_degenerate(tolerance) || other.is_degenerate(tolerance) {
            return true;
        }
        let sine = self.direction().normalize().perp(&other.direction().normalize());
        tolerance.is_zero(sine)
    }

    /// The point where the two segments meet.
    ///
    /// Returns `None` if the segments are parallel or if they only meet when extended past either
    /// end. The parameter range `[0, 1]` of each segment is widened by epsilon (in length units) so
    /// that segments which touch at an endpoint still report the touching point.
    ///
    /// ```
    /// use vis_core::Tolerance;
    /// use vis_core::nalgebra::Point2;
    /// use vis_geom::planar::Segment;
    ///
    /// let a = Segment::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
    /// let b = Segment::new(Point2::new(0.0, 2.0), Point2::new(2.0, 0.0));
    /// let hit = a.intersection(&b, Tolerance::default()).unwrap();
    /// assert!((hit - Point2::new(1.0, 1.0)).norm() < 1e-12);
    ///
    /// let c = Segment::new(Point2::new(3.0, 0.0), Point2::new(3.0, 5.0));
    /// assert!(a.intersection(&c, Tolerance::default()).is_none());
    /// ```
    pub fn intersection(&self, other: &Self, tolerance: Tolerance) -> Option<Point2<f64>> {
        if self.is_parallel(other, tolerance) {
            return None;
        }
        let (d0, d1) = (self.direction(), other.direction());
        let denominator = d0.perp(&d1);
        let offset = other.p0 - self.p0;
        // Cramer's rule on p0 + t * d0 = q0 + u * d1.
        let t = offset.perp(&d1) / denominator;
        let u = offset.perp(&d0) / denominator;
        let slack_t = tolerance.epsilon / d0.norm();
        let slack_u = tolerance.epsilon / d1.norm();
        let on_self = (-slack_t..=1.0 + slack_t).contains(&t);
        let on_other = (-slack_u..=1.0 + slack_u).contains(&u);
        (on_self && on_other).then(|| self.p0 + d0 * t.clamp(0.0, 1.0))
    }

    /// Checks if the point coincides with either endpoint.
    pub fn is_endpoint(&self, point: &Point2<f64>, tolerance: Tolerance) -> bool {
        tolerance.coincide(point, &self.p0) || tolerance.coincide(point, &self.p1)
    }

    /// Signed distance of the point from the line through the segment, positive to the left of
    /// the direction from `p0` to `p1`.
    pub fn side(&self, point: &Point2<f64>) -> f64 {
        self.direction().perp(&(point - self.p0)) / self.length()
    }

    /// Checks if the endpoints of `other` lie strictly on opposite sides of this segment's line.
    fn separates(&self, other: &Self, tolerance: Tolerance) -> bool {
        let (s0, s1) = (self.side(&other.p0), self.side(&other.p1));
        (s0 > tolerance.epsilon && s1 < -tolerance.epsilon)
            || (s0 < -tolerance.epsilon && s1 > tolerance.epsilon)
    }

    /// Checks if the two segments properly cross, each passing through the interior of the other.
    ///
    /// This is the line-of-sight test. Only sides are compared, never a computed intersection
    /// point, so nearly parallel segments that meet at a shared endpoint are not mistaken for a
    /// crossing. Touching, overlapping and degenerate segments never cross.
    pub fn crosses(&self, other: &Self, tolerance: Tolerance) -> bool {
        if self.is_degenerate(tolerance) || other.is_degenerate(tolerance) {
            return false;
        }
        self.separates(other, tolerance) && other.separates(self, tolerance)
    }

    /// The angle, in `[0, 2π)`, by which the direction of `reference` has to be rotated
    /// counter-clockwise to match the direction of this segment.
    pub fn angle(&self, reference: &Self) -> f64 {
        let (r, d) = (reference.direction(), self.direction());
        let angle = r.perp(&d).atan2(r.dot(&d));
        let angle = if angle < 0.0 { angle + TAU } else { angle };
        // Adding TAU to a tiny negative angle rounds up to TAU.
        if angle >= TAU {
            0.0
        } else {
            angle
        }
    }

    pub fn closest_point_to(&self, point: &Point2<f64>) -> Point2<f64> {
        let direction = self.direction();
        let length_squared = direction.norm_squared();
        if length_squared == 0.0 {
            return self.p0;
        }
        let t = (point - self.p0).dot(&direction) / length_squared;
        self.p0 + direction * t.clamp(0.0, 1.0)
    }
}

/// A triangle with vertices `a`, `b` and `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Triangle {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
    pub c: Point2<f64>,
}

impl Triangle {
    pub fn new(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [Point2<f64>; 3] {
        [self.a, self.b, self.c]
    }

    /// The edges `ab`, `bc` and `ca`.
    pub fn segments(&self) -> [Segment; 3] {
        [
            Segment::new(self.a, self.b),
            Segment::new(self.b, self.c),
            Segment::new(self.c, self.a),
        ]
    }

    pub fn centroid(&self) -> Point2<f64> {
        Point2::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// Positive when `a`, `b`, `c` turn counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        0.5 * (self.b - self.a).perp(&(self.c - self.a))
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// A triangle is degenerate when its height over the longest edge is below epsilon.
    pub fn is_degenerate(&self, tolerance: Tolerance) -> bool {
        let longest = self
            .segments()
            .iter()
            .map(|segment| FloatOrd(segment.length()))
            .max()
            .map_or(0.0, |FloatOrd(length)| length);
        longest < tolerance.epsilon || 2.0 * self.area() < tolerance.epsilon * longest
    }

    /// Distances from the point to the lines through each edge, positive on the inner side.
    fn edge_distances(&self, point: &Point2<f64>) -> [f64; 3] {
        let orientation = self.signed_area().signum();
        self.segments().map(|edge| {
            orientation * edge.direction().perp(&(point - edge.p0)) / edge.length()
        })
    }

    /// Checks if the point is inside the triangle or within epsilon of its boundary.
    ///
    /// Degenerate triangles contain nothing.
    pub fn is_inside(&self, point: &Point2<f64>, tolerance: Tolerance) -> bool {
        !self.is_degenerate(tolerance)
            && self
                .edge_distances(point)
                .iter()
                .all(|&distance| distance >= -tolerance.epsilon)
    }

    /// Checks if the point is inside the triangle and further than epsilon from its boundary.
    pub fn strictly_contains(&self, point: &Point2<f64>, tolerance: Tolerance) -> bool {
        !self.is_degenerate(tolerance)
            && self
                .edge_distances(point)
                .iter()
                .all(|&distance| distance > tolerance.epsilon)
    }

    /// The point of the (filled) triangle nearest to `point`.
    pub fn closest_point_to(&self, point: &Point2<f64>, tolerance: Tolerance) -> Point2<f64> {
        if self.is_inside(point, tolerance) {
            return *point;
        }
        self.segments()
            .iter()
            .map(|edge| edge.closest_point_to(point))
            .min_by_key(|candidate| FloatOrd((candidate - point).norm_squared()))
            .unwrap_or(self.a)
    }
}
