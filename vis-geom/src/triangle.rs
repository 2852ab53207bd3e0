use crate::{planar, Halfspace, Segment};
use float_ord::FloatOrd;
use vis_core::nalgebra::{Point2, Point3, Rotation3, Unit, Vector3};
use vis_core::Tolerance;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A triangle in space with vertices `a`, `b` and `c`, typically one face of an occluding mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Triangle {
    pub a: Point3<f64>,
    pub b: Point3<f64>,
    pub c: Point3<f64>,
}

impl Triangle {
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [Point3<f64>; 3] {
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

    /// `(b - a) × (c - a)`, with a length of twice the area.
    pub fn normal(&self) -> Vector3<f64> {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    pub fn unit_normal(&self, tolerance: Tolerance) -> Option<Unit<Vector3<f64>>> {
        if self.is_degenerate(tolerance) {
            return None;
        }
        Unit::try_new(self.normal(), 0.0)
    }

    pub fn area(&self) -> f64 {
        0.5 * self.normal().norm()
    }

    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
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

    /// The plane of the triangle, facing along [`normal`](Self::normal).
    pub fn hyperplane(&self, tolerance: Tolerance) -> Option<Halfspace> {
        self.unit_normal(tolerance)
            .map(|normal| Halfspace::new(self.a, normal))
    }

    /// The rotation taking the triangle's normal onto `target`.
    ///
    /// Returns `None` when the triangle is degenerate or the normal is already parallel (or
    /// antiparallel) to `target`, in which case no rotation is needed to make it flat.
    pub fn alignment(
        &self,
        target: &Unit<Vector3<f64>>,
        tolerance: Tolerance,
    ) -> Option<Rotation3<f64>> {
        let source = self.unit_normal(tolerance)?;
        let axis = source.cross(target);
        let axis = Unit::try_new(axis, tolerance.epsilon)?;
        let angle = source.dot(target).clamp(-1.0, 1.0).acos();
        Some(Rotation3::from_axis_angle(&axis, angle))
    }

    /// Rotates the triangle about the origin so that its normal is parallel to `target`.
    ///
    /// The rotation used is returned alongside so the caller can undo it.
    pub fn align_with(
        &self,
        target: &Unit<Vector3<f64>>,
        tolerance: Tolerance,
    ) -> (Self, Rotation3<f64>) {
        let rotation = self
            .alignment(target, tolerance)
            .unwrap_or_else(Rotation3::identity);
        let [a, b, c] = self.vertices().map(|vertex| rotation * vertex);
        (Self::new(a, b, c), rotation)
    }

    /// Drops the z coordinate.
    pub fn planar(&self) -> planar::Triangle {
        let [a, b, c] = self.vertices().map(|vertex| Point2::new(vertex.x, vertex.y));
        planar::Triangle::new(a, b, c)
    }

    /// The point of the (filled) triangle nearest to `point`.
    ///
    /// The triangle and the point are rotated so the triangle is flat in the z plane, the problem is
    /// solved in two dimensions, and the answer is rotated back.
    pub fn closest_point_to(&self, point: &Point3<f64>, tolerance: Tolerance) -> Point3<f64> {
        if self.is_degenerate(tolerance) {
            return self
                .segments()
                .iter()
                .map(|edge| edge.closest_point_to(point))
                .min_by_key(|candidate| FloatOrd((candidate - point).norm_squared()))
                .unwrap_or(self.a);
        }
        let (aligned, rotation) = self.align_with(&Vector3::z_axis(), tolerance);
        let rotated = rotation * point;
        let height = aligned.a.z;
        let closest = aligned
            .planar()
            .closest_point_to(&Point2::new(rotated.x, rotated.y), tolerance);
        rotation.inverse() * Point3::new(closest.x, closest.y, height)
    }

    /// The distance between `point` and the nearest point of the triangle.
    ///
    /// ```
    /// use vis_core::Tolerance;
    /// use vis_core::nalgebra::Point3;
    /// use vis_geom::Triangle;
    ///
    /// let floor = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    ///     Point3::new(0.0, 2.0, 0.0),
    /// );
    /// let distance = floor.distance_to(&Point3::new(0.5, 0.5, 3.0), Tolerance::default());
    /// assert!((distance - 3.0).abs() < 1e-9);
    /// ```
    pub fn distance_to(&self, point: &Point3<f64>, tolerance: Tolerance) -> f64 {
        (self.closest_point_to(point, tolerance) - point).norm()
    }

    /// The point where the segment passes through the triangle, boundary included.
    pub fn intersection(&self, segment: &Segment, tolerance: Tolerance) -> Option<Point3<f64>> {
        let hit = self.hyperplane(tolerance)?.intersection(segment, tolerance)?;
        let (aligned, rotation) = self.align_with(&Vector3::z_axis(), tolerance);
        let rotated = rotation * hit;
        aligned
            .planar()
            .is_inside(&Point2::new(rotated.x, rotated.y), tolerance)
            .then(|| hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tilted() -> Triangle {
        Triangle::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn alignment_flattens() {
        let tolerance = Tolerance::default();
        let (aligned, rotation) = tilted().align_with(&Vector3::z_axis(), tolerance);
        assert_relative_eq!(aligned.a.z, aligned.b.z, epsilon = 1e-12);
        assert_relative_eq!(aligned.a.z, aligned.c.z, epsilon = 1e-12);
        assert_relative_eq!(aligned.area(), tilted().area(), epsilon = 1e-12);
        assert_relative_eq!(aligned.planar().area(), tilted().area(), epsilon = 1e-12);
        assert_relative_eq!(
            rotation.inverse() * aligned.b,
            tilted().b,
            epsilon = 1e-12
        );
    }

    #[test]
    fn already_aligned_uses_identity() {
        let tolerance = Tolerance::default();
        let flat = Triangle::new(
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
        );
        assert!(flat.alignment(&Vector3::z_axis(), tolerance).is_none());
        let (aligned, rotation) = flat.align_with(&Vector3::z_axis(), tolerance);
        assert_eq!(rotation, Rotation3::identity());
        assert_eq!(aligned, flat);
    }

    #[test]
    fn closest_point_on_tilted_triangle() {
        let tolerance = Tolerance::default();
        // The foot of the perpendicular from the origin lands on the centroid.
        assert_relative_eq!(
            tilted().closest_point_to(&Point3::origin(), tolerance),
            tilted().centroid(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            tilted().distance_to(&Point3::origin(), tolerance),
            1.0 / 3.0f64.sqrt(),
            epsilon = 1e-9
        );
        // Beyond a vertex the vertex itself is closest.
        assert_relative_eq!(
            tilted().closest_point_to(&Point3::new(3.0, 0.0, 0.0), tolerance),
            tilted().a,
            epsilon = 1e-9
        );
    }

    #[test]
    fn segment_through_triangle() {
        let tolerance = Tolerance::default();
        let centroid = tilted().centroid();
        let through = Segment::new(Point3::origin(), Point3::from(centroid.coords * 2.0));
        assert_relative_eq!(
            tilted().intersection(&through, tolerance).unwrap(),
            centroid,
            epsilon = 1e-9
        );
        let miss = Segment::new(Point3::origin(), Point3::new(-1.0, 2.0, 2.0));
        assert!(tilted().intersection(&miss, tolerance).is_none());
    }

    #[test]
    fn degenerate_has_no_normal() {
        let tolerance = Tolerance::default();
        let sliver = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );
        assert!(sliver.is_degenerate(tolerance));
        assert!(sliver.unit_normal(tolerance).is_none());
        assert!(sliver.hyperplane(tolerance).is_none());
        assert_relative_eq!(
            sliver.distance_to(&Point3::new(1.0, 1.0, 1.0), tolerance),
            0.0
        );
    }
}
