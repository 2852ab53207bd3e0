use crate::{Beam, Halfspace, Triangle};
use log::trace;
use vis_core::nalgebra::Point3;
use vis_core::Tolerance;

impl Beam {
    /// Restricts the triangle to the part of it inside the beam.
    ///
    /// The triangle is trimmed against each face of the beam in turn (Sutherland-Hodgman). The
    /// remaining convex polygon is fanned back into triangles. Every vertex of the result is inside
    /// or within epsilon of the beam. A triangle entirely outside yields nothing.
    ///
    /// ```
    /// use vis_core::Tolerance;
    /// use vis_core::nalgebra::Point3;
    /// use vis_geom::{Beam, Triangle};
    ///
    /// let beam = Beam::new(
    ///     Point3::origin(),
    ///     Point3::new(1.0, 1.0, 1.0),
    ///     Point3::new(-1.0, 1.0, 1.0),
    ///     Point3::new(-1.0, -1.0, 1.0),
    ///     Point3::new(1.0, -1.0, 1.0),
    /// );
    /// let tolerance = Tolerance::default();
    /// let inside = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.5),
    ///     Point3::new(0.1, 0.0, 0.5),
    ///     Point3::new(0.0, 0.1, 0.5),
    /// );
    /// assert_eq!(beam.clip_triangle(&inside, tolerance), vec![inside]);
    ///
    /// let behind = Triangle::new(
    ///     Point3::new(0.0, 0.0, -0.5),
    ///     Point3::new(0.1, 0.0, -0.5),
    ///     Point3::new(0.0, 0.1, -0.5),
    /// );
    /// assert!(beam.clip_triangle(&behind, tolerance).is_empty());
    /// ```
    pub fn clip_triangle(&self, triangle: &Triangle, tolerance: Tolerance) -> Vec<Triangle> {
        let halfspaces = match self.halfspaces(tolerance) {
            Some(halfspaces) => halfspaces,
            None => return Vec::new(),
        };
        let mut polygon = triangle.vertices().to_vec();
        for halfspace in &halfspaces {
            polygon = clip_polygon(&polygon, halfspace, tolerance);
            if polygon.len() < 3 {
                return Vec::new();
            }
        }
        let triangles: Vec<Triangle> = (1..polygon.len() - 1)
            .map(|i| Triangle::new(polygon[0], polygon[i], polygon[i + 1]))
            .filter(|triangle| !triangle.is_degenerate(tolerance))
            .collect();
        trace!(
            "clipped triangle to a {}-gon, {} triangles",
            polygon.len(),
            triangles.len()
        );
        triangles
    }
}

/// Keeps the part of a convex polygon at most epsilon outside of the halfspace.
fn clip_polygon(
    polygon: &[Point3<f64>],
    halfspace: &Halfspace,
    tolerance: Tolerance,
) -> Vec<Point3<f64>> {
    let keep = |distance: f64| distance >= -tolerance.epsilon;
    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (dc, dn) = (
            halfspace.signed_distance(&current),
            halfspace.signed_distance(&next),
        );
        if keep(dc) {
            clipped.push(current);
        }
        if keep(dc) != keep(dn) {
            let t = (dc / (dc - dn)).clamp(0.0, 1.0);
            clipped.push(current + (next - current) * t);
        }
    }
    dedup(clipped, tolerance)
}

/// Removes consecutive points closer than epsilon, including the last and first.
fn dedup(points: Vec<Point3<f64>>, tolerance: Tolerance) -> Vec<Point3<f64>> {
    let mut deduped: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for point in points {
        if deduped
            .last()
            .map_or(true, |last| (point - last).norm() >= tolerance.epsilon)
        {
            deduped.push(point);
        }
    }
    while deduped.len() > 1 && (deduped[0] - deduped[deduped.len() - 1]).norm() < tolerance.epsilon
    {
        deduped.pop();
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn beam() -> Beam {
        Beam::new(
            Point3::origin(),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
        )
    }

    #[test]
    fn straddling_triangle_is_trimmed() {
        let tolerance = Tolerance::default();
        // Crosses the cap at z = 1, so the part beyond it is removed.
        let triangle = Triangle::new(
            Point3::new(-0.2, 0.0, 0.5),
            Point3::new(0.2, 0.0, 0.5),
            Point3::new(0.0, 0.0, 1.5),
        );
        let clipped = beam().clip_triangle(&triangle, tolerance);
        assert!(!clipped.is_empty());
        for piece in &clipped {
            for vertex in piece.vertices() {
                assert!(beam().is_inside_or_on(&vertex, tolerance));
                assert!(vertex.z <= 1.0 + tolerance.epsilon);
            }
        }
        // The kept part is the trapezoid below z = 1: 0.5 * (0.4 + 0.2) * 0.5.
        let area: f64 = clipped.iter().map(Triangle::area).sum();
        assert_relative_eq!(area, 0.15, epsilon = 1e-9);
    }

    #[test]
    fn dedup_wraps_around() {
        let tolerance = Tolerance::default();
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1e-9),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1e-9, 0.0, 0.0),
        ];
        assert_eq!(dedup(points, tolerance).len(), 3);
    }
}
