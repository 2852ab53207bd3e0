use crate::arrangement::Arrangement;
use core::f64::consts::{PI, TAU};
use log::{debug, trace};
use std::collections::HashSet;
use vis_core::Tolerance;
use vis_geom::planar::Triangle;

/// A set of image-plane triangles with disjoint interiors, grown from the fans of an
/// [`Arrangement`].
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub triangles: Vec<Triangle>,
    keys: HashSet<[usize; 3]>,
    pub covered: f64,
}

/// How a partition attempt ended.
pub enum Outcome {
    Covered { rounds: usize },
    Stalled { rounds: usize },
}

impl Partition {
    /// Grows the partition until it covers `target` square pixels, or until a round over every
    /// point adds nothing, or until `max_rounds` rounds have run.
    ///
    /// Each round visits every point and looks at angularly adjacent pairs of the points it can
    /// see. The triangle spanned by the point and a pair is kept if it is clear of the arrangement.
    /// Its edges then become obstacles for the points visited after it.
    pub fn grow(
        &mut self,
        arrangement: &mut Arrangement,
        target: f64,
        max_rounds: usize,
        tolerance: Tolerance,
    ) -> Outcome {
        for round in 0..max_rounds {
            let before = self.triangles.len();
            for center in 0..arrangement.points.len() {
                let fan = arrangement.fan(center);
                // Includes the pair closing the fan, from the last neighbour back to the first.
                let pairs = if fan.len() > 1 { fan.len() } else { 0 };
                for i in 0..pairs {
                    let (left, left_angle) = fan[i];
                    let (right, right_angle) = fan[(i + 1) % fan.len()];
                    let gap = (right_angle - left_angle).rem_euclid(TAU);
                    if gap <= tolerance.epsilon || gap >= PI {
                        continue;
                    }
                    self.try_insert(arrangement, [center, left, right], tolerance);
                }
                if self.covered >= target {
                    trace!("covered after visiting point {} in round {}", center, round);
                    return Outcome::Covered { rounds: round + 1 };
                }
            }
            debug!(
                "round {} added {} triangles, covering {} of {}",
                round,
                self.triangles.len() - before,
                self.covered,
                target
            );
            if self.triangles.len() == before {
                return Outcome::Stalled { rounds: round + 1 };
            }
        }
        Outcome::Stalled { rounds: max_rounds }
    }

    fn try_insert(
        &mut self,
        arrangement: &mut Arrangement,
        corners: [usize; 3],
        tolerance: Tolerance,
    ) -> bool {
        let mut key = corners;
        key.sort_unstable();
        if self.keys.contains(&key) {
            return false;
        }
        let [center, left, right] = corners;
        let points = &arrangement.points;
        let triangle = Triangle::new(points[center], points[left], points[right]);
        if triangle.is_degenerate(tolerance) || !arrangement.is_visible(left, right) {
            return false;
        }
        if points
            .points()
            .iter()
            .any(|point| triangle.strictly_contains(point, tolerance))
        {
            return false;
        }
        let centroid = triangle.centroid();
        let overlaps = self.triangles.iter().any(|existing| {
            existing.strictly_contains(&centroid, tolerance)
                || triangle.strictly_contains(&existing.centroid(), tolerance)
        });
        if overlaps {
            return false;
        }
        arrangement.insert_segment(center, left);
        arrangement.insert_segment(left, right);
        arrangement.insert_segment(right, center);
        self.covered += triangle.area();
        self.triangles.push(triangle);
        self.keys.insert(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vis_core::nalgebra::Point2;

    fn rectangle(height: f64, width: f64) -> Arrangement {
        let mut arrangement = Arrangement::new(Tolerance::default());
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(height, 0.0),
            Point2::new(height, width),
            Point2::new(0.0, width),
        ];
        for i in 0..4 {
            arrangement.insert_edge(corners[i], corners[(i + 1) % 4]);
        }
        arrangement
    }

    #[test]
    fn empty_rectangle_splits_along_a_diagonal() {
        let tolerance = Tolerance::default();
        let mut arrangement = rectangle(480.0, 640.0);
        let mut partition = Partition::default();
        let outcome = partition.grow(&mut arrangement, 480.0 * 640.0, 8, tolerance);
        assert!(matches!(outcome, Outcome::Covered { rounds: 1 }));
        assert_eq!(partition.triangles.len(), 2);
        assert_relative_eq!(partition.covered, 480.0 * 640.0, max_relative = 1e-9);
    }

    #[test]
    fn inner_triangle_is_respected() {
        let tolerance = Tolerance::default();
        let mut arrangement = rectangle(10.0, 10.0);
        let inner = [
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 8.0),
            Point2::new(7.0, 5.0),
        ];
        for i in 0..3 {
            arrangement.insert_edge(inner[i], inner[(i + 1) % 3]);
        }
        let inner = Triangle::new(inner[0], inner[1], inner[2]);
        let mut partition = Partition::default();
        let outcome = partition.grow(&mut arrangement, 100.0, 8, tolerance);
        assert!(matches!(outcome, Outcome::Covered { .. }));
        assert_relative_eq!(partition.covered, 100.0, epsilon = 1e-9);
        // Every cell is either the inner triangle or entirely outside of it.
        for triangle in &partition.triangles {
            let centroid = triangle.centroid();
            if inner.strictly_contains(&centroid, tolerance) {
                assert_relative_eq!(triangle.area(), inner.area(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn no_rounds_means_no_coverage() {
        let tolerance = Tolerance::default();
        let mut arrangement = rectangle(4.0, 4.0);
        let mut partition = Partition::default();
        let outcome = partition.grow(&mut arrangement, 16.0, 0, tolerance);
        assert!(matches!(outcome, Outcome::Stalled { rounds: 0 }));
        assert!(partition.triangles.is_empty());
    }
}
