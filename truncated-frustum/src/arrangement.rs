//! The image-plane arrangement: points and the segments between them.

use float_ord::FloatOrd;
use std::collections::{HashMap, HashSet};
use vis_core::nalgebra::Point2;
use vis_core::Tolerance;
use vis_geom::planar::Segment;

/// Points on the image plane, deduplicated within epsilon.
///
/// Points are snapped to the epsilon grid and hashed by grid cell. A point is a duplicate of any
/// point closer than epsilon, which always lies in the same or a neighbouring cell.
#[derive(Debug, Clone)]
pub struct PointSet {
    tolerance: Tolerance,
    points: Vec<Point2<f64>>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl PointSet {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            points: Vec::new(),
            cells: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Returns the index of the point, inserting it if nothing coincides with it yet.
    pub fn insert(&mut self, point: Point2<f64>) -> usize {
        let point = self.tolerance.snap(point);
        let (x, y) = self.tolerance.cell(&point);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(existing) = self.cells.get(&(x + dx, y + dy)) {
                    if let Some(&index) = existing
                        .iter()
                        .find(|&&index| self.tolerance.coincide(&self.points[index], &point))
                    {
                        return index;
                    }
                }
            }
        }
        let index = self.points.len();
        self.points.push(point);
        self.cells.entry((x, y)).or_default().push(index);
        index
    }
}

impl core::ops::Index<usize> for PointSet {
    type Output = Point2<f64>;

    fn index(&self, index: usize) -> &Point2<f64> {
        &self.points[index]
    }
}

/// Segments between points of a [`PointSet`], used as obstacles for line of sight.
#[derive(Debug, Clone)]
pub struct Arrangement {
    tolerance: Tolerance,
    pub points: PointSet,
    segments: Vec<(usize, usize)>,
    known: HashSet<(usize, usize)>,
}

impl Arrangement {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            points: PointSet::new(tolerance),
            segments: Vec::new(),
            known: HashSet::new(),
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Adds the segment between two points. Repeated and zero-length segments are ignored.
    pub fn insert_segment(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let key = (a.min(b), a.max(b));
        if self.known.insert(key) {
            self.segments.push(key);
        }
    }

    /// Adds both points and the segment between them.
    pub fn insert_edge(&mut self, a: Point2<f64>, b: Point2<f64>) {
        let a = self.points.insert(a);
        let b = self.points.insert(b);
        self.insert_segment(a, b);
    }

    fn segment(&self, (a, b): (usize, usize)) -> Segment {
        Segment::new(self.points[a], self.points[b])
    }

    /// Adds every point where two segments meet.
    ///
    /// Segments are never split, so a single pass over all pairs finds every crossing.
    pub fn insert_intersections(&mut self) {
        let segments: Vec<Segment> = self.segments.iter().map(|&s| self.segment(s)).collect();
        let mut crossings = Vec::new();
        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                crossings.extend(a.intersection(b, self.tolerance));
            }
        }
        for crossing in crossings {
            self.points.insert(crossing);
        }
    }

    /// Checks if the straight connection between two points is unobstructed.
    ///
    /// The connection is blocked by any other point lying on it, and by any segment it properly
    /// crosses. Running along a segment, or touching one at either end of the connection, does not
    /// block.
    pub fn is_visible(&self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        let tolerance = self.tolerance;
        let connection = self.segment((from, to));
        if connection.is_degenerate(tolerance) {
            return false;
        }
        let through_point = self.points.points().iter().enumerate().any(|(index, point)| {
            index != from
                && index != to
                && tolerance.coincide(&connection.closest_point_to(point), point)
        });
        if through_point {
            return false;
        }
        !self
            .segments
            .iter()
            .any(|&segment| self.segment(segment).crosses(&connection, tolerance))
    }

    /// Every point visible from `center`, with the angle of its direction measured
    /// counter-clockwise from `(-1, 0)`, sorted by that angle.
    pub fn fan(&self, center: usize) -> Vec<(usize, f64)> {
        let reference = Segment::new(Point2::origin(), Point2::new(-1.0, 0.0));
        let mut fan: Vec<(usize, f64)> = (0..self.points.len())
            .filter(|&other| self.is_visible(center, other))
            .map(|other| {
                let angle = Segment::new(self.points[center], self.points[other]).angle(&reference);
                (other, angle)
            })
            .collect();
        fan.sort_by_key(|&(_, angle)| FloatOrd(angle));
        fan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Arrangement {
        let mut arrangement = Arrangement::new(Tolerance::default());
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        for i in 0..4 {
            arrangement.insert_edge(corners[i], corners[(i + 1) % 4]);
        }
        arrangement
    }

    #[test]
    fn near_duplicates_merge() {
        let mut points = PointSet::new(Tolerance::default());
        let a = points.insert(Point2::new(1.0, 1.0));
        let b = points.insert(Point2::new(1.0 + 3e-6, 1.0 - 3e-6));
        let c = points.insert(Point2::new(1.0, 1.1));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn duplicate_segments_are_ignored() {
        let mut arrangement = square();
        assert_eq!(arrangement.segment_count(), 4);
        arrangement.insert_segment(1, 0);
        arrangement.insert_segment(2, 2);
        assert_eq!(arrangement.segment_count(), 4);
    }

    #[test]
    fn crossing_segments_add_a_point() {
        let mut arrangement = square();
        arrangement.insert_edge(Point2::new(1.0, -1.0), Point2::new(1.0, 5.0));
        arrangement.insert_intersections();
        // 4 corners, 2 new endpoints and the 2 crossings with the square.
        assert_eq!(arrangement.points.len(), 8);
    }

    #[test]
    fn segments_block_line_of_sight() {
        let mut arrangement = square();
        // A wall across the middle of the square, ending short of its sides.
        arrangement.insert_edge(Point2::new(2.0, 1.0), Point2::new(2.0, 3.0));
        let (origin, opposite) = (0, 2);
        assert!(!arrangement.is_visible(origin, opposite));
        // The sides of the square do not block the connection along them.
        assert!(arrangement.is_visible(0, 1));
        // The end of the wall is visible from the corner.
        let wall_end = arrangement.points.insert(Point2::new(2.0, 1.0));
        assert!(arrangement.is_visible(origin, wall_end));
    }

    #[test]
    fn points_block_line_of_sight() {
        let mut arrangement = square();
        let middle = arrangement.points.insert(Point2::new(2.0, 2.0));
        assert!(!arrangement.is_visible(0, 2));
        assert!(arrangement.is_visible(0, middle));
        assert!(arrangement.is_visible(middle, 2));
    }

    #[test]
    fn fan_is_sorted_by_angle() {
        let arrangement = square();
        let fan = arrangement.fan(0);
        let visible: Vec<usize> = fan.iter().map(|&(index, _)| index).collect();
        assert_eq!(visible, vec![1, 2, 3]);
        assert!(fan.windows(2).all(|pair| pair[0].1 < pair[1].1));
    }
}
