//! Computes the volume a camera can actually see among opaque surfaces.
//!
//! The viewing frustum of a [`Camera`] is cut into triangular [`Pyramid`]s with disjoint interiors.
//! Each pyramid is seen through one triangle of the image and either reaches the camera's maximum
//! range or ends on the nearest surface in the way.
//!
//! The work happens on the image plane:
//!
//! 1. Occluding triangles are clipped to the frustum and projected onto the image.
//! 2. Their edges, the image border and every crossing between them form an arrangement.
//! 3. The image is partitioned into triangles that no edge of the arrangement passes through, by
//!    fanning out from every point to the points it can see.
//! 4. Each partition triangle is swept out to the nearest occluder behind its centroid.
//!
//! ```
//! use vis_core::{CameraToReference, Pose};
//! use vis_core::nalgebra::Point3;
//! use vis_geom::Triangle;
//! use vis_pinhole::{Camera, CameraIntrinsics};
//! use truncated_frustum::FrustumTruncator;
//!
//! let camera = Camera::new(CameraIntrinsics::default(), CameraToReference::identity()).unwrap();
//! let wall = Triangle::new(
//!     Point3::new(-0.2, -0.2, 1.0),
//!     Point3::new(0.2, -0.2, 1.0),
//!     Point3::new(0.0, 0.2, 1.0),
//! );
//! let truncation = FrustumTruncator::new().truncate(&camera, &[wall]).unwrap();
//! assert!((truncation.covered_area() - 640.0 * 480.0).abs() < 1e-3);
//! assert!(truncation.occluded().count() >= 1);
//! ```

mod arrangement;
mod error;
mod partition;
mod truncation;

pub use error::*;
pub use truncation::*;

use arrangement::Arrangement;
use float_ord::FloatOrd;
use log::{debug, trace, warn};
use partition::{Outcome, Partition};
use truncation::far_pyramid;
use vis_core::nalgebra::Point2;
use vis_core::{CameraToReference, PoseSource, Tolerance};
use vis_geom::{planar, Pyramid, Triangle};
use vis_pinhole::Camera;

/// Decomposes a camera frustum into pyramids truncated at the nearest occluder.
///
/// The refinement that partitions the image is bounded by `max_rounds` passes and by `max_points`
/// arrangement points, so every call terminates. When a bound is hit the call fails and the caller
/// can fall back to [`Truncation::unclipped`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrustumTruncator {
    tolerance: Tolerance,
    max_rounds: usize,
    max_points: usize,
    coverage_tolerance: f64,
}

impl FrustumTruncator {
    /// Creates a `FrustumTruncator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the tolerance used by every geometric predicate.
    ///
    /// Default is [`Tolerance::default`].
    #[must_use]
    pub fn tolerance(self, tolerance: Tolerance) -> Self {
        Self { tolerance, ..self }
    }

    /// Set the maximum number of passes over the arrangement points.
    ///
    /// Default is `8`.
    #[must_use]
    pub fn max_rounds(self, max_rounds: usize) -> Self {
        Self { max_rounds, ..self }
    }

    /// Set the maximum number of points in the arrangement.
    ///
    /// Default is `4096`.
    #[must_use]
    pub fn max_points(self, max_points: usize) -> Self {
        Self { max_points, ..self }
    }

    /// Set the fraction of the image area the partition may fall short by and still count as
    /// complete.
    ///
    /// Default is `1e-6`.
    #[must_use]
    pub fn coverage_tolerance(self, coverage_tolerance: f64) -> Self {
        Self {
            coverage_tolerance,
            ..self
        }
    }

    /// Computes the visible volume of the camera among the `occluders`.
    ///
    /// The occluders are expressed in the same reference frame as the camera pose. The pose is read
    /// once at the start.
    ///
    /// # Panics
    ///
    /// Panics if a partition triangle is found to end on an occluder but the rays through its
    /// corners miss the occluder's plane. The partition guarantees this cannot happen for triangles
    /// it accepted, so a panic means the geometry predicates disagree with each other.
    pub fn truncate<S>(
        &self,
        camera: &Camera<S>,
        occluders: &[Triangle],
    ) -> Result<Truncation, TruncationError>
    where
        S: PoseSource,
    {
        let camera = camera.snapshot();
        let tolerance = self.tolerance;
        let frustum = camera.frustum();

        let clipped: Vec<Triangle> = occluders
            .iter()
            .flat_map(|occluder| frustum.clip_triangle(occluder, tolerance))
            .collect();
        debug!(
            "clipped {} occluders to {} triangles inside the frustum",
            occluders.len(),
            clipped.len()
        );

        let mut kept = Vec::with_capacity(clipped.len());
        let mut footprints = Vec::with_capacity(clipped.len());
        for occluder in clipped {
            match self.footprint(&camera, &occluder) {
                Some(footprint) => {
                    kept.push(occluder);
                    footprints.push(footprint);
                }
                None => trace!("occluder {:?} is seen edge on", occluder),
            }
        }

        let mut arrangement = Arrangement::new(tolerance);
        let corners = camera.intrinsics().corners();
        for (i, corner) in corners.iter().enumerate() {
            arrangement.insert_edge(corner.0, corners[(i + 1) % corners.len()].0);
        }
        for footprint in &footprints {
            for edge in footprint.segments() {
                arrangement.insert_edge(edge.p0, edge.p1);
            }
        }
        arrangement.insert_intersections();
        let points = arrangement.points.len();
        debug!(
            "arrangement has {} points and {} segments",
            points,
            arrangement.segment_count()
        );
        if points > self.max_points {
            return Err(TruncationError::TooManyPoints {
                points,
                limit: self.max_points,
            });
        }

        let expected = camera.intrinsics().area();
        let mut partition = Partition::default();
        let outcome = partition.grow(
            &mut arrangement,
            expected * (1.0 - self.coverage_tolerance),
            self.max_rounds,
            tolerance,
        );
        match outcome {
            Outcome::Covered { rounds } => debug!(
                "partitioned the image into {} triangles in {} rounds",
                partition.triangles.len(),
                rounds
            ),
            Outcome::Stalled { rounds } => {
                warn!(
                    "partition covers {} of {} after {} rounds",
                    partition.covered, expected, rounds
                );
                return Err(TruncationError::NonConvergence {
                    covered: partition.covered,
                    expected,
                    rounds,
                });
            }
        }

        let cells = partition
            .triangles
            .iter()
            .map(|pixels| self.cell(&camera, &kept, pixels))
            .collect();
        Ok(Truncation {
            cells,
            occluders: kept,
        })
    }

    /// The occluder projected onto the image, or `None` if it covers no area there.
    ///
    /// Clipping leaves the occluder inside the frustum, so its projection only strays from the
    /// image by rounding and is clamped back.
    fn footprint(
        &self,
        camera: &Camera<CameraToReference>,
        occluder: &Triangle,
    ) -> Option<planar::Triangle> {
        let intrinsics = camera.intrinsics();
        let (height, width) = (f64::from(intrinsics.height), f64::from(intrinsics.width));
        let clamp = |pixel: Point2<f64>| {
            Point2::new(pixel.x.clamp(0.0, height), pixel.y.clamp(0.0, width))
        };
        let projected = camera.project_triangle(occluder)?;
        let [a, b, c] = projected.vertices().map(clamp);
        let footprint = planar::Triangle::new(a, b, c);
        (!footprint.is_degenerate(self.tolerance)).then(|| footprint)
    }

    fn cell(
        &self,
        camera: &Camera<CameraToReference>,
        occluders: &[Triangle],
        pixels: &planar::Triangle,
    ) -> Cell {
        let tolerance = self.tolerance;
        let origin = camera.origin();
        let ray = camera.segment_through_pixel(pixels.centroid());
        let nearest = occluders
            .iter()
            .enumerate()
            .filter_map(|(index, occluder)| {
                occluder
                    .intersection(&ray, tolerance)
                    .map(|hit| (index, (hit - origin).norm()))
            })
            .min_by_key(|&(_, distance)| FloatOrd(distance));

        let (index, _) = match nearest {
            Some(nearest) => nearest,
            None => {
                return Cell {
                    pixels: *pixels,
                    pyramid: far_pyramid(camera, pixels),
                    occluder: None,
                }
            }
        };
        let occluder = &occluders[index];
        let plane = match occluder.hyperplane(tolerance) {
            Some(plane) => plane,
            None => panic!("occluder {:?} was hit but has no plane", occluder),
        };
        let [a, b, c] = pixels.vertices().map(|vertex| {
            let ray = camera.segment_through_pixel(vertex);
            match plane.intersection(&ray, tolerance) {
                Some(hit) => hit,
                None => panic!(
                    "ray through {:?} misses the plane of occluder {:?} seen through the centroid of {:?}",
                    vertex, occluder, pixels
                ),
            }
        });
        Cell {
            pixels: *pixels,
            pyramid: Pyramid::new(origin, a, b, c),
            occluder: Some(index),
        }
    }
}

impl Default for FrustumTruncator {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            max_rounds: 8,
            max_points: 4096,
            coverage_tolerance: 1e-6,
        }
    }
}
