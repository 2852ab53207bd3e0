use vis_core::nalgebra::Point2;
use vis_core::PoseSource;
use vis_geom::{planar, Pyramid, Triangle};
use vis_pinhole::Camera;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// One piece of the visible volume.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Cell {
    /// The part of the image this piece is seen through, in `(row, column)` pixels.
    pub pixels: planar::Triangle,
    /// The volume from the optical center through `pixels` up to the occluder, or up to the maximum
    /// range if nothing is in the way.
    pub pyramid: Pyramid,
    /// Index into [`Truncation::occluders`] of the surface the pyramid ends on.
    pub occluder: Option<usize>,
}

/// The visible volume of a camera, as pyramids with disjoint interiors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Truncation {
    pub cells: Vec<Cell>,
    /// The occluding triangles after clipping to the frustum, in the reference frame.
    pub occluders: Vec<Triangle>,
}

impl Truncation {
    /// The whole frustum as visible, split into two pyramids along the image diagonal.
    ///
    /// This is the fallback when [`FrustumTruncator::truncate`](crate::FrustumTruncator::truncate)
    /// fails.
    ///
    /// ```
    /// use vis_core::{CameraToReference, Pose};
    /// use vis_pinhole::{Camera, CameraIntrinsics};
    /// use truncated_frustum::Truncation;
    ///
    /// let camera = Camera::new(CameraIntrinsics::default(), CameraToReference::identity()).unwrap();
    /// let truncation = Truncation::unclipped(&camera);
    /// assert_eq!(truncation.cells.len(), 2);
    /// assert_eq!(truncation.covered_area(), 640.0 * 480.0);
    /// ```
    pub fn unclipped<S>(camera: &Camera<S>) -> Self
    where
        S: PoseSource,
    {
        let camera = camera.snapshot();
        let [top_left, bottom_left, bottom_right, top_right] = camera.intrinsics().corners();
        let cells = [
            planar::Triangle::new(top_left.0, bottom_left.0, bottom_right.0),
            planar::Triangle::new(top_left.0, bottom_right.0, top_right.0),
        ]
        .iter()
        .map(|&pixels| Cell {
            pixels,
            pyramid: far_pyramid(&camera, &pixels),
            occluder: None,
        })
        .collect();
        Self {
            cells,
            occluders: Vec::new(),
        }
    }

    pub fn pyramids(&self) -> impl Iterator<Item = &Pyramid> + '_ {
        self.cells.iter().map(|cell| &cell.pyramid)
    }

    pub fn into_pyramids(self) -> Vec<Pyramid> {
        self.cells.into_iter().map(|cell| cell.pyramid).collect()
    }

    /// Total image area of the cells in square pixels.
    pub fn covered_area(&self) -> f64 {
        self.cells.iter().map(|cell| cell.pixels.area()).sum()
    }

    /// Cells that end on an occluder.
    pub fn occluded(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|cell| cell.occluder.is_some())
    }

    /// Cells that reach the maximum range.
    pub fn unoccluded(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|cell| cell.occluder.is_none())
    }
}

/// The pyramid through the pixels out to the maximum range.
pub(crate) fn far_pyramid<S>(camera: &Camera<S>, pixels: &planar::Triangle) -> Pyramid
where
    S: PoseSource,
{
    let [a, b, c] = pixels
        .vertices()
        .map(|vertex: Point2<f64>| camera.segment_through_pixel(vertex).p1);
    Pyramid::new(camera.origin(), a, b, c)
}
