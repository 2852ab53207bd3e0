use crate::{CameraIntrinsics, IntrinsicsError};
use log::warn;
use vis_core::nalgebra::Point3;
use vis_core::{
    CameraModel, CameraPoint, CameraToReference, ImagePoint, Pixel, Pose, PoseSource,
    ReferencePoint,
};
use vis_geom::{planar, Beam, Segment, Triangle};

/// A pinhole camera placed in the reference frame.
///
/// The camera owns its intrinsics but not its pose: it asks the [`PoseSource`] every time the pose
/// is needed. Use [`Camera::snapshot`] to freeze the pose for a sequence of queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera<S = CameraToReference> {
    intrinsics: CameraIntrinsics,
    source: S,
}

impl<S> Camera<S>
where
    S: PoseSource,
{
    /// Creates a camera after checking that the intrinsics are usable.
    pub fn new(intrinsics: CameraIntrinsics, source: S) -> Result<Self, IntrinsicsError> {
        intrinsics.validate()?;
        Ok(Self { intrinsics, source })
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// The current camera pose, as reported by the pose source.
    pub fn pose(&self) -> CameraToReference {
        self.source.camera_pose()
    }

    /// The optical center in the reference frame.
    pub fn origin(&self) -> Point3<f64> {
        self.pose().origin().0
    }

    /// A camera fixed at the current pose.
    pub fn snapshot(&self) -> Camera<CameraToReference> {
        Camera {
            intrinsics: self.intrinsics,
            source: self.pose(),
        }
    }

    /// Projects a reference-frame point onto the image.
    ///
    /// Returns `None` if the point has zero depth in the camera frame. Points outside of the field
    /// of view (or behind the camera) still produce a pixel.
    pub fn pixel_from_point(&self, point: &Point3<f64>) -> Option<Pixel> {
        let point = self.pose().inverse().transform(ReferencePoint(*point));
        self.intrinsics.uncalibrate(point)
    }

    /// The ray from the optical center through the pixel, ending at the maximum range.
    ///
    /// The far end of the ray is at a depth of `max_range` along the optical axis, so the rays through
    /// the corners are longer than the ray through the principal point.
    ///
    /// ```
    /// use vis_core::{CameraToReference, Pixel, Pose};
    /// use vis_core::nalgebra::Point3;
    /// use vis_pinhole::{Camera, CameraIntrinsics};
    ///
    /// let camera = Camera::new(CameraIntrinsics::default(), CameraToReference::identity()).unwrap();
    /// let pixel = Pixel::new(12.0, 600.0);
    /// let ray = camera.segment_through_pixel(pixel);
    /// assert_eq!(ray.p0, Point3::origin());
    /// assert!((ray.p1.z - 1.5).abs() < 1e-12);
    /// let back = camera.pixel_from_point(&ray.p1).unwrap();
    /// assert!((back.0 - pixel.0).norm() < 1e-9);
    /// ```
    pub fn segment_through_pixel<P>(&self, pixel: P) -> Segment
    where
        P: ImagePoint,
    {
        let pose = self.pose();
        let far = self.intrinsics.calibrate(pixel) * self.intrinsics.max_range;
        let far = pose.transform(CameraPoint(Point3::from(far)));
        Segment::new(pose.origin().0, far.0)
    }

    /// Projects every vertex of every triangle onto the image.
    ///
    /// Nothing is culled: triangles behind the camera or outside of the image still project.
    /// A triangle is skipped only if one of its vertices has zero depth.
    pub fn project_triangles(&self, triangles: &[Triangle]) -> Vec<planar::Triangle> {
        let camera = self.snapshot();
        triangles
            .iter()
            .filter_map(|triangle| {
                let projected = camera.project_triangle(triangle);
                if projected.is_none() {
                    warn!("skipping triangle with a vertex at zero depth: {:?}", triangle);
                }
                projected
            })
            .collect()
    }

    pub fn project_triangle(&self, triangle: &Triangle) -> Option<planar::Triangle> {
        let a = self.pixel_from_point(&triangle.a)?;
        let b = self.pixel_from_point(&triangle.b)?;
        let c = self.pixel_from_point(&triangle.c)?;
        Some(planar::Triangle::new(a.0, b.0, c.0))
    }

    /// The volume the camera can see: the pyramid from the optical center through the image corners
    /// out to the maximum range.
    ///
    /// The corners are `a = (0, W)`, `b = (0, 0)`, `c = (H, 0)` and `d = (H, W)` in `(row, column)`.
    pub fn frustum(&self) -> Beam {
        let camera = self.snapshot();
        let [top_left, bottom_left, bottom_right, top_right] = self.intrinsics.corners();
        let far = |pixel: Pixel| camera.segment_through_pixel(pixel).p1;
        Beam::new(
            camera.origin(),
            far(top_right),
            far(top_left),
            far(bottom_left),
            far(bottom_right),
        )
    }
}
