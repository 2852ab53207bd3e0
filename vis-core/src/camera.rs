use crate::{CameraPoint, ImagePoint, Pixel};
use nalgebra::Vector3;

/// Allows conversion between a pixel on an image and the 3d direction
/// the light came from that hit that pixel.
pub trait CameraModel {
    /// Extracts the direction through a pixel, scaled so that its depth (`z`) is `1.0`.
    ///
    /// The direction's X axis points right, Y axis points down, and Z axis points forwards.
    fn calibrate<P>(&self, pixel: P) -> Vector3<f64>
    where
        P: ImagePoint;

    /// Projects a camera-frame point onto the image.
    ///
    /// Since this is not possible for a point at zero depth, this operation is fallible.
    /// Points behind the camera still project (mirrored), no culling is performed.
    fn uncalibrate(&self, point: CameraPoint) -> Option<Pixel>;
}
