use crate::{CameraPoint, ReferencePoint, Tolerance};
use derive_more::{AsMut, AsRef, From, Into};
use nalgebra::{IsometryMatrix3, Matrix3, Matrix4, Point3, Rotation3, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// This trait is implemented by the poses in this library:
///
/// * [`CameraToReference`] - Transforms [`CameraPoint`] into [`ReferencePoint`]
/// * [`ReferenceToCamera`] - Transforms [`ReferencePoint`] into [`CameraPoint`]
pub trait Pose: From<IsometryMatrix3<f64>> + Clone + Copy {
    type InputPoint: From<Point3<f64>> + Into<Point3<f64>>;
    type OutputPoint: From<Point3<f64>> + Into<Point3<f64>>;
    type Inverse: Pose;

    /// Retrieve the isometry.
    fn isometry(self) -> IsometryMatrix3<f64>;

    /// Creates a pose with no change in position or orientation.
    fn identity() -> Self {
        IsometryMatrix3::identity().into()
    }

    /// Takes the inverse of the pose.
    fn inverse(self) -> Self::Inverse {
        self.isometry().inverse().into()
    }

    /// Create the pose from rotation and translation.
    fn from_parts(translation: Vector3<f64>, rotation: Rotation3<f64>) -> Self {
        IsometryMatrix3::from_parts(translation.into(), rotation).into()
    }

    /// Retrieve the homogeneous matrix.
    fn homogeneous(self) -> Matrix4<f64> {
        self.isometry().to_homogeneous()
    }

    /// Creates the pose from a 4x4 homogeneous matrix.
    ///
    /// Returns `None` unless the matrix is a rigid transform: the last row must be `[0 0 0 1]` and
    /// the upper-left 3x3 block must be a proper rotation, both within `tolerance`.
    ///
    /// ```
    /// use vis_core::{CameraToReference, Pose, Tolerance};
    /// use vis_core::nalgebra::{Matrix4, Rotation3, Vector3};
    ///
    /// let pose = CameraToReference::from_parts(
    ///     Vector3::new(0.1, 0.2, 0.3),
    ///     Rotation3::from_euler_angles(0.1, 0.2, 0.3),
    /// );
    /// let matrix = pose.homogeneous();
    /// let recovered = CameraToReference::from_homogeneous(matrix, Tolerance::default()).unwrap();
    /// assert!((recovered.homogeneous() - matrix).norm() < 1e-12);
    ///
    /// // Scaling is not rigid.
    /// let scaled = Matrix4::new_scaling(2.0);
    /// assert!(CameraToReference::from_homogeneous(scaled, Tolerance::default()).is_none());
    /// ```
    fn from_homogeneous(matrix: Matrix4<f64>, tolerance: Tolerance) -> Option<Self> {
        let bottom_ok = tolerance.is_zero(matrix[(3, 0)])
            && tolerance.is_zero(matrix[(3, 1)])
            && tolerance.is_zero(matrix[(3, 2)])
            && tolerance.approx_eq(matrix[(3, 3)], 1.0);
        if !bottom_ok {
            return None;
        }
        #[rustfmt::skip]
        let rotation = Matrix3::new(
            matrix[(0, 0)], matrix[(0, 1)], matrix[(0, 2)],
            matrix[(1, 0)], matrix[(1, 1)], matrix[(1, 2)],
            matrix[(2, 0)], matrix[(2, 1)], matrix[(2, 2)],
        );
        let orthonormal = (rotation.transpose() * rotation - Matrix3::identity())
            .iter()
            .all(|&n| tolerance.is_zero(n));
        if !orthonormal || !tolerance.approx_eq(rotation.determinant(), 1.0) {
            return None;
        }
        let translation = Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        Some(Self::from_parts(
            translation,
            Rotation3::from_matrix_unchecked(rotation),
        ))
    }

    /// Transform the given point to an output point.
    fn transform(self, input: Self::InputPoint) -> Self::OutputPoint {
        let point: Point3<f64> = input.into();
        Self::OutputPoint::from(self.isometry() * point)
    }

    /// Where the origin of the input frame lands in the output frame.
    fn origin(self) -> Self::OutputPoint {
        Self::OutputPoint::from(Point3::from(self.isometry().translation.vector))
    }
}

/// The extrinsic pose of a camera: the pose of the camera relative to the reference frame.
/// This transforms camera points (with depth as `z`) into reference coordinates and
/// tells you where the camera is located and oriented.
#[derive(Debug, Clone, Copy, PartialEq, AsMut, AsRef, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraToReference(pub IsometryMatrix3<f64>);

impl Pose for CameraToReference {
    type InputPoint = CameraPoint;
    type OutputPoint = ReferencePoint;
    type Inverse = ReferenceToCamera;

    #[inline(always)]
    fn isometry(self) -> IsometryMatrix3<f64> {
        self.into()
    }
}

/// The pose of the reference frame relative to the camera.
/// This maps [`ReferencePoint`] into [`CameraPoint`], changing an absolute position into
/// a vector relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq, AsMut, AsRef, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ReferenceToCamera(pub IsometryMatrix3<f64>);

impl Pose for ReferenceToCamera {
    type InputPoint = ReferencePoint;
    type OutputPoint = CameraPoint;
    type Inverse = CameraToReference;

    #[inline(always)]
    fn isometry(self) -> IsometryMatrix3<f64> {
        self.into()
    }
}

/// Supplies the current extrinsic pose of a camera.
///
/// The pose usually lives elsewhere (a kinematic chain, a transform tree). A camera only holds a
/// source and asks it for the pose when a computation starts.
///
/// ```
/// use vis_core::{CameraToReference, Pose, PoseSource};
/// use vis_core::nalgebra::{Rotation3, Vector3};
///
/// let fixed = CameraToReference::from_parts(Vector3::new(0.0, 0.0, 1.0), Rotation3::identity());
/// assert_eq!(fixed.camera_pose(), fixed);
///
/// let lookup = || CameraToReference::identity();
/// assert_eq!(lookup.camera_pose(), CameraToReference::identity());
/// ```
pub trait PoseSource {
    fn camera_pose(&self) -> CameraToReference;
}

impl PoseSource for CameraToReference {
    fn camera_pose(&self) -> CameraToReference {
        *self
    }
}

impl<F> PoseSource for F
where
    F: Fn() -> CameraToReference,
{
    fn camera_pose(&self) -> CameraToReference {
        self()
    }
}
