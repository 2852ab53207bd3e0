use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::Point3;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A 3d point relative to the camera's optical center and orientation where
/// the positive X axis is right, positive Y axis is down, and positive Z axis is forwards
/// from the optical center of the camera. The `z` component is the depth of the point.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraPoint(pub Point3<f64>);

impl CameraPoint {
    /// The depth of the point along the optical axis.
    pub fn depth(&self) -> f64 {
        self.0.z
    }
}

/// A point in the fixed reference frame the camera pose and the scene are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ReferencePoint(pub Point3<f64>);
