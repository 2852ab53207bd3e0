//! This crate plugs into `vis-core` and provides the pinhole camera model used for visibility
//! reasoning. It converts `(row, column)` pixels into rays out to the sensor's maximum range, and
//! back from reference-frame points to pixels using the `uncalibrate` method of the
//! [`vis_core::CameraModel`] trait.
//!
//! The [`Camera`] combines the [`CameraIntrinsics`] with a pose source and can produce its viewing
//! frustum as a [`vis_geom::Beam`].

mod camera;
mod intrinsics;

pub use camera::*;
pub use intrinsics::*;
