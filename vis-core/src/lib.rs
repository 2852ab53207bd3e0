//! # Visibility Core
//!
//! This library provides the common types shared by the visibility crates: the tolerance that every
//! geometric predicate is parameterized by, poses that place a camera in a fixed reference frame,
//! pixels, and the camera model trait. The crate is kept small so that it adds negligible build time.
//! All the math is done with [`nalgebra`], which is re-exported so that every crate in the workspace
//! agrees on a single version of it.
//!
//! ## Frames
//!
//! Two frames appear everywhere:
//!
//! * The *camera frame*: origin at the optical center, positive X right, positive Y down,
//!   positive Z forwards.
//! * The *reference frame*: a fixed frame (typically the robot base) in which the camera pose and the
//!   scene triangles are expressed.
//!
//! The camera's extrinsic pose is a [`CameraToReference`], which maps a [`CameraPoint`] to a
//! [`ReferencePoint`]. Its inverse is a [`ReferenceToCamera`].
//!
//! ```text
//!        reference frame
//!              |
//!              |   CameraToReference
//!              v
//!   @@@@@@@@@@@@@@@@@@@@@  <- image plane (rows down, columns right)
//!          \       /
//!           \     /
//!            \   /
//!              O          <- optical center
//! ```

mod camera;
mod pixel;
mod point;
mod pose;
mod tolerance;

pub use camera::*;
pub use nalgebra;
pub use pixel::*;
pub use point::*;
pub use pose::*;
pub use tolerance::*;
