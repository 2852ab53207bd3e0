//! # `vis`
//!
//! Batteries-included crate for reasoning about what a camera can see.
//!
//! This crate is meant for documentation, tutorials and quick scripts. It gathers the visibility
//! crates in one place for discoverability. A production application should depend on the
//! individual crates instead, or disable default features here and enable only the ones it needs.
//!
//! All of the basic types from `vis-core` are included in the root of the crate.
//!
//! ## Modules
//! * [`camera`] - camera models to convert pixels into rays (and back)
//! * [`geom`] - segments, triangles, halfspaces, pyramids and clipping
//! * [`visibility`] - decomposing the frustum of a camera into the volume it can see
//!
//! ```
//! use vis::camera::pinhole::{Camera, CameraIntrinsics};
//! use vis::visibility::FrustumTruncator;
//! use vis::{CameraToReference, Pose};
//!
//! let camera = Camera::new(CameraIntrinsics::default(), CameraToReference::identity()).unwrap();
//! let truncation = FrustumTruncator::new().truncate(&camera, &[]).unwrap();
//! assert_eq!(truncation.cells.len(), 2);
//! ```

pub use vis_core::*;

/// Camera models
pub mod camera {
    /// The pinhole camera model
    #[cfg(feature = "vis-pinhole")]
    pub use vis_pinhole as pinhole;
}

/// Computational geometry
pub mod geom {
    #[cfg(feature = "vis-geom")]
    pub use vis_geom::*;
}

/// Visibility of the camera frustum among occluders
pub mod visibility {
    #[cfg(feature = "truncated-frustum")]
    pub use truncated_frustum::*;
}
