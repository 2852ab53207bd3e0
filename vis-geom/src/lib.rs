//! This crate contains the geometric primitives used to reason about what a camera can see.
//!
//! The image plane is two dimensional and lives in [`planar`]. Everything at the crate root is three
//! dimensional: [`Segment`], [`Triangle`], [`Halfspace`], the rectangular [`Beam`] used for the
//! camera frustum and the triangular [`Pyramid`] used for its pieces.
//!
//! Every predicate takes a [`Tolerance`](vis_core::Tolerance). Degenerate input (zero-length
//! segments, zero-area triangles) never fails loudly: intersections return `None` and membership
//! tests return `false`.
//!
//! ## Halfspace orientation
//!
//! A [`Halfspace`] contains the points its normal points towards. The halfspaces of a [`Beam`] or
//! [`Pyramid`] all point into the solid, so a point is inside exactly when every one of them
//! contains it.
//!
//! ```text
//!   b --- a        base is the apex of the beam,
//!   |     |        a, b, c, d are the corners of its cap
//!   |     |
//!   c --- d
//! ```

mod clip;
mod halfspace;
pub mod planar;
mod pyramid;
mod segment;
mod triangle;

pub use halfspace::*;
pub use pyramid::*;
pub use segment::*;
pub use triangle::*;
