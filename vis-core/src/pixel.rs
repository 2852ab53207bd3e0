use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::Point2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Allows the retrieval of a location on the image plane.
pub trait ImagePoint {
    /// Retrieves the point on the image as `(row, column)`.
    fn image_point(&self) -> Point2<f64>;
}

impl ImagePoint for Point2<f64> {
    fn image_point(&self) -> Point2<f64> {
        *self
    }
}

/// A location on the image plane in pixel units.
///
/// The `x` coordinate of the inner point is the row (growing downwards, scaled by `fy`) and the
/// `y` coordinate is the column (growing to the right, scaled by `fx`). The location does not have
/// to lie on the image; projecting a point outside of the field of view yields a pixel outside of
/// `[0, height] x [0, width]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Pixel(pub Point2<f64>);

impl Pixel {
    pub fn new(row: f64, col: f64) -> Self {
        Self(Point2::new(row, col))
    }

    pub fn row(&self) -> f64 {
        self.0.x
    }

    pub fn col(&self) -> f64 {
        self.0.y
    }
}

impl ImagePoint for Pixel {
    fn image_point(&self) -> Point2<f64> {
        self.0
    }
}
