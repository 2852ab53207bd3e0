use thiserror::Error;
use vis_core::nalgebra::{Matrix3, Point2, Vector2, Vector3};
use vis_core::{CameraModel, CameraPoint, ImagePoint, Pixel};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The reasons a set of intrinsics cannot describe a camera.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IntrinsicsError {
    #[error("focal lengths must be finite and non-zero, got fx = {fx}, fy = {fy}")]
    Focals { fx: f64, fy: f64 },
    #[error("principal point must be finite, got cx = {cx}, cy = {cy}")]
    PrincipalPoint { cx: f64, cy: f64 },
    #[error("image must have a non-zero size, got {height}x{width}")]
    Resolution { height: u32, width: u32 },
    #[error("maximum range must be positive and finite, got {0}")]
    MaxRange(f64),
}

/// This contains intrinsic camera parameters as per
/// [this Wikipedia page](https://en.wikipedia.org/wiki/Camera_resectioning#Intrinsic_parameters),
/// together with the size of the image and the range of the sensor.
///
/// `focals` is `(fx, fy)` and `principal_point` is `(cx, cy)`. Columns are scaled by `fx` and
/// offset by `cx`, rows are scaled by `fy` and offset by `cy`. Note that a [`Pixel`] is written
/// `(row, column)`, so its coordinates are in the opposite order to the principal point's.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    pub focals: Vector2<f64>,
    pub principal_point: Point2<f64>,
    /// Number of rows.
    pub height: u32,
    /// Number of columns.
    pub width: u32,
    /// Depth at which the viewing frustum ends.
    pub max_range: f64,
}

impl Default for CameraIntrinsics {
    /// A 640x480 depth sensor with a range of 1.5.
    fn default() -> Self {
        Self {
            focals: Vector2::new(525.0, 525.0),
            principal_point: Point2::new(319.5, 239.5),
            height: 480,
            width: 640,
            max_range: 1.5,
        }
    }
}

impl CameraIntrinsics {
    pub fn focals(self, focals: Vector2<f64>) -> Self {
        Self { focals, ..self }
    }

    pub fn focal(self, focal: f64) -> Self {
        Self {
            focals: Vector2::new(focal, focal),
            ..self
        }
    }

    pub fn principal_point(self, principal_point: Point2<f64>) -> Self {
        Self {
            principal_point,
            ..self
        }
    }

    pub fn resolution(self, height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            ..self
        }
    }

    pub fn max_range(self, max_range: f64) -> Self {
        Self { max_range, ..self }
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.focals.x,  0.0,            self.principal_point.x,
            0.0,            self.focals.y,  self.principal_point.y,
            0.0,            0.0,            1.0,
        )
    }

    /// `width * height` in square pixels.
    pub fn area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }

    /// The corners of the image, counter-clockwise in `(row, column)` coordinates starting at the
    /// top left: `(0, 0)`, `(H, 0)`, `(H, W)`, `(0, W)`.
    pub fn corners(&self) -> [Pixel; 4] {
        let (h, w) = (f64::from(self.height), f64::from(self.width));
        [
            Pixel::new(0.0, 0.0),
            Pixel::new(h, 0.0),
            Pixel::new(h, w),
            Pixel::new(0.0, w),
        ]
    }

    /// Checks that the intrinsics describe a camera that can project and back-project.
    ///
    /// ```
    /// use vis_pinhole::{CameraIntrinsics, IntrinsicsError};
    ///
    /// assert!(CameraIntrinsics::default().validate().is_ok());
    /// assert_eq!(
    ///     CameraIntrinsics::default().max_range(0.0).validate(),
    ///     Err(IntrinsicsError::MaxRange(0.0)),
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), IntrinsicsError> {
        let (fx, fy) = (self.focals.x, self.focals.y);
        if !fx.is_finite() || !fy.is_finite() || fx == 0.0 || fy == 0.0 {
            return Err(IntrinsicsError::Focals { fx, fy });
        }
        let (cx, cy) = (self.principal_point.x, self.principal_point.y);
        if !cx.is_finite() || !cy.is_finite() {
            return Err(IntrinsicsError::PrincipalPoint { cx, cy });
        }
        if self.height == 0 || self.width == 0 {
            return Err(IntrinsicsError::Resolution {
                height: self.height,
                width: self.width,
            });
        }
        if !self.max_range.is_finite() || self.max_range <= 0.0 {
            return Err(IntrinsicsError::MaxRange(self.max_range));
        }
        Ok(())
    }
}

impl CameraModel for CameraIntrinsics {
    /// Takes a `(row, column)` location on the image and returns the direction through it at a
    /// depth of `1.0`.
    ///
    /// ```
    /// use vis_core::{CameraModel, CameraPoint, Pixel};
    /// use vis_core::nalgebra::Point3;
    /// use vis_pinhole::CameraIntrinsics;
    ///
    /// let intrinsics = CameraIntrinsics::default();
    /// let pixel = Pixel::new(100.0, 471.0);
    /// let direction = intrinsics.calibrate(pixel);
    /// let back = intrinsics.uncalibrate(CameraPoint(Point3::from(direction * 0.8))).unwrap();
    /// assert!((back.0 - pixel.0).norm() < 1e-9);
    /// ```
    fn calibrate<P>(&self, pixel: P) -> Vector3<f64>
    where
        P: ImagePoint,
    {
        let point = pixel.image_point();
        let (row, col) = (point.x, point.y);
        Vector3::new(
            (col - self.principal_point.x) / self.focals.x,
            (row - self.principal_point.y) / self.focals.y,
            1.0,
        )
    }

    fn uncalibrate(&self, point: CameraPoint) -> Option<Pixel> {
        let projected = Point2::from_homogeneous(self.matrix() * point.0.coords)?;
        Some(Pixel::new(projected.y, projected.x))
    }
}
