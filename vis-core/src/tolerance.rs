use nalgebra::Point2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The tolerance shared by every geometric predicate.
///
/// Nothing in the visibility crates reads a global epsilon. Every predicate that needs one takes a
/// `Tolerance` argument so that callers (and tests) control boundary behavior deterministically.
///
/// ```
/// use vis_core::Tolerance;
///
/// let tolerance = Tolerance::new(1e-3);
/// assert!(tolerance.is_zero(5e-4));
/// assert!(!tolerance.is_zero(1e-3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Tolerance {
    pub epsilon: f64,
}

impl Tolerance {
    /// The epsilon used when nothing else is specified.
    pub const DEFAULT_EPSILON: f64 = 1e-5;

    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Strictly below epsilon in magnitude.
    #[inline(always)]
    pub fn is_zero(self, value: f64) -> bool {
        value.abs() < self.epsilon
    }

    #[inline(always)]
    pub fn approx_eq(self, a: f64, b: f64) -> bool {
        self.is_zero(a - b)
    }

    /// Two image-plane points closer than epsilon are the same point.
    #[inline(always)]
    pub fn coincide(self, a: &Point2<f64>, b: &Point2<f64>) -> bool {
        (a - b).norm() < self.epsilon
    }

    /// Quantizes the point onto the epsilon grid.
    ///
    /// Floating point coordinates that should be equal rarely are. Snapping them first lets them be
    /// deduplicated by their [`Tolerance::cell`].
    ///
    /// ```
    /// use vis_core::Tolerance;
    /// use vis_core::nalgebra::Point2;
    ///
    /// let tolerance = Tolerance::new(1e-3);
    /// let a = tolerance.snap(Point2::new(1.0, 2.0));
    /// let b = tolerance.snap(Point2::new(1.0 + 1e-7, 2.0 - 1e-7));
    /// assert_eq!(tolerance.cell(&a), tolerance.cell(&b));
    /// ```
    pub fn snap(self, point: Point2<f64>) -> Point2<f64> {
        point.map(|n| (n / self.epsilon).round() * self.epsilon)
    }

    /// The integer grid cell of a point on the epsilon grid.
    pub fn cell(self, point: &Point2<f64>) -> (i64, i64) {
        (
            (point.x / self.epsilon).round() as i64,
            (point.y / self.epsilon).round() as i64,
        )
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EPSILON)
    }
}
