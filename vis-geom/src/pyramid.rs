use crate::{Halfspace, Triangle};
use vis_core::nalgebra::Point3;
use vis_core::Tolerance;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The five faces of a [`Beam`].
///
/// The lateral faces are named after the image border they come from when the beam is a camera
/// frustum built from the corners `a = (0, W)`, `b = (0, 0)`, `c = (H, 0)`, `d = (H, W)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Side {
    /// Triangle `(base, a, d)`.
    Right,
    /// Triangle `(base, a, b)`.
    Top,
    /// Triangle `(base, b, c)`.
    Left,
    /// Triangle `(base, c, d)`.
    Bottom,
    /// The cap `a, b, c, d`.
    Front,
}

/// The triangles making up one side of a [`Beam`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Face {
    Lateral(Triangle),
    Cap([Triangle; 2]),
}

impl Face {
    pub fn triangles(&self) -> &[Triangle] {
        match self {
            Face::Lateral(triangle) => core::slice::from_ref(triangle),
            Face::Cap(triangles) => triangles,
        }
    }
}

/// A pyramid with apex `base` over the quadrilateral cap `a, b, c, d`.
///
/// The corners are kept in the order given, so [`Side`] names stay attached to the same corners.
/// Either winding of the cap is accepted: [`Beam::new`] records which one it was given and flips
/// the face normals accordingly, so both windings describe the same solid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Beam {
    base: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
    d: Point3<f64>,
    /// `1.0` when the negated cross products of the faces point inward, `-1.0` otherwise.
    orientation: f64,
}

impl Beam {
    pub fn new(
        base: Point3<f64>,
        a: Point3<f64>,
        b: Point3<f64>,
        c: Point3<f64>,
        d: Point3<f64>,
    ) -> Self {
        let cap_normal = -(b - a).cross(&(d - a));
        let orientation = if cap_normal.dot(&(base - a)) < 0.0 {
            -1.0
        } else {
            1.0
        };
        Self {
            base,
            a,
            b,
            c,
            d,
            orientation,
        }
    }

    pub fn base(&self) -> Point3<f64> {
        self.base
    }

    /// The cap vertices in the order they were given.
    pub fn corners(&self) -> [Point3<f64>; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// The five bounding planes, each facing into the beam.
    ///
    /// Returns `None` if any face is degenerate.
    pub fn halfspaces(&self, tolerance: Tolerance) -> Option<[Halfspace; 5]> {
        let Self {
            base,
            a,
            b,
            c,
            d,
            orientation,
        } = *self;
        let lateral = |p: Point3<f64>, q: Point3<f64>| {
            Halfspace::try_new(
                base,
                -orientation * (p - base).cross(&(q - base)),
                tolerance,
            )
        };
        Some([
            lateral(a, d)?,
            lateral(b, a)?,
            lateral(c, b)?,
            lateral(d, c)?,
            Halfspace::try_new(a, -orientation * (b - a).cross(&(d - a)), tolerance)?,
        ])
    }

    /// Checks if the point lies strictly inside every bounding plane.
    ///
    /// ```
    /// use vis_core::Tolerance;
    /// use vis_core::nalgebra::Point3;
    /// use vis_geom::Beam;
    ///
    /// let beam = Beam::new(
    ///     Point3::origin(),
    ///     Point3::new(1.0, 1.0, 1.0),
    ///     Point3::new(-1.0, 1.0, 1.0),
    ///     Point3::new(-1.0, -1.0, 1.0),
    ///     Point3::new(1.0, -1.0, 1.0),
    /// );
    /// let tolerance = Tolerance::default();
    /// assert!(beam.is_inside(&Point3::new(0.0, 0.0, 0.5), tolerance));
    /// assert!(!beam.is_inside(&Point3::new(0.0, 0.0, 1.5), tolerance));
    /// assert!(!beam.is_inside(&Point3::new(0.9, 0.0, 0.5), tolerance));
    /// ```
    pub fn is_inside(&self, point: &Point3<f64>, tolerance: Tolerance) -> bool {
        self.halfspaces(tolerance).map_or(false, |halfspaces| {
            halfspaces
                .iter()
                .all(|halfspace| halfspace.contains(point, tolerance))
        })
    }

    /// Like [`is_inside`](Self::is_inside), but points within epsilon of the boundary count.
    pub fn is_inside_or_on(&self, point: &Point3<f64>, tolerance: Tolerance) -> bool {
        self.halfspaces(tolerance).map_or(false, |halfspaces| {
            halfspaces
                .iter()
                .all(|halfspace| halfspace.signed_distance(point) >= -tolerance.epsilon)
        })
    }

    pub fn side(&self, side: Side) -> Face {
        let Self {
            base, a, b, c, d, ..
        } = *self;
        match side {
            Side::Right => Face::Lateral(Triangle::new(base, a, d)),
            Side::Top => Face::Lateral(Triangle::new(base, a, b)),
            Side::Left => Face::Lateral(Triangle::new(base, b, c)),
            Side::Bottom => Face::Lateral(Triangle::new(base, c, d)),
            Side::Front => Face::Cap([Triangle::new(a, b, c), Triangle::new(a, d, c)]),
        }
    }
}

/// A triangular pyramid with apex `base` over the cap `a, b, c`.
///
/// This is the unit of the visibility decomposition: every cell of the image is swept out to a
/// pyramid that ends at the occluder seen through it. As with [`Beam`], the constructor settles
/// the winding so that face normals point inward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Pyramid {
    base: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
}

impl Pyramid {
    pub fn new(base: Point3<f64>, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        let cap_normal = -(b - a).cross(&(c - a));
        if cap_normal.dot(&(base - a)) < 0.0 {
            Self { base, a, b: c, c: b }
        } else {
            Self { base, a, b, c }
        }
    }

    pub fn apex(&self) -> Point3<f64> {
        self.base
    }

    pub fn corners(&self) -> [Point3<f64>; 3] {
        [self.a, self.b, self.c]
    }

    /// The far face of the pyramid.
    pub fn cap(&self) -> Triangle {
        Triangle::new(self.a, self.b, self.c)
    }

    /// The four bounding planes, each facing into the pyramid.
    ///
    /// Returns `None` if any face is degenerate.
    pub fn halfspaces(&self, tolerance: Tolerance) -> Option<[Halfspace; 4]> {
        let Self { base, a, b, c } = *self;
        let lateral = |p: Point3<f64>, q: Point3<f64>| {
            Halfspace::try_new(base, -(p - base).cross(&(q - base)), tolerance)
        };
        Some([
            lateral(a, c)?,
            lateral(b, a)?,
            lateral(c, b)?,
            Halfspace::try_new(
                self.cap().centroid(),
                -(b - a).cross(&(c - a)),
                tolerance,
            )?,
        ])
    }

    /// Checks if the point lies strictly inside every bounding plane.
    pub fn is_inside(&self, point: &Point3<f64>, tolerance: Tolerance) -> bool {
        self.halfspaces(tolerance).map_or(false, |halfspaces| {
            halfspaces
                .iter()
                .all(|halfspace| halfspace.contains(point, tolerance))
        })
    }

    pub fn volume(&self) -> f64 {
        let Self { base, a, b, c } = *self;
        (a - base).cross(&(b - base)).dot(&(c - base)).abs() / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn beam(flip: bool) -> Beam {
        let (a, b, c, d) = (
            Point3::new(1.0, 1.0, 2.0),
            Point3::new(-1.0, 1.0, 2.0),
            Point3::new(-1.0, -1.0, 2.0),
            Point3::new(1.0, -1.0, 2.0),
        );
        if flip {
            Beam::new(Point3::origin(), a, d, c, b)
        } else {
            Beam::new(Point3::origin(), a, b, c, d)
        }
    }

    #[test]
    fn winding_does_not_matter() {
        let tolerance = Tolerance::default();
        for flip in [false, true] {
            let beam = beam(flip);
            assert!(beam.is_inside(&Point3::new(0.0, 0.0, 1.0), tolerance));
            assert!(beam.is_inside(&Point3::new(0.4, -0.4, 1.0), tolerance));
            assert!(!beam.is_inside(&Point3::new(0.6, 0.0, 1.0), tolerance));
            assert!(!beam.is_inside(&Point3::new(0.0, 0.0, 2.5), tolerance));
            assert!(!beam.is_inside(&Point3::new(0.0, 0.0, -0.5), tolerance));
        }
        assert_eq!(beam(true).corners()[1], Point3::new(1.0, -1.0, 2.0));
    }

    #[test]
    fn boundary_is_outside_but_on() {
        let tolerance = Tolerance::default();
        let beam = beam(false);
        let on_cap = Point3::new(0.0, 0.0, 2.0);
        assert!(!beam.is_inside(&on_cap, tolerance));
        assert!(beam.is_inside_or_on(&on_cap, tolerance));
        assert!(!beam.is_inside(&beam.base(), tolerance));
        assert!(beam.is_inside_or_on(&beam.base(), tolerance));
    }

    #[test]
    fn sides_cover_the_surface() {
        let beam = beam(false);
        let lateral: f64 = [Side::Right, Side::Top, Side::Left, Side::Bottom]
            .iter()
            .map(|&side| beam.side(side).triangles()[0].area())
            .sum();
        // Each lateral face has base 2 and slant height sqrt(5).
        assert_relative_eq!(lateral, 4.0 * 5.0f64.sqrt(), epsilon = 1e-12);
        let cap: f64 = beam.side(Side::Front).triangles().iter().map(Triangle::area).sum();
        assert_relative_eq!(cap, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn pyramid_winding_and_volume() {
        let tolerance = Tolerance::default();
        let a = Point3::new(0.0, 0.0, 1.0);
        let b = Point3::new(1.0, 0.0, 1.0);
        let c = Point3::new(0.0, 1.0, 1.0);
        for pyramid in [
            Pyramid::new(Point3::origin(), a, b, c),
            Pyramid::new(Point3::origin(), a, c, b),
        ] {
            assert!(pyramid.is_inside(&Point3::new(0.2, 0.2, 0.8), tolerance));
            assert!(!pyramid.is_inside(&Point3::new(0.2, 0.2, 1.2), tolerance));
            assert!(!pyramid.is_inside(&Point3::new(-0.1, 0.2, 0.8), tolerance));
            assert_relative_eq!(pyramid.volume(), 1.0 / 6.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn flat_pyramid_contains_nothing() {
        let tolerance = Tolerance::default();
        let flat = Pyramid::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        );
        assert!(!flat.is_inside(&Point3::new(0.5, 0.5, 0.0), tolerance));
        assert!(!flat.is_inside(&Point3::new(0.6, 0.7, 0.0), tolerance));
        let pinched = Pyramid::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        );
        assert!(pinched.halfspaces(tolerance).is_none());
        assert!(!pinched.is_inside(&Point3::new(0.3, 0.3, 0.9), tolerance));
    }
}
