//! Planar homography (projective transform) estimation.
//!
//! A homography maps `(x, y)` to `(x', y')` through a 3×3 matrix defined up
//! to scale. With `a33` fixed to 1 the remaining eight coefficients are
//! determined by four point correspondences:
//!
//! ```text
//! a11·sx + a12·sy + a13 - dx·a31·sx - dx·a32·sy = dx
//! a21·sx + a22·sy + a23 - dy·a31·sx - dy·a32·sy = dy
//! ```
//!
//! Mapping a point:
//!
//! ```text
//! denom = a31·x + a32·y + 1
//! x' = (a11·x + a12·y + a13) / denom
//! y' = (a21·x + a22·y + a23) / denom
//! ```

use serde::{Deserialize, Serialize};

use super::linear::solve;
use super::{GeometryError, Point, Quad};

/// Points whose projective denominator is smaller than this have no finite
/// image and are skipped.
pub const DENOMINATOR_EPSILON: f64 = 1e-4;

/// Projective transform with `a33 = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
}

impl Default for Homography {
    fn default() -> Self {
        Self::identity()
    }
}

impl Homography {
    /// The identity transform.
    pub const fn identity() -> Self {
        Self {
            a11: 1.0,
            a12: 0.0,
            a13: 0.0,
            a21: 0.0,
            a22: 1.0,
            a23: 0.0,
            a31: 0.0,
            a32: 0.0,
        }
    }

    /// Build from `[a11, a12, a13, a21, a22, a23, a31, a32]`.
    pub fn from_coefficients(c: [f64; 8]) -> Self {
        Self {
            a11: c[0],
            a12: c[1],
            a13: c[2],
            a21: c[3],
            a22: c[4],
            a23: c[5],
            a31: c[6],
            a32: c[7],
        }
    }

    /// Estimate the homography mapping each `src` corner onto the `dst`
    /// corner at the same index.
    ///
    /// Both quads are validated before solving.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::DegenerateQuadrilateral`] if either quad has zero
    ///   area or three collinear corners
    /// - [`GeometryError::SingularSystem`] if the 8×8 system cannot be solved
    pub fn estimate(src: &Quad, dst: &Quad) -> Result<Self, GeometryError> {
        src.validate()?;
        dst.validate()?;

        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for (i, (s, d)) in src.corners.iter().zip(dst.corners.iter()).enumerate() {
            a[2 * i] = [s.x, s.y, 1.0, 0.0, 0.0, 0.0, -d.x * s.x, -d.x * s.y];
            b[2 * i] = d.x;
            a[2 * i + 1] = [0.0, 0.0, 0.0, s.x, s.y, 1.0, -d.y * s.x, -d.y * s.y];
            b[2 * i + 1] = d.y;
        }

        let h = Self::from_coefficients(solve(a, b)?);
        log::debug!("estimated homography {:?}", h.coefficients());
        Ok(h)
    }

    /// Row-major 3×3 matrix including `a33 = 1`.
    pub fn coefficients(&self) -> [f64; 9] {
        [
            self.a11, self.a12, self.a13, self.a21, self.a22, self.a23, self.a31, self.a32, 1.0,
        ]
    }

    /// Map a point through the transform.
    ///
    /// Returns `None` when the denominator is within [`DENOMINATOR_EPSILON`]
    /// of zero (the point maps to infinity).
    #[inline]
    pub fn map(&self, p: Point) -> Option<Point> {
        self.map_xy(p.x, p.y).map(|(x, y)| Point::new(x, y))
    }

    #[inline]
    pub(crate) fn map_xy(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let denom = self.a31 * x + self.a32 * y + 1.0;
        if denom.abs() < DENOMINATOR_EPSILON {
            return None;
        }
        Some((
            (self.a11 * x + self.a12 * y + self.a13) / denom,
            (self.a21 * x + self.a22 * y + self.a23) / denom,
        ))
    }

    /// True if every coefficient is within `tolerance` of the identity.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.coefficients()
            .iter()
            .zip(Self::identity().coefficients().iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}
