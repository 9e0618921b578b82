//! Planar geometry for quadrilateral selection.
//!
//! This module provides the point and quadrilateral types plus the numeric
//! pieces of the perspective pipeline:
//! - [`linear`]: dense Gaussian elimination with partial pivoting
//! - [`homography`]: 4-point projective transform estimation
//! - [`corners`]: deterministic top-left/top-right/bottom-right/bottom-left labelling
//!
//! # Coordinate System
//!
//! - Normalized points lie in 0.0 to 1.0 relative to the raster dimensions
//! - Pixel-space points are normalized points scaled by (width, height)
//! - Origin is top-left corner, y grows downward

pub mod corners;
pub mod homography;
pub mod linear;

pub use corners::classify;
pub use homography::Homography;
pub use linear::solve;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative tolerance for area and collinearity checks, scaled by the
/// squared extent of the quadrilateral.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// Errors from geometric validation and numeric solving.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// The quadrilateral has zero area or three of its points are collinear.
    #[error("Degenerate quadrilateral: zero area or three collinear points")]
    DegenerateQuadrilateral,

    /// The linear system has no usable pivot.
    #[error("Singular linear system: no pivot above numerical tolerance")]
    SingularSystem,

    /// A normalized point is non-finite or outside 0.0..=1.0.
    #[error("Point ({x}, {y}) is outside the normalized range 0..1")]
    PointOutOfRange { x: f64, y: f64 },
}

/// A 2-D point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a normalized point, rejecting values outside 0.0..=1.0.
    pub fn normalized(x: f64, y: f64) -> Result<Self, GeometryError> {
        let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_range(x) || !in_range(y) {
            return Err(GeometryError::PointOutOfRange { x, y });
        }
        Ok(Self { x, y })
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// An ordered quadrilateral of exactly four points.
///
/// Order carries no geometric meaning on its own; it only has to agree
/// between the source and destination of a correspondence. Use
/// [`Quad::canonicalize`] to obtain `[TL, TR, BR, BL]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad {
    pub corners: [Point; 4],
}

impl Quad {
    /// Create a quad from arbitrary (typically pixel-space) points.
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Create a quad from normalized points, validating each one.
    pub fn from_normalized(corners: [Point; 4]) -> Result<Self, GeometryError> {
        for p in &corners {
            Point::normalized(p.x, p.y)?;
        }
        Ok(Self { corners })
    }

    /// Axis-aligned rectangle `(0,0) (w,0) (w,h) (0,h)` in `[TL, TR, BR, BL]` order.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new([
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ])
    }

    /// Scale normalized coordinates to pixel space.
    pub fn to_pixel_space(&self, width: u32, height: u32) -> Quad {
        let (w, h) = (width as f64, height as f64);
        Quad::new(self.corners.map(|p| Point::new(p.x * w, p.y * h)))
    }

    /// Reorder the corners as `[TL, TR, BR, BL]`. See [`corners::classify`].
    pub fn canonicalize(&self) -> Quad {
        Quad::new(classify(self.corners))
    }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in &self.corners {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        b
    }

    /// Signed area by the shoelace formula. Positive for clockwise order in
    /// image coordinates (y down).
    pub fn signed_area(&self) -> f64 {
        let c = &self.corners;
        let mut twice = 0.0;
        for i in 0..4 {
            let j = (i + 1) % 4;
            twice += c[i].x * c[j].y - c[j].x * c[i].y;
        }
        twice / 2.0
    }

    /// True if the quad has (near) zero area or any three corners are collinear.
    pub fn is_degenerate(&self) -> bool {
        if self.corners.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return true;
        }
        let b = self.bounds();
        let extent = b.width().max(b.height());
        if extent <= 0.0 {
            return true;
        }
        let tolerance = COLLINEAR_TOLERANCE * extent * extent;

        if self.signed_area().abs() <= tolerance {
            return true;
        }

        // Every choice of three corners out of four
        const TRIPLES: [(usize, usize, usize); 4] =
            [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
        let c = &self.corners;
        TRIPLES.iter().any(|&(i, j, k)| {
            let (ux, uy) = (c[j].x - c[i].x, c[j].y - c[i].y);
            let (vx, vy) = (c[k].x - c[i].x, c[k].y - c[i].y);
            (ux * vy - uy * vx).abs() <= tolerance
        })
    }

    /// Fail with [`GeometryError::DegenerateQuadrilateral`] if degenerate.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.is_degenerate() {
            return Err(GeometryError::DegenerateQuadrilateral);
        }
        Ok(())
    }
}
