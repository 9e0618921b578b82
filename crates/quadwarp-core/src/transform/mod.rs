//! Raster transforms driven by a user-selected quadrilateral.
//!
//! Two operations consume the four selection points:
//! - [`clip`]: keep the straight-edged quadrilateral, make the rest transparent
//! - [`warp`]: map the quadrilateral onto an axis-aligned rectangle,
//!   removing perspective distortion
//!
//! plus the rectangular [`crop_rect`]/[`crop_to_bounds`] used to trim a clipped
//! raster to its bounding box.
//!
//! # Coordinate System
//!
//! - Selection points are normalized (0.0 to 1.0) relative to the source raster
//! - Output dimensions are in pixels
//! - Origin is top-left corner
//!
//! Every function is a pure function of its inputs; the source raster is
//! never modified.

mod clip;
mod crop;
mod tiles;
mod warp;

pub use clip::clip;
pub use crop::{crop_rect, crop_to_bounds};
pub use tiles::{tiles, Tile, DEFAULT_TILE_SIZE};
pub use warp::{resample, warp, warp_with};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::GeometryError;
use crate::raster::RasterError;

/// Largest accepted output width or height, in pixels.
pub const MAX_OUTPUT_DIMENSION: u32 = 10_000;

/// Errors that abort a transform.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    /// The selection is degenerate or the homography could not be solved.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The source raster buffer does not match its dimensions.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Requested output size is zero or above the configured limit.
    #[error("Invalid output dimensions {width}x{height}: each side must be between 1 and {max}")]
    InvalidOutputDimensions { width: u32, height: u32, max: u32 },

    /// The caller raised the cancellation flag between tiles.
    #[error("Transform cancelled")]
    Cancelled,
}

/// How warp tiles are distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Execution {
    /// Process tile rows on the rayon thread pool.
    ///
    /// Falls back to [`Execution::Serial`] when the `parallel` feature is off.
    #[default]
    Parallel,
    /// Process tiles one after another on the current thread.
    Serial,
}

/// Tuning for the perspective resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpOptions {
    /// Edge length of the square destination tiles
    pub tile_size: u32,
    /// Upper bound for output width and height
    pub max_output_dimension: u32,
    /// Work distribution strategy
    pub execution: Execution,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            max_output_dimension: MAX_OUTPUT_DIMENSION,
            execution: Execution::default(),
        }
    }
}

impl WarpOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject zero or oversized output dimensions.
    pub fn check_output_dimensions(&self, width: u32, height: u32) -> Result<(), TransformError> {
        let max = self.max_output_dimension;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(TransformError::InvalidOutputDimensions { width, height, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = WarpOptions::new();
        assert_eq!(opts.tile_size, 256);
        assert_eq!(opts.max_output_dimension, 10_000);
        assert_eq!(opts.execution, Execution::Parallel);
    }

    #[test]
    fn test_check_output_dimensions() {
        let opts = WarpOptions::default();
        assert!(opts.check_output_dimensions(1, 1).is_ok());
        assert!(opts.check_output_dimensions(10_000, 10_000).is_ok());
        assert_eq!(
            opts.check_output_dimensions(0, 10),
            Err(TransformError::InvalidOutputDimensions {
                width: 0,
                height: 10,
                max: 10_000
            })
        );
        assert!(opts.check_output_dimensions(10, 10_001).is_err());
    }

    #[test]
    fn test_custom_limit() {
        let mut opts = WarpOptions::default();
        opts.max_output_dimension = 64;
        assert!(opts.check_output_dimensions(64, 64).is_ok());
        assert!(opts.check_output_dimensions(65, 1).is_err());
    }

    #[test]
    fn test_raster_error_converts_and_clones() {
        let err = TransformError::from(RasterError::InvalidPixelData {
            expected: 16,
            actual: 15,
        });
        let copy = err.clone();
        assert_eq!(copy, err);
        assert!(matches!(copy, TransformError::Raster(RasterError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_geometry_error_message_passes_through() {
        let err = TransformError::from(GeometryError::SingularSystem);
        assert_eq!(err.to_string(), GeometryError::SingularSystem.to_string());
    }
}
