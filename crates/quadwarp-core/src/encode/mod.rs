//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding rasters to lossless PNG, alpha included
//! - Encoding rasters to JPEG with configurable quality
//! - Choosing between the two from a single 0.0 to 1.0 quality value
//!
//! # Examples
//!
//! ```ignore
//! use quadwarp_core::encode::{encode_raster, OutputFormat};
//! use quadwarp_core::raster::Raster;
//!
//! let raster = Raster::new(100, 100, vec![128u8; 100 * 100 * 4]).unwrap();
//! let encoded = encode_raster(&raster, 0.9).unwrap();
//! assert_eq!(encoded.format, OutputFormat::Jpeg);
//! ```

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::{Raster, RasterError};

/// Quality at or above which PNG is written instead of JPEG.
pub const PNG_QUALITY_THRESHOLD: f64 = 0.95;

/// Errors that can occur during encoding.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality is NaN or infinite
    #[error("Invalid quality {0}: must be a finite number between 0 and 1")]
    InvalidQuality(f64),

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

impl From<RasterError> for EncodeError {
    fn from(e: RasterError) -> Self {
        match e {
            RasterError::InvalidDimensions { width, height } => {
                EncodeError::InvalidDimensions { width, height }
            }
            RasterError::InvalidPixelData { expected, actual } => {
                EncodeError::InvalidPixelData { expected, actual }
            }
        }
    }
}

/// Container format of an exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// `Png` for quality ≥ 0.95, `Jpeg` otherwise.
    pub fn from_quality(quality: f64) -> Self {
        if quality >= PNG_QUALITY_THRESHOLD {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Encoded file bytes together with their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

/// Convert a 0.0 to 1.0 quality into a JPEG quality of 1 to 100.
pub fn jpeg_quality(quality: f64) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode `raster` as PNG or JPEG depending on `quality` (0.0 to 1.0).
///
/// Out-of-range quality is clamped.
///
/// # Errors
///
/// Returns `EncodeError::InvalidQuality` for NaN or infinite quality, and the
/// encoder's error otherwise.
pub fn encode_raster(raster: &Raster, quality: f64) -> Result<EncodedImage, EncodeError> {
    if !quality.is_finite() {
        return Err(EncodeError::InvalidQuality(quality));
    }

    let format = OutputFormat::from_quality(quality);
    let bytes = match format {
        OutputFormat::Png => encode_png(raster)?,
        OutputFormat::Jpeg => encode_jpeg(raster, jpeg_quality(quality))?,
    };

    log::debug!(
        "encoded {}x{} raster as {:?} ({} bytes)",
        raster.width,
        raster.height,
        format,
        bytes.len()
    );
    Ok(EncodedImage { format, bytes })
}
