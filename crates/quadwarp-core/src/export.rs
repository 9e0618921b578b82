//! Export pipeline: selection in, encoded file out.
//!
//! The output size is the pixel-space bounding box of the four selection
//! points. In [`ExportMode::Warp`] the selection is perspective-corrected onto
//! a rectangle of that size; in [`ExportMode::Crop`] it is clipped to the
//! quadrilateral and trimmed to the bounding box, keeping transparency
//! outside the quad. The result is then encoded as PNG or JPEG according to
//! the requested quality.

use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::{encode_raster, EncodeError, OutputFormat};
use crate::geometry::Quad;
use crate::raster::Raster;
use crate::transform::{
    clip, crop_rect, warp_with, TransformError, WarpOptions, MAX_OUTPUT_DIMENSION,
};

/// Quality used when a request does not specify one.
pub const DEFAULT_QUALITY: f64 = 0.9;

/// Errors that abort an export.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExportError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// What happens to the selection on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Mask to the quadrilateral and trim to its bounding box.
    #[default]
    Crop,
    /// Map the quadrilateral onto a rectangle.
    Warp,
}

impl ExportMode {
    /// Suffix appended to the file name stem.
    pub fn file_suffix(self) -> &'static str {
        match self {
            ExportMode::Crop => "cropped",
            ExportMode::Warp => "perspective-corrected",
        }
    }
}

/// A single export job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Normalized selection points.
    pub points: Quad,
    pub mode: ExportMode,
    /// 0.0 to 1.0; at 0.95 and above the output is PNG.
    #[serde(default = "default_quality")]
    pub quality: f64,
}

fn default_quality() -> f64 {
    DEFAULT_QUALITY
}

impl ExportRequest {
    pub fn new(points: Quad, mode: ExportMode) -> Self {
        Self {
            points,
            mode,
            quality: DEFAULT_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }
}

/// An encoded export result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

/// Pixel size of the bounding box of the normalized `quad` on a
/// `width`×`height` source, with `floor` on the minimum and `ceil` on the
/// maximum edge.
///
/// # Errors
///
/// `TransformError::InvalidOutputDimensions` if either side is zero or above
/// [`MAX_OUTPUT_DIMENSION`].
pub fn output_dimensions(quad: &Quad, width: u32, height: u32) -> Result<(u32, u32), TransformError> {
    bounded_dimensions(quad, width, height, MAX_OUTPUT_DIMENSION).map(|r| (r.2, r.3))
}

/// `(left, top, width, height)` of the pixel bounding box.
fn bounded_dimensions(
    quad: &Quad,
    width: u32,
    height: u32,
    max: u32,
) -> Result<(u32, u32, u32, u32), TransformError> {
    let b = quad.to_pixel_space(width, height).bounds();
    let (left, top) = (b.min_x.floor(), b.min_y.floor());
    let out_w = b.max_x.ceil() - left;
    let out_h = b.max_y.ceil() - top;

    let in_range = |v: f64| v.is_finite() && v >= 1.0 && v <= max as f64;
    if !in_range(out_w) || !in_range(out_h) {
        return Err(TransformError::InvalidOutputDimensions {
            width: out_w.max(0.0) as u32,
            height: out_h.max(0.0) as u32,
            max,
        });
    }
    Ok((
        left.max(0.0) as u32,
        top.max(0.0) as u32,
        out_w as u32,
        out_h as u32,
    ))
}

/// Run an export with default [`WarpOptions`].
pub fn export(source: &Raster, request: &ExportRequest) -> Result<ExportedImage, ExportError> {
    export_with(source, request, &WarpOptions::default(), None)
}

/// Run an export with explicit warp options and an optional cancel flag.
pub fn export_with(
    source: &Raster,
    request: &ExportRequest,
    options: &WarpOptions,
    cancel: Option<&AtomicBool>,
) -> Result<ExportedImage, ExportError> {
    let result = run_export(source, request, options, cancel);
    if let Err(e) = &result {
        log::warn!("export rejected: {e}");
    }
    result
}

fn run_export(
    source: &Raster,
    request: &ExportRequest,
    options: &WarpOptions,
    cancel: Option<&AtomicBool>,
) -> Result<ExportedImage, ExportError> {
    source.validate().map_err(TransformError::from)?;
    let points = Quad::from_normalized(request.points.corners).map_err(TransformError::from)?;
    let (left, top, width, height) = bounded_dimensions(
        &points,
        source.width,
        source.height,
        options.max_output_dimension,
    )?;

    log::debug!(
        "exporting {:?} {}x{} from {}x{} source",
        request.mode,
        width,
        height,
        source.width,
        source.height
    );

    let raster = match request.mode {
        ExportMode::Warp => warp_with(source, &points, width, height, options, cancel)?,
        ExportMode::Crop => crop_rect(&clip(source, &points)?, left, top, width, height)?,
    };

    let encoded = encode_raster(&raster, request.quality)?;
    Ok(ExportedImage {
        width: raster.width,
        height: raster.height,
        format: encoded.format,
        bytes: encoded.bytes,
    })
}

/// Download name for an export of `original`.
///
/// The final extension is stripped (a stem that ends up empty becomes
/// `"image"`), then `-cropped` or `-perspective-corrected` and the format's
/// extension are appended.
pub fn export_file_name(original: &str, mode: ExportMode, format: OutputFormat) -> String {
    let stem = match original.rfind('.') {
        Some(dot) if dot + 1 < original.len() && !original[dot + 1..].contains('/') => {
            &original[..dot]
        }
        _ => original,
    };
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{stem}-{}.{}", mode.file_suffix(), format.extension())
}
