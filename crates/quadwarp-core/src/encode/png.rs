//! Lossless PNG encoding with alpha.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::EncodeError;
use crate::raster::Raster;

/// Encode a raster to RGBA8 PNG bytes.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, EncodeError> {
    raster.validate()?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&raster.pixels, raster.width, raster.height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
