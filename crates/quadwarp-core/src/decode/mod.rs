//! Image decoding.
//!
//! Turns uploaded JPEG or PNG bytes into an RGBA [`Raster`]. The EXIF
//! orientation tag is applied so the raster matches what a browser shows for
//! the same file, which is the frame the user placed the selection points in.
//!
//! # Examples
//!
//! ```ignore
//! use quadwarp_core::decode::decode_image;
//!
//! let bytes = std::fs::read("receipt.jpg").unwrap();
//! let raster = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", raster.width, raster.height);
//! ```

mod orientation;

pub use orientation::{read_orientation, Orientation};

use std::io::Cursor;

use image::{ImageError, ImageReader};
use thiserror::Error;

use crate::raster::Raster;

/// Error types for image decoding operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The bytes are not a JPEG or PNG file.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

impl From<ImageError> for DecodeError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::Unsupported(_) => DecodeError::InvalidFormat,
            other => DecodeError::CorruptedFile(other.to_string()),
        }
    }
}

/// Decode JPEG or PNG bytes into an RGBA raster with EXIF orientation applied.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized.
/// Returns `DecodeError::CorruptedFile` if the data is truncated or invalid.
pub fn decode_image(bytes: &[u8]) -> Result<Raster, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let orientation = read_orientation(bytes);
    let img = orientation.apply(reader.decode()?);

    let raster = Raster::from_rgba_image(img.into_rgba8());
    if raster.width == 0 || raster.height == 0 {
        return Err(DecodeError::CorruptedFile("image has no pixels".to_string()));
    }

    log::debug!(
        "decoded {}x{} image ({:?})",
        raster.width,
        raster.height,
        orientation
    );
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img.clone())
                .into_rgb8()
                .write_to(&mut out, format)
                .unwrap(),
            _ => img.write_to(&mut out, format).unwrap(),
        }
        out.into_inner()
    }

    /// Insert an APP1 segment carrying only an Orientation tag after SOI.
    fn with_exif_orientation(jpeg: &[u8], orientation: u8) -> Vec<u8> {
        let mut app1 = vec![0xFF, 0xE1, 0x00, 0x22];
        app1.extend_from_slice(b"Exif\0\0");
        // Big-endian TIFF header, first IFD at offset 8
        app1.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
        // One entry: tag 0x0112, SHORT, count 1
        app1.extend_from_slice(&[0x00, 0x01, 0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        app1.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
        // No next IFD
        app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_png_keeps_alpha() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 40]));
        img.put_pixel(2, 1, Rgba([200, 100, 50, 255]));

        let raster = decode_image(&encode(&img, ImageFormat::Png)).unwrap();
        assert_eq!((raster.width, raster.height), (3, 2));
        assert_eq!(raster.pixel(0, 0), Some([10, 20, 30, 40]));
        assert_eq!(raster.pixel(2, 1), Some([200, 100, 50, 255]));
    }

    #[test]
    fn test_decode_jpeg_is_opaque() {
        let img = RgbaImage::from_pixel(8, 4, Rgba([128, 128, 128, 255]));
        let raster = decode_image(&encode(&img, ImageFormat::Jpeg)).unwrap();

        assert_eq!((raster.width, raster.height), (8, 4));
        assert_eq!(raster.pixels.len(), 8 * 4 * 4);
        assert!(raster.pixels.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_exif_rotation_swaps_dimensions() {
        let img = RgbaImage::from_pixel(16, 8, Rgba([0, 0, 0, 255]));
        let jpeg = with_exif_orientation(&encode(&img, ImageFormat::Jpeg), 6);

        assert_eq!(read_orientation(&jpeg), Orientation::Rotate90CW);
        let raster = decode_image(&jpeg).unwrap();
        assert_eq!((raster.width, raster.height), (8, 16));
    }

    #[test]
    fn test_unknown_bytes_are_invalid_format() {
        assert_eq!(
            decode_image(&[0x00, 0x01, 0x02, 0x03]),
            Err(DecodeError::InvalidFormat)
        );
        assert_eq!(decode_image(&[]), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn test_truncated_png_is_corrupted() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 4]));
        let png = encode(&img, ImageFormat::Png);
        assert!(matches!(
            decode_image(&png[..40]),
            Err(DecodeError::CorruptedFile(_))
        ));
    }
}
