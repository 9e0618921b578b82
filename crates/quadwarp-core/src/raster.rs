//! RGBA raster type shared by every stage of the pipeline.

use thiserror::Error;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Errors raised when a raster buffer does not match its dimensions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length is width * height * 4.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a new Raster, checking that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(RasterError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a fully transparent raster (every channel zero).
    pub fn transparent(width: u32, height: u32) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0u8; byte_len(width, height)],
        })
    }

    /// Check that the public fields are still consistent.
    pub fn validate(&self) -> Result<(), RasterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = byte_len(self.width, self.height);
        if self.pixels.len() != expected {
            return Err(RasterError::InvalidPixelData {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Create a Raster from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Bytes in one row of pixels.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Read the RGBA value at (x, y). Returns `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.stride() + x as usize * CHANNELS;
        let p = &self.pixels[idx..idx + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }
}

#[inline]
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        let err = Raster::new(2, 2, vec![0u8; 15]).unwrap_err();
        assert_eq!(
            err,
            RasterError::InvalidPixelData {
                expected: 16,
                actual: 15
            }
        );
        assert!(Raster::new(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            Raster::new(0, 5, vec![]),
            Err(RasterError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Raster::transparent(5, 0),
            Err(RasterError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_validate_detects_mutated_buffer() {
        let mut r = Raster::transparent(2, 2).unwrap();
        assert!(r.validate().is_ok());
        r.pixels.pop();
        assert!(matches!(
            r.validate(),
            Err(RasterError::InvalidPixelData { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_transparent_is_zeroed() {
        let r = Raster::transparent(3, 2).unwrap();
        assert_eq!(r.pixels.len(), 24);
        assert!(r.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_pixel_access() {
        let mut pixels = vec![0u8; 2 * 2 * 4];
        pixels[12..16].copy_from_slice(&[1, 2, 3, 4]);
        let r = Raster::new(2, 2, pixels).unwrap();
        assert_eq!(r.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(r.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(r.pixel(2, 0), None);
        assert_eq!(r.pixel(0, 2), None);
    }

    #[test]
    fn test_from_rgba_image() {
        let img = image::RgbaImage::from_raw(3, 1, (0..12).collect()).unwrap();
        let r = Raster::from_rgba_image(img);
        assert_eq!((r.width, r.height), (3, 1));
        assert_eq!(r.pixel(2, 0), Some([8, 9, 10, 11]));
        assert!(r.validate().is_ok());
    }
}
