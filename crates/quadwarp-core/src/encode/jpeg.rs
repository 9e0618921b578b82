//! JPEG encoding for export.
//!
//! JPEG has no alpha channel. Pixels are composited over black first, the
//! same result a canvas gives when its transparent regions are exported as
//! JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::EncodeError;
use crate::raster::{Raster, CHANNELS};

/// Encode a raster to JPEG bytes.
///
/// # Arguments
///
/// * `raster` - RGBA source
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-90: Good quality for sharing scanned documents
/// * Below 60: Visible artifacts around text edges
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>, EncodeError> {
    raster.validate()?;

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);
    let rgb = composite_over_black(&raster.pixels);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Drop alpha by premultiplying each color channel with it.
fn composite_over_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let alpha = px[3] as u16;
        for &c in &px[..3] {
            rgb.push(((c as u16 * alpha + 127) / 255) as u8);
        }
    }
    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Encoding always produces valid JPEG when given valid input.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 1u8..=100,
            alpha in any::<u8>(),
        ) {
            let pixels = (0..width * height).flat_map(|i| [(i % 256) as u8, 90, 30, alpha]).collect();
            let raster = Raster::new(width, height, pixels).unwrap();

            let jpeg = encode_jpeg(&raster, quality).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }

        /// Property: Same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in 1u8..=100,
        ) {
            let raster = Raster::new(width, height, vec![100u8; (width * height * 4) as usize]).unwrap();
            prop_assert_eq!(encode_jpeg(&raster, quality).unwrap(), encode_jpeg(&raster, quality).unwrap());
        }

        /// Property: Compositing never brightens a channel.
        #[test]
        fn prop_composite_never_brightens(px in prop::array::uniform4(any::<u8>())) {
            let rgb = composite_over_black(&px);
            for c in 0..3 {
                prop_assert!(rgb[c] <= px[c]);
            }
        }
    }
}
