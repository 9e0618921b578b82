//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@quadwarp/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsRaster;
use quadwarp_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG file into an RGBA image.
///
/// EXIF orientation is applied, so the result matches what an `<img>`
/// element displays for the same file.
///
/// # Errors
///
/// Returns an error if the format is not recognized or the data is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRaster, JsValue> {
    decode::decode_image(bytes)
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// EXIF orientation tag (1-8) of the file, 1 when absent.
#[wasm_bindgen]
pub fn exif_orientation(bytes: &[u8]) -> u8 {
    decode::read_orientation(bytes) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exif_orientation_without_metadata() {
        assert_eq!(exif_orientation(&[0x00, 0x01, 0x02]), 1);
    }

    #[test]
    fn test_decode_png() {
        let raster = quadwarp_core::raster::Raster::new(3, 2, vec![200u8; 24]).unwrap();
        let png = quadwarp_core::encode::encode_png(&raster).unwrap();
        let img = decode_image(&png).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.pixels(), raster.pixels);
    }
}
