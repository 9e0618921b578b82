//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image, output_format } from '@quadwarp/wasm';
//!
//! const bytes = encode_image(image, 0.9);
//! const blob = new Blob([bytes], { type: mime_type(output_format(0.9)) });
//! ```

use crate::types::JsRaster;
use quadwarp_core::encode::{self, OutputFormat};
use wasm_bindgen::prelude::*;

/// Encode with the format chosen by `quality` (0.0 to 1.0): PNG at 0.95 and
/// above, JPEG below.
#[wasm_bindgen]
pub fn encode_image(image: &JsRaster, quality: f64) -> Result<Vec<u8>, JsValue> {
    encode::encode_raster(&image.to_raster(), quality)
        .map(|encoded| encoded.bytes)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode as lossless PNG, keeping transparency.
#[wasm_bindgen]
pub fn encode_png(image: &JsRaster) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(&image.to_raster()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode as JPEG (quality 1-100). Transparent areas turn black.
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsRaster, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(&image.to_raster(), quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// File extension (`"png"` or `"jpg"`) that `encode_image` will produce.
#[wasm_bindgen]
pub fn output_format(quality: f64) -> String {
    OutputFormat::from_quality(quality).extension().to_string()
}

/// MIME type for an extension returned by `output_format`.
#[wasm_bindgen]
pub fn mime_type(extension: &str) -> String {
    let format = if extension == "png" {
        OutputFormat::Png
    } else {
        OutputFormat::Jpeg
    };
    format.mime_type().to_string()
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_nan_quality_is_error() {
        let img = JsRaster::new(2, 2, vec![0u8; 16]).unwrap();
        assert!(encode_image(&img, f64::NAN).is_err());
    }
}
