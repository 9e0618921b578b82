//! WASM bindings for quadrilateral transforms.
//!
//! Points are passed as an array of four `{x, y}` objects in normalized
//! coordinates (0.0 to 1.0 relative to the image).
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const points = [
//!   { x: 0.2, y: 0.2 }, { x: 0.8, y: 0.2 },
//!   { x: 0.8, y: 0.8 }, { x: 0.2, y: 0.8 },
//! ];
//! const [w, h] = output_dimensions(points, image.width, image.height);
//! const corrected = warp_quad(image, points, w, h);
//! ```

use crate::types::{quad_from_js, JsRaster};
use quadwarp_core::export;
use quadwarp_core::transform::{self, Execution, WarpOptions};
use wasm_bindgen::prelude::*;

/// Map the selected quadrilateral onto an `out_width`×`out_height` rectangle.
///
/// Point order does not matter; corners are classified before warping.
/// Runs single-threaded inside WASM.
///
/// # Errors
///
/// Returns an error for a degenerate selection or invalid output size.
#[wasm_bindgen]
pub fn warp_quad(
    image: &JsRaster,
    points: JsValue,
    out_width: u32,
    out_height: u32,
) -> Result<JsRaster, JsValue> {
    let quad = quad_from_js(points)?;
    let options = WarpOptions {
        execution: Execution::Serial,
        ..WarpOptions::default()
    };
    transform::warp_with(&image.to_raster(), &quad, out_width, out_height, &options, None)
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Make everything outside the quadrilateral transparent.
///
/// Points are used in the given order, as the outline is drawn.
#[wasm_bindgen]
pub fn clip_quad(image: &JsRaster, points: JsValue) -> Result<JsRaster, JsValue> {
    let quad = quad_from_js(points)?;
    transform::clip(&image.to_raster(), &quad)
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Crop a normalized rectangle (clamped, at least 1x1 pixel).
#[wasm_bindgen]
pub fn crop_to_bounds(
    image: &JsRaster,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> Result<JsRaster, JsValue> {
    transform::crop_to_bounds(&image.to_raster(), left, top, width, height)
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Output size for the selection as `[width, height]`.
#[wasm_bindgen]
pub fn output_dimensions(points: JsValue, width: u32, height: u32) -> Result<Vec<u32>, JsValue> {
    let quad = quad_from_js(points)?;
    let (w, h) = export::output_dimensions(&quad, width, height)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(vec![w, h])
}
