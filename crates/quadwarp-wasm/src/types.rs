//! WASM-compatible wrapper types for image data and selection points.
//!
//! This module provides JavaScript-friendly types that wrap the core Quadwarp
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use js_sys::Uint8ClampedArray;
use quadwarp_core::geometry::{Point, Quad};
use quadwarp_core::raster::Raster;
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` and `image_data()`
/// copy it into JavaScript memory. Call `free()` to release a large image
/// early; otherwise wasm-bindgen's finalizer handles cleanup.
#[wasm_bindgen]
pub struct JsRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRaster {
    /// Create a raster from dimensions and RGBA pixel data
    /// (4 bytes per pixel, row-major order), e.g. `ImageData.data`.
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or the buffer length is not
    /// `width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRaster, JsValue> {
        let raster = Raster::new(width, height, pixels).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_raster(raster))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns RGBA pixel data as a Uint8ClampedArray, ready for
    /// `new ImageData(data, width, height)`.
    pub fn image_data(&self) -> Uint8ClampedArray {
        Uint8ClampedArray::from(self.pixels.as_slice())
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsRaster {
    pub(crate) fn from_raster(raster: Raster) -> Self {
        Self {
            width: raster.width,
            height: raster.height,
            pixels: raster.pixels,
        }
    }

    /// Borrow as a core raster. Clones the pixel data.
    pub(crate) fn to_raster(&self) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Helper struct for deserializing JS `{x, y}` points via serde.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub(crate) struct PointJs {
    x: f64,
    y: f64,
}

/// Parse an array of four `{x, y}` objects.
pub(crate) fn quad_from_js(points: JsValue) -> Result<Quad, JsValue> {
    let points: Vec<PointJs> = serde_wasm_bindgen::from_value(points)
        .map_err(|e| JsValue::from_str(&format!("Invalid points: {}", e)))?;
    quad_from_points(&points).map_err(|e| JsValue::from_str(&e))
}

pub(crate) fn quad_from_points(points: &[PointJs]) -> Result<Quad, String> {
    let corners: [PointJs; 4] = points
        .try_into()
        .map_err(|_| format!("Expected exactly 4 points, got {}", points.len()))?;
    Ok(Quad::new(corners.map(|p| Point::new(p.x, p.y))))
}
