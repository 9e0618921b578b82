//! Quadwarp WASM - WebAssembly bindings for Quadwarp
//!
//! This crate exposes the quadwarp-core pipeline to JavaScript/TypeScript:
//! decode an upload, select four points, clip or perspective-correct the
//! selection, and encode it for download.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data and points
//! - `decode` - Image decoding bindings (JPEG, PNG, EXIF orientation)
//! - `encode` - Image encoding bindings (PNG, JPEG)
//! - `transform` - Quadrilateral warp, clip and crop
//! - `export` - Editor state and the export pipeline
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, EditorState, export_image } from '@quadwarp/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const state = new EditorState();
//! state.toggle_warp();
//! const result = export_image(image, state, 0.9);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod export;
mod logger;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_image, exif_orientation};
pub use encode::{encode_image, encode_jpeg, encode_png, mime_type, output_format};
pub use export::{export_image, export_selection, EditorState, JsExportedImage};
pub use transform::{clip_quad, crop_to_bounds, output_dimensions, warp_quad};
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::init_logger(log::LevelFilter::Info);
}

/// Enable debug-level console output from the image pipeline.
#[wasm_bindgen]
pub fn set_verbose(verbose: bool) {
    log::set_max_level(if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
