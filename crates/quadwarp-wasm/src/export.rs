//! Editor state and export WASM bindings.
//!
//! `EditorState` mirrors the editor's selection and toggles so the front end
//! and the export pipeline agree on what will be written.
//!
//! # Example
//!
//! ```typescript
//! const state = new EditorState();
//! state.update_point(1, 0.9, 0.1);
//! state.toggle_warp();
//!
//! const result = export_image(image, state, 0.9);
//! const blob = new Blob([result.bytes()], { type: result.mime_type });
//! download(blob, result.file_name(file.name));
//! ```

use crate::types::{quad_from_js, JsRaster};
use quadwarp_core::export::{self, ExportMode, ExportRequest, ExportedImage};
use quadwarp_core::transform::{Execution, WarpOptions};
use wasm_bindgen::prelude::*;

/// Selection points and crop/warp toggles.
#[wasm_bindgen]
pub struct EditorState {
    inner: quadwarp_core::EditorState,
}

#[wasm_bindgen]
impl EditorState {
    /// Default selection (middle 60% of the image), nothing cropped.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: quadwarp_core::EditorState::new(),
        }
    }

    /// Move point `index` (0-3) to normalized `(x, y)`.
    ///
    /// # Errors
    /// Returns an error if `x` or `y` lies outside 0.0 to 1.0.
    pub fn update_point(&mut self, index: usize, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner
            .update_point(index, x, y)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn set_crop_status(&mut self, cropped: bool) {
        self.inner.set_crop_status(cropped);
    }

    pub fn set_warp_status(&mut self, warped: bool) {
        self.inner.set_warp_status(warped);
    }

    pub fn toggle_crop(&mut self) {
        self.inner.toggle_crop();
    }

    pub fn toggle_warp(&mut self) {
        self.inner.toggle_warp();
    }

    #[wasm_bindgen(getter)]
    pub fn is_cropped(&self) -> bool {
        self.inner.is_cropped
    }

    #[wasm_bindgen(getter)]
    pub fn is_warped(&self) -> bool {
        self.inner.is_warped
    }

    /// Points as a flat `[x0, y0, x1, y1, x2, y2, x3, y3]` array.
    pub fn points(&self) -> Vec<f64> {
        self.inner.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// `"warp"` or `"crop"`.
    #[wasm_bindgen(getter)]
    pub fn export_mode(&self) -> String {
        mode_name(self.inner.export_mode()).to_string()
    }

    /// Serialize to a plain object (`{ points, isCropped, isWarped }`).
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from a plain object produced by `to_json`.
    pub fn from_json(value: JsValue) -> Result<EditorState, JsValue> {
        let inner: quadwarp_core::EditorState =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Encoded export result.
#[wasm_bindgen]
pub struct JsExportedImage {
    inner: ExportedImage,
    mode: ExportMode,
}

#[wasm_bindgen]
impl JsExportedImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// `"png"` or `"jpg"`.
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.format.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.format.mime_type().to_string()
    }

    /// Encoded file bytes (copy).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Download name derived from the uploaded file's name.
    pub fn file_name(&self, original: &str) -> String {
        export::export_file_name(original, self.mode, self.inner.format)
    }
}

fn mode_name(mode: ExportMode) -> &'static str {
    match mode {
        ExportMode::Crop => "crop",
        ExportMode::Warp => "warp",
    }
}

fn run(image: &JsRaster, request: &ExportRequest) -> Result<JsExportedImage, JsValue> {
    let options = WarpOptions {
        execution: Execution::Serial,
        ..WarpOptions::default()
    };
    export::export_with(&image.to_raster(), request, &options, None)
        .map(|inner| JsExportedImage {
            inner,
            mode: request.mode,
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Export the current selection of `state` at `quality` (0.0 to 1.0).
///
/// Warps when the warp toggle is on, otherwise clips to the selection.
#[wasm_bindgen]
pub fn export_image(
    image: &JsRaster,
    state: &EditorState,
    quality: f64,
) -> Result<JsExportedImage, JsValue> {
    run(image, &state.inner.export_request(quality))
}

/// Export with explicit points and mode (`"crop"` or `"warp"`).
#[wasm_bindgen]
pub fn export_selection(
    image: &JsRaster,
    points: JsValue,
    mode: &str,
    quality: f64,
) -> Result<JsExportedImage, JsValue> {
    let quad = quad_from_js(points)?;
    let mode = parse_mode(mode).map_err(|e| JsValue::from_str(&e))?;
    run(image, &ExportRequest::new(quad, mode).with_quality(quality))
}

fn parse_mode(mode: &str) -> Result<ExportMode, String> {
    match mode {
        "crop" => Ok(ExportMode::Crop),
        "warp" => Ok(ExportMode::Warp),
        other => Err(format!("Unknown export mode: {}", other)),
    }
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_update_point_out_of_range() {
        let mut state = EditorState::new();
        assert!(state.update_point(0, -0.1, 0.5).is_err());
    }

    #[wasm_bindgen_test]
    fn test_json_round_trip() {
        let mut state = EditorState::new();
        state.update_point(3, 0.1, 0.9).unwrap();
        state.toggle_crop();
        let restored = EditorState::from_json(state.to_json().unwrap()).unwrap();
        assert_eq!(restored.points(), state.points());
        assert!(restored.is_cropped());
    }
}
