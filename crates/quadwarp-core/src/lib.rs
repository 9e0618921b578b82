//! Quadwarp Core - quadrilateral crop and perspective correction
//!
//! This crate provides the image side of Quadwarp: decoding an upload,
//! clipping it to a four-point selection or warping that selection onto a
//! rectangle, and encoding the result for download.
//!
//! Pipeline: [`decode`] → [`geometry`] (classification, homography) →
//! [`transform`] (clip or warp) → [`encode`]. [`export`] wires the last
//! three together and [`state`] holds the editor's points and toggles.

pub mod decode;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod raster;
pub mod state;
pub mod transform;

pub use decode::{decode_image, DecodeError};
pub use encode::{encode_raster, EncodeError, EncodedImage, OutputFormat};
pub use export::{
    export, export_file_name, output_dimensions, ExportError, ExportMode, ExportRequest,
    ExportedImage,
};
pub use geometry::{GeometryError, Homography, Point, Quad};
pub use raster::{Raster, RasterError};
pub use state::EditorState;
pub use transform::{clip, warp, warp_with, Execution, TransformError, WarpOptions};

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 3 % 256) as u8, (y * 3 % 256) as u8, 40, 255]);
            }
        }
        Raster::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_decode_edit_export_round_trip() {
        let upload = encode::encode_png(&gradient(80, 60)).unwrap();
        let source = decode_image(&upload).unwrap();

        let mut state = EditorState::new();
        state.update_point(1, 0.9, 0.1).unwrap();
        state.toggle_warp();

        let request = state.export_request(0.95);
        let out = export(&source, &request).unwrap();
        assert_eq!(out.format, OutputFormat::Png);
        assert_eq!(
            (out.width, out.height),
            output_dimensions(&request.points, 80, 60).unwrap()
        );

        let name = export_file_name("page.jpeg", request.mode, out.format);
        assert_eq!(name, "page-perspective-corrected.png");
    }

    #[test]
    fn test_crop_toggle_exports_clipped_selection() {
        let source = gradient(50, 50);
        let mut state = EditorState::new();
        state.toggle_crop();

        let out = export(&source, &state.export_request(0.5)).unwrap();
        assert_eq!(out.format, OutputFormat::Jpeg);
        assert_eq!((out.width, out.height), (30, 30));
    }
}
