//! Editor state: the four selection points and the crop/warp toggles.
//!
//! The state is a plain value owned by the caller. It serializes with serde
//! so a front end can keep it on its side and pass it back for export.

use serde::{Deserialize, Serialize};

use crate::export::{ExportMode, ExportRequest};
use crate::geometry::{GeometryError, Point, Quad};

/// Initial selection: a centered square covering the middle 60% of the image.
pub const DEFAULT_POINTS: [Point; 4] = [
    Point { x: 0.2, y: 0.2 },
    Point { x: 0.8, y: 0.2 },
    Point { x: 0.8, y: 0.8 },
    Point { x: 0.2, y: 0.8 },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// Normalized selection points, in drawing order.
    pub points: [Point; 4],
    pub is_cropped: bool,
    pub is_warped: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            is_cropped: false,
            is_warped: false,
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move point `index` (0-3) to the normalized position `(x, y)`.
    ///
    /// An index above 3 is ignored. Positions outside 0.0..=1.0 are rejected
    /// and leave the state unchanged.
    pub fn update_point(&mut self, index: usize, x: f64, y: f64) -> Result<(), GeometryError> {
        let p = Point::normalized(x, y)?;
        if let Some(slot) = self.points.get_mut(index) {
            *slot = p;
        }
        Ok(())
    }

    /// Restore the default points and clear both toggles.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the crop toggle. Warping is always switched off.
    pub fn set_crop_status(&mut self, cropped: bool) {
        self.is_cropped = cropped;
        self.is_warped = false;
    }

    pub fn set_warp_status(&mut self, warped: bool) {
        self.is_warped = warped;
    }

    /// Flip the crop toggle.
    pub fn toggle_crop(&mut self) {
        self.set_crop_status(!self.is_cropped);
    }

    /// Flip the warp toggle, cropping first if the selection is not cropped yet.
    pub fn toggle_warp(&mut self) {
        if !self.is_cropped {
            self.set_crop_status(true);
            self.set_warp_status(true);
        } else {
            self.set_warp_status(!self.is_warped);
        }
    }

    pub fn quad(&self) -> Quad {
        Quad::new(self.points)
    }

    /// `Warp` when the warp toggle is on, `Crop` otherwise.
    pub fn export_mode(&self) -> ExportMode {
        if self.is_warped {
            ExportMode::Warp
        } else {
            ExportMode::Crop
        }
    }

    /// Build an export request for the current selection.
    pub fn export_request(&self, quality: f64) -> ExportRequest {
        ExportRequest::new(self.quad(), self.export_mode()).with_quality(quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = EditorState::new();
        assert_eq!(
            s.points,
            [
                Point::new(0.2, 0.2),
                Point::new(0.8, 0.2),
                Point::new(0.8, 0.8),
                Point::new(0.2, 0.8),
            ]
        );
        assert!(!s.is_cropped);
        assert!(!s.is_warped);
        assert_eq!(s.export_mode(), ExportMode::Crop);
    }

    #[test]
    fn test_update_point() {
        let mut s = EditorState::new();
        s.update_point(2, 0.9, 0.95).unwrap();
        assert_eq!(s.points[2], Point::new(0.9, 0.95));
        assert_eq!(s.points[0], DEFAULT_POINTS[0]);
    }

    #[test]
    fn test_update_point_rejects_out_of_range() {
        let mut s = EditorState::new();
        assert!(s.update_point(1, 1.2, 0.5).is_err());
        assert_eq!(s, EditorState::new());
    }

    #[test]
    fn test_update_point_ignores_bad_index() {
        let mut s = EditorState::new();
        s.update_point(4, 0.5, 0.5).unwrap();
        assert_eq!(s, EditorState::new());
    }

    #[test]
    fn test_set_crop_status_clears_warp() {
        let mut s = EditorState::new();
        s.set_crop_status(true);
        s.set_warp_status(true);
        assert_eq!(s.export_mode(), ExportMode::Warp);

        s.set_crop_status(true);
        assert!(s.is_cropped);
        assert!(!s.is_warped);
    }

    #[test]
    fn test_toggle_warp_crops_first() {
        let mut s = EditorState::new();
        s.toggle_warp();
        assert!(s.is_cropped && s.is_warped);

        s.toggle_warp();
        assert!(s.is_cropped && !s.is_warped);

        s.toggle_warp();
        s.toggle_crop();
        assert!(!s.is_cropped && !s.is_warped);
    }

    #[test]
    fn test_reset() {
        let mut s = EditorState::new();
        s.update_point(0, 0.0, 0.0).unwrap();
        s.toggle_warp();
        s.reset();
        assert_eq!(s, EditorState::default());
    }

    #[test]
    fn test_export_request() {
        let mut s = EditorState::new();
        s.toggle_warp();
        let r = s.export_request(0.97);
        assert_eq!(r.mode, ExportMode::Warp);
        assert_eq!(r.quality, 0.97);
        assert_eq!(r.points.corners, DEFAULT_POINTS);
    }
}
