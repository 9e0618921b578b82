//! Rectangular cropping.
//!
//! Used after [`clip`](super::clip) to trim the clipped raster down to the
//! selection's bounding box. Two entry points:
//! - [`crop_rect`]: pixel rectangle
//! - [`crop_to_bounds`]: normalized rectangle (0.0 to 1.0 relative to the raster)
//!
//! # Behavior
//!
//! - Regions extending beyond the raster are clamped
//! - Minimum output dimension is 1x1 pixels
//! - A region covering the whole raster returns a copy of it

use crate::raster::{Raster, CHANNELS};

use super::TransformError;

/// Crop a pixel rectangle out of `image`.
///
/// `x`/`y` are clamped into the raster, the width and height are clamped to
/// the remaining extent.
pub fn crop_rect(
    image: &Raster,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<Raster, TransformError> {
    image.validate()?;

    let left = x.min(image.width.saturating_sub(1));
    let top = y.min(image.height.saturating_sub(1));
    let right = left.saturating_add(width).min(image.width);
    let bottom = top.saturating_add(height).min(image.height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    // Fast path: full crop returns a clone
    if left == 0 && top == 0 && out_width == image.width && out_height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.stride();
    let row_bytes = out_width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    // Copy pixel data row by row
    for row in top..top + out_height {
        let start = row as usize * src_stride + left as usize * CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    Ok(Raster {
        width: out_width,
        height: out_height,
        pixels: output,
    })
}

/// Crop using normalized coordinates.
///
/// # Arguments
///
/// * `image` - Source image to crop
/// * `left` - Left edge of crop region (0.0 to 1.0)
/// * `top` - Top edge of crop region (0.0 to 1.0)
/// * `width` - Width of crop region (0.0 to 1.0)
/// * `height` - Height of crop region (0.0 to 1.0)
pub fn crop_to_bounds(
    image: &Raster,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> Result<Raster, TransformError> {
    let src_w = image.width as f64;
    let src_h = image.height as f64;

    let to_px = |v: f64, extent: f64| (v.clamp(0.0, 1.0) * extent).round() as u32;

    crop_rect(
        image,
        to_px(left, src_w),
        to_px(top, src_h),
        to_px(width, src_w),
        to_px(height, src_h),
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_image(width: u32, height: u32) -> Raster {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, v, v, 255]
            })
            .collect();
        Raster::new(width, height, pixels).unwrap()
    }

    proptest! {
        /// Property: Output is never empty and never exceeds the input.
        #[test]
        fn prop_output_bounded_by_input(
            (width, height) in (1u32..=60, 1u32..=60),
            (x, y, w, h) in (0u32..80, 0u32..80, 0u32..80, 0u32..80),
        ) {
            let img = create_test_image(width, height);
            let result = crop_rect(&img, x, y, w, h).unwrap();

            prop_assert!(result.width >= 1 && result.width <= width);
            prop_assert!(result.height >= 1 && result.height <= height);
            prop_assert_eq!(result.pixels.len(), (result.width * result.height * 4) as usize);
        }

        /// Property: Cropped pixels are taken from the matching source position.
        #[test]
        fn prop_pixels_come_from_offset(
            (width, height) in (5u32..=40, 5u32..=40),
            (x, y) in (0u32..5, 0u32..5),
        ) {
            let img = create_test_image(width, height);
            let result = crop_rect(&img, x, y, 3, 3).unwrap();

            for cy in 0..result.height {
                for cx in 0..result.width {
                    prop_assert_eq!(result.pixel(cx, cy), img.pixel(x + cx, y + cy));
                }
            }
        }
    }
}
