//! Perspective correction by inverse mapping.
//!
//! Every destination pixel is mapped back into the source through the
//! destination → source homography and sampled bilinearly. Destination
//! pixels whose preimage falls outside the source stay transparent.
//!
//! The destination is split into bands of `tile_size` rows. Each band is a
//! disjoint slice of the output buffer, so bands can be rendered on the
//! rayon pool without locks while the source is shared read-only.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::geometry::{Homography, Quad};
use crate::raster::{Raster, CHANNELS};

use super::tiles::{tiles, Tile};
use super::{Execution, TransformError, WarpOptions};

/// Warp the normalized `quad` of `source` onto an `out_width`×`out_height`
/// rectangle with default options.
pub fn warp(
    source: &Raster,
    quad: &Quad,
    out_width: u32,
    out_height: u32,
) -> Result<Raster, TransformError> {
    warp_with(source, quad, out_width, out_height, &WarpOptions::default(), None)
}

/// Warp with explicit options and an optional cancellation flag.
///
/// The quad's corners are classified as `[TL, TR, BR, BL]` before the
/// homography is estimated, so input order does not matter.
///
/// # Errors
///
/// - [`TransformError::InvalidOutputDimensions`] for a zero or oversized output
/// - [`TransformError::Raster`] if `source` is inconsistent
/// - [`TransformError::Geometry`] for a degenerate quad or singular system
/// - [`TransformError::Cancelled`] if `cancel` is raised before a tile
pub fn warp_with(
    source: &Raster,
    quad: &Quad,
    out_width: u32,
    out_height: u32,
    options: &WarpOptions,
    cancel: Option<&AtomicBool>,
) -> Result<Raster, TransformError> {
    options.check_output_dimensions(out_width, out_height)?;
    source.validate()?;

    let src_quad = quad.to_pixel_space(source.width, source.height).canonicalize();
    let dst_quad = Quad::rectangle(out_width as f64, out_height as f64);
    let dst_to_src = Homography::estimate(&dst_quad, &src_quad)?;

    resample(source, &dst_to_src, out_width, out_height, options, cancel)
}

/// Render an `out_width`×`out_height` raster by sampling `source` at the
/// image of every destination pixel under `dst_to_src`.
pub fn resample(
    source: &Raster,
    dst_to_src: &Homography,
    out_width: u32,
    out_height: u32,
    options: &WarpOptions,
    cancel: Option<&AtomicBool>,
) -> Result<Raster, TransformError> {
    options.check_output_dimensions(out_width, out_height)?;
    source.validate()?;

    let tile_size = options.tile_size.max(1);
    let mut output = Raster::transparent(out_width, out_height)?;
    let stride = output.stride();
    // A band never holds more rows than the output
    let band_bytes = tile_size.min(out_height) as usize * stride;
    let grid = tiles(out_width, out_height, tile_size);
    let per_band = out_width.div_ceil(tile_size) as usize;

    log::debug!(
        "resampling {}x{} -> {}x{} ({} tiles of {}, {:?})",
        source.width,
        source.height,
        out_width,
        out_height,
        grid.len(),
        tile_size,
        options.execution
    );

    let cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));
    let result = for_each_band(&mut output.pixels, band_bytes, options.execution, |index, band| {
        let band_tiles = &grid[index * per_band..(index + 1) * per_band];
        render_band(source, dst_to_src, band_tiles, band, stride, &cancelled)
    });

    if let Err(e) = result {
        log::warn!("resample aborted: {e}");
        return Err(e);
    }
    Ok(output)
}

/// Render the tiles of one band, checking `cancelled` before each tile.
fn render_band(
    source: &Raster,
    dst_to_src: &Homography,
    band_tiles: &[Tile],
    band: &mut [u8],
    stride: usize,
    cancelled: &dyn Fn() -> bool,
) -> Result<(), TransformError> {
    let Some(band_y) = band_tiles.first().map(|t| t.y) else {
        return Ok(());
    };
    for &tile in band_tiles {
        if cancelled() {
            return Err(TransformError::Cancelled);
        }
        render_tile(source, dst_to_src, tile, band, band_y, stride);
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn for_each_band<F>(
    pixels: &mut [u8],
    band_bytes: usize,
    execution: Execution,
    f: F,
) -> Result<(), TransformError>
where
    F: Fn(usize, &mut [u8]) -> Result<(), TransformError> + Send + Sync,
{
    use rayon::prelude::*;

    match execution {
        Execution::Parallel => pixels
            .par_chunks_mut(band_bytes)
            .enumerate()
            .try_for_each(|(i, band)| f(i, band)),
        Execution::Serial => pixels
            .chunks_mut(band_bytes)
            .enumerate()
            .try_for_each(|(i, band)| f(i, band)),
    }
}

#[cfg(not(feature = "parallel"))]
fn for_each_band<F>(
    pixels: &mut [u8],
    band_bytes: usize,
    _execution: Execution,
    f: F,
) -> Result<(), TransformError>
where
    F: Fn(usize, &mut [u8]) -> Result<(), TransformError>,
{
    pixels
        .chunks_mut(band_bytes)
        .enumerate()
        .try_for_each(|(i, band)| f(i, band))
}

/// Fill one tile of `band`, whose first row is destination row `band_y`.
fn render_tile(
    source: &Raster,
    dst_to_src: &Homography,
    tile: Tile,
    band: &mut [u8],
    band_y: u32,
    stride: usize,
) {
    let src_w = source.width as f64;
    let src_h = source.height as f64;

    for y in tile.y..tile.y + tile.height {
        let row = (y - band_y) as usize * stride;
        for x in tile.x..tile.x + tile.width {
            let Some((sx, sy)) = dst_to_src.map_xy(x as f64, y as f64) else {
                continue;
            };
            // Written so that NaN falls through as out of range
            if !(sx >= 0.0 && sx < src_w && sy >= 0.0 && sy < src_h) {
                continue;
            }
            let idx = row + x as usize * CHANNELS;
            band[idx..idx + CHANNELS].copy_from_slice(&sample_bilinear(source, sx, sy));
        }
    }
}

/// Bilinear sample at `(sx, sy)`, which must lie inside the raster.
#[inline]
fn sample_bilinear(source: &Raster, sx: f64, sy: f64) -> [u8; 4] {
    let x1 = sx.floor() as usize;
    let y1 = sy.floor() as usize;
    let x2 = (x1 + 1).min(source.width as usize - 1);
    let y2 = (y1 + 1).min(source.height as usize - 1);
    let wx = sx - x1 as f64;
    let wy = sy - y1 as f64;

    let stride = source.stride();
    let px = |x: usize, y: usize| y * stride + x * CHANNELS;
    let (p11, p12) = (px(x1, y1), px(x2, y1));
    let (p21, p22) = (px(x1, y2), px(x2, y2));
    let s = &source.pixels;

    let mut out = [0u8; 4];
    for (c, v) in out.iter_mut().enumerate() {
        let top = s[p11 + c] as f64 * (1.0 - wx) + s[p12 + c] as f64 * wx;
        let bottom = s[p21 + c] as f64 * (1.0 - wx) + s[p22 + c] as f64 * wx;
        *v = (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0) as u8;
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::geometry::{GeometryError, Point};
    use proptest::prelude::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn opaque(width: u32, height: u32) -> Raster {
        Raster::new(width, height, vec![255u8; (width * height * 4) as usize]).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: Any quad either warps or fails with a geometry error.
        #[test]
        fn prop_never_panics(
            corners in prop::array::uniform4(point_strategy()),
            (w, h) in (1u32..=40, 1u32..=40),
        ) {
            let src = opaque(16, 12);
            match warp(&src, &Quad::new(corners), w, h) {
                Ok(out) => {
                    prop_assert_eq!((out.width, out.height), (w, h));
                    prop_assert_eq!(out.pixels.len(), (w * h * 4) as usize);
                }
                Err(TransformError::Geometry(
                    GeometryError::DegenerateQuadrilateral | GeometryError::SingularSystem,
                )) => {}
                Err(e) => prop_assert!(false, "unexpected error {:?}", e),
            }
        }

        /// Property: A pixel is covered exactly when its preimage lies inside
        /// the source; uncovered pixels have alpha 0.
        #[test]
        fn prop_coverage_matches_preimage(
            corners in prop::array::uniform4(point_strategy()),
            (w, h) in (1u32..=24, 1u32..=24),
        ) {
            let src = opaque(16, 12);
            let quad = Quad::new(corners);
            let Ok(out) = warp(&src, &quad, w, h) else {
                return Ok(());
            };

            let src_quad = quad.to_pixel_space(16, 12).canonicalize();
            let h_inv = Homography::estimate(&Quad::rectangle(w as f64, h as f64), &src_quad).unwrap();

            for y in 0..h {
                for x in 0..w {
                    let covered = h_inv
                        .map_xy(x as f64, y as f64)
                        .is_some_and(|(sx, sy)| sx >= 0.0 && sx < 16.0 && sy >= 0.0 && sy < 12.0);
                    let alpha = out.pixel(x, y).unwrap()[3];
                    prop_assert_eq!(alpha, if covered { 255 } else { 0 });
                }
            }
        }
    }
}
