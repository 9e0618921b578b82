//! Straight-edged quadrilateral mask.
//!
//! Scanline rasterization of the four-point polygon: for every raster row the
//! polygon edges are intersected with the horizontal line through the pixel
//! centers, and the crossings are paired up with the nonzero winding rule.
//! Points exactly on an edge or a vertex count as inside.
//!
//! Points are used in the order given. A self-intersecting order produces a
//! self-intersecting mask.

use crate::geometry::{Point, Quad};
use crate::raster::{Raster, CHANNELS};

use super::TransformError;

/// Keep the pixels of `source` inside the normalized `quad`; every other
/// pixel becomes `[0, 0, 0, 0]`. Dimensions are unchanged.
///
/// # Errors
///
/// - [`TransformError::Geometry`] if a point is outside 0.0..=1.0
/// - [`TransformError::Raster`] if `source` is inconsistent
pub fn clip(source: &Raster, quad: &Quad) -> Result<Raster, TransformError> {
    source.validate()?;
    let polygon = Quad::from_normalized(quad.corners)?.to_pixel_space(source.width, source.height);

    let mut output = Raster::transparent(source.width, source.height)?;
    let stride = source.stride();
    let mut kept = 0usize;

    for y in 0..source.height {
        let row = y as usize * stride;
        for (start, end) in row_spans(&polygon.corners, y as f64 + 0.5) {
            let Some((first, last)) = pixel_range(start, end, source.width) else {
                continue;
            };
            let (a, b) = (row + first * CHANNELS, row + (last + 1) * CHANNELS);
            output.pixels[a..b].copy_from_slice(&source.pixels[a..b]);
            kept += last + 1 - first;
        }
    }

    log::debug!(
        "clipped {}x{} raster, {} of {} pixels kept",
        source.width,
        source.height,
        kept,
        source.pixel_count()
    );
    Ok(output)
}

/// Closed x-intervals of the polygon on the line `y = yc`.
///
/// Spans may overlap; copying a pixel twice is harmless.
fn row_spans(polygon: &[Point; 4], yc: f64) -> Vec<(f64, f64)> {
    let mut crossings: Vec<(f64, i32)> = Vec::with_capacity(4);
    let mut spans = Vec::new();

    for (i, &p) in polygon.iter().enumerate() {
        let q = polygon[(i + 1) % polygon.len()];

        if p.y == yc {
            spans.push((p.x, p.x));
        }
        if p.y == q.y {
            if p.y == yc {
                spans.push((p.x.min(q.x), p.x.max(q.x)));
            }
            continue;
        }

        let (lo, hi) = if p.y < q.y { (p.y, q.y) } else { (q.y, p.y) };
        if yc < lo || yc >= hi {
            continue;
        }
        let x = p.x + (yc - p.y) * (q.x - p.x) / (q.y - p.y);
        let direction = if q.y > p.y { 1 } else { -1 };
        crossings.push((x, direction));
        // The edge itself is boundary
        spans.push((x, x));
    }

    crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut winding = 0;
    let mut start = 0.0;
    for (x, direction) in crossings {
        let was_inside = winding != 0;
        winding += direction;
        match (was_inside, winding != 0) {
            (false, true) => start = x,
            (true, false) => spans.push((start, x)),
            _ => {}
        }
    }
    spans
}

/// Columns whose centers `x + 0.5` lie in `[start, end]`, clamped to the raster.
fn pixel_range(start: f64, end: f64, width: u32) -> Option<(usize, usize)> {
    let first = (start - 0.5).ceil().max(0.0);
    let last = (end - 0.5).floor().min(width as f64 - 1.0);
    if first > last {
        return None;
    }
    Some((first as usize, last as usize))
}
