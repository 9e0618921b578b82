//! Partition of a destination raster into square tiles.
//!
//! Tiles are laid out row-major. A row of tiles forms a *band*: a contiguous
//! run of whole raster rows, so every band maps onto a disjoint `&mut` slice
//! of the destination buffer and can be handed to its own worker.

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// A rectangular region of the destination raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Tile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Split a `width`×`height` area into tiles of at most `tile_size`×`tile_size`.
///
/// Tiles on the right and bottom edges are truncated. A `tile_size` of zero
/// is treated as 1.
pub fn tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let tile_size = tile_size.max(1);
    let mut out = Vec::new();
    let mut y = 0;
    while y < height {
        let band_height = tile_size.min(height - y);
        out.extend(band_tiles(y, band_height, width, tile_size));
        y += band_height;
    }
    out
}

/// Tiles of one band starting at row `y`.
fn band_tiles(
    y: u32,
    band_height: u32,
    width: u32,
    tile_size: u32,
) -> impl Iterator<Item = Tile> {
    let tile_size = tile_size.max(1);
    (0..width).step_by(tile_size as usize).map(move |x| Tile {
        x,
        y,
        width: tile_size.min(width - x),
        height: band_height,
    })
}
