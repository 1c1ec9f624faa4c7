use std::collections::HashMap;

use gc_core::charset::NORMAL_SYMBOLS;
use gc_core::frame::{AsciiGrid, PixelBuffer};
use gc_core::glyph::{GLYPH_SIZE, GlyphPattern};
use rayon::prelude::*;

/// Bytes in one rendered glyph tile (5×5 RGBA).
const TILE_BYTES: usize = GLYPH_SIZE * GLYPH_SIZE * 4;

/// Draws an [`AsciiGrid`] as 5×5 pixel glyphs in white/gray/black.
///
/// Keeps a cache of pre-expanded RGBA tiles for the ramp symbols so the hot
/// loop only copies rows.
///
/// # Example
/// ```
/// use gc_core::frame::AsciiGrid;
/// use gc_export::rasterizer::Rasterizer;
///
/// let r = Rasterizer::new();
/// let fb = r.render(&AsciiGrid::from_lines("@.\n  "));
/// assert_eq!((fb.width, fb.height), (10, 10));
/// ```
pub struct Rasterizer {
    tiles: HashMap<char, [u8; TILE_BYTES]>,
    /// All-white tile for spaces and unknown symbols.
    blank: [u8; TILE_BYTES],
}

impl Rasterizer {
    /// Build the tile cache for the ramp symbols.
    #[must_use]
    pub fn new() -> Self {
        let blank = expand(&GlyphPattern::BLANK);
        let tiles = NORMAL_SYMBOLS
            .iter()
            .map(|&ch| (ch, expand(&GlyphPattern::for_symbol(ch))))
            .collect();
        Self { tiles, blank }
    }

    /// Output size for a grid: `(width * 5, height * 5)`.
    #[must_use]
    pub fn target_dimensions(&self, grid_w: u32, grid_h: u32) -> (u32, u32) {
        let cell = GLYPH_SIZE as u32;
        (grid_w * cell, grid_h * cell)
    }

    /// Render `grid` into a fresh buffer. An empty grid yields a 0×0 buffer.
    #[must_use]
    pub fn render(&self, grid: &AsciiGrid) -> PixelBuffer {
        if grid.is_empty() || grid.cells.len() < grid.width as usize * grid.height as usize {
            return PixelBuffer::new(0, 0);
        }
        let (width, height) = self.target_dimensions(grid.width, grid.height);
        let mut fb = PixelBuffer::new(width, height);

        let stride = width as usize * 4;
        let row_bytes = GLYPH_SIZE * 4;
        let band_size = stride * GLYPH_SIZE;

        fb.data
            .par_chunks_exact_mut(band_size)
            .zip(grid.cells.par_chunks_exact(grid.width as usize))
            .for_each(|(band, row)| {
                for (gx, ch) in row.iter().enumerate() {
                    let tile = self.tiles.get(ch).unwrap_or(&self.blank);
                    let x_offset = gx * row_bytes;
                    for ty in 0..GLYPH_SIZE {
                        let dst = ty * stride + x_offset;
                        let src = ty * row_bytes;
                        band[dst..dst + row_bytes].copy_from_slice(&tile[src..src + row_bytes]);
                    }
                }
            });

        fb
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot rasterization.
#[must_use]
pub fn rasterize(grid: &AsciiGrid) -> PixelBuffer {
    Rasterizer::new().render(grid)
}

fn expand(pattern: &GlyphPattern) -> [u8; TILE_BYTES] {
    let mut tile = [0u8; TILE_BYTES];
    for y in 0..GLYPH_SIZE {
        for x in 0..GLYPH_SIZE {
            let idx = (y * GLYPH_SIZE + x) * 4;
            tile[idx..idx + 4].copy_from_slice(&pattern.ink(x, y).rgba());
        }
    }
    tile
}
