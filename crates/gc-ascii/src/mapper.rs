use gc_core::charset::SymbolRamp;
use gc_core::frame::AsciiGrid;
use rayon::prelude::*;

use crate::luminance::RampIndexBuffer;

/// Apply `ramp` to precomputed indices. Rows are filled in parallel.
///
/// # Example
/// ```
/// use gc_core::charset::SymbolRamp;
/// use gc_ascii::luminance::RampIndexBuffer;
/// use gc_ascii::mapper::map_indexes;
///
/// let idx = RampIndexBuffer { data: vec![0, 13], width: 2, height: 1 };
/// assert_eq!(map_indexes(&idx, &SymbolRamp::normal()).to_text(), "@ ");
/// ```
#[must_use]
pub fn map_indexes(indexes: &RampIndexBuffer, ramp: &SymbolRamp) -> AsciiGrid {
    let mut grid = AsciiGrid::new(indexes.width, indexes.height);
    if grid.is_empty() {
        return grid;
    }
    let width = indexes.width as usize;
    grid.cells
        .par_chunks_mut(width)
        .zip(indexes.data.par_chunks(width))
        .for_each(|(row, src)| {
            for (cell, &idx) in row.iter_mut().zip(src) {
                *cell = ramp.symbol(idx);
            }
        });
    grid
}

/// Re-express a grid mapped with `from` in terms of `to`, cell by cell.
/// Symbols outside `from` are kept as they are.
///
/// # Example
/// ```
/// use gc_core::charset::SymbolRamp;
/// use gc_core::frame::AsciiGrid;
/// use gc_ascii::mapper::remap;
///
/// let grid = AsciiGrid::from_lines("@#\n; ");
/// let out = remap(&grid, &SymbolRamp::normal(), &SymbolRamp::inverted());
/// assert_eq!(out.to_text(), " :\n*@");
/// ```
#[must_use]
pub fn remap(grid: &AsciiGrid, from: &SymbolRamp, to: &SymbolRamp) -> AsciiGrid {
    if from == to {
        return grid.clone();
    }
    let mut out = grid.clone();
    for cell in &mut out.cells {
        if let Some(idx) = from.index_of(*cell) {
            *cell = to.symbol(idx);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use gc_core::frame::LuminanceBuffer;

    use super::*;
    use crate::luminance::bucketize;

    fn gradient(width: u32, height: u32) -> LuminanceBuffer {
        let n = (width * height) as usize;
        LuminanceBuffer {
            data: (0..n).map(|i| (i * 255 / n.max(2).saturating_sub(1)) as u8).collect(),
            width,
            height,
        }
    }

    #[test]
    fn mapping_is_idempotent() {
        let lum = gradient(16, 4);
        let ramp = SymbolRamp::inverted();
        let idx = bucketize(&lum);
        assert_eq!(map_indexes(&idx, &ramp), map_indexes(&idx, &ramp));
    }

    #[test]
    fn indexed_mapping_matches_per_pixel_lookup() {
        let lum = gradient(13, 7);
        for ramp in [SymbolRamp::normal(), SymbolRamp::inverted()] {
            let grid = map_indexes(&bucketize(&lum), &ramp);
            for (cell, &l) in grid.cells.iter().zip(&lum.data) {
                assert_eq!(*cell, ramp.map(l));
            }
        }
    }

    #[test]
    fn switching_ramp_mirrors_every_cell() {
        let idx = bucketize(&gradient(10, 3));
        let normal = map_indexes(&idx, &SymbolRamp::normal());
        let inverted = map_indexes(&idx, &SymbolRamp::inverted());
        let n = SymbolRamp::normal();
        for (i, &k) in idx.data.iter().enumerate() {
            assert_eq!(normal.cells[i], n.symbol(k));
            assert_eq!(inverted.cells[i], n.symbol(13 - k));
        }
    }

    #[test]
    fn remap_matches_direct_mapping() {
        let idx = bucketize(&gradient(9, 4));
        let normal = map_indexes(&idx, &SymbolRamp::normal());
        let inverted = map_indexes(&idx, &SymbolRamp::inverted());
        assert_eq!(
            remap(&normal, &SymbolRamp::normal(), &SymbolRamp::inverted()),
            inverted
        );
        assert_eq!(
            remap(&inverted, &SymbolRamp::inverted(), &SymbolRamp::normal()),
            normal
        );
    }

    #[test]
    fn remap_keeps_foreign_symbols() {
        let grid = AsciiGrid::from_lines("Z@");
        let out = remap(&grid, &SymbolRamp::normal(), &SymbolRamp::inverted());
        assert_eq!(out.to_text(), "Z ");
    }

    #[test]
    fn empty_buffer_maps_to_empty_grid() {
        let idx = RampIndexBuffer {
            data: vec![],
            width: 0,
            height: 0,
        };
        assert!(map_indexes(&idx, &SymbolRamp::normal()).is_empty());
    }
}
