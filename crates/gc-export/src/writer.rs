use std::path::Path;

use anyhow::{Context, Result};
use gc_core::frame::{AsciiGrid, PixelBuffer};
use image::RgbaImage;

use crate::rasterizer::Rasterizer;

/// Write `grid` as UTF-8 text, rows joined by `\n`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_text(grid: &AsciiGrid, path: &Path) -> Result<()> {
    std::fs::write(path, grid.to_text())
        .with_context(|| format!("Cannot write text to {}", path.display()))
}

/// Save a pixel buffer; the format follows the file extension.
///
/// A zero-sized buffer has nothing to encode and is skipped.
///
/// # Errors
/// Returns an error if encoding or writing fails.
pub fn write_image(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    if buffer.is_empty() {
        log::warn!("write_image: empty raster, nothing written to {}", path.display());
        return Ok(());
    }
    let img = RgbaImage::from_raw(buffer.width, buffer.height, buffer.data.clone())
        .context("Pixel buffer does not match its dimensions")?;
    img.save(path)
        .with_context(|| format!("Cannot save image to {}", path.display()))
}

/// Best-effort text export. No-op when there is no grid; failures are
/// logged and dropped.
pub fn export_text(grid: Option<&AsciiGrid>, path: &Path) {
    let Some(grid) = grid else {
        return;
    };
    if let Err(e) = write_text(grid, path) {
        log::warn!("Text export failed: {e:#}");
    }
}

/// Best-effort image export: rasterize, then save. Failures are logged and
/// dropped.
pub fn export_image(grid: Option<&AsciiGrid>, path: &Path) {
    let Some(grid) = grid else {
        return;
    };
    let buffer = Rasterizer::new().render(grid);
    if let Err(e) = write_image(&buffer, path) {
        log::warn!("Image export failed: {e:#}");
    }
}
