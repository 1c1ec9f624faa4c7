use std::path::PathBuf;

use anyhow::Result;
use gc_core::frame::AsciiGrid;

/// Export destinations requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct Exports {
    pub text: Option<PathBuf>,
    pub image: Option<PathBuf>,
}

impl Exports {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.image.is_none()
    }

    /// Write every requested export, stopping at the first failure.
    ///
    /// # Errors
    /// Returns the first write error.
    pub fn write_all(&self, grid: &AsciiGrid) -> Result<()> {
        if let Some(path) = &self.text {
            gc_export::write_text(grid, path)?;
            log::info!("Text written to {}", path.display());
        }
        if let Some(path) = &self.image {
            gc_export::write_image(&gc_export::rasterize(grid), path)?;
            log::info!("Image written to {}", path.display());
        }
        Ok(())
    }

    /// Write every requested export; failures are only logged.
    pub fn best_effort(&self, grid: Option<&AsciiGrid>) {
        if let Some(path) = &self.text {
            gc_export::export_text(grid, path);
        }
        if let Some(path) = &self.image {
            gc_export::export_image(grid, path);
        }
    }
}
