use std::path::PathBuf;

use anyhow::{Context, Result};
use gc_ascii::pipeline::{ConversionPipeline, Rendered};
use gc_core::config::Settings;

use crate::export::Exports;

/// Convert one image: print it with the display ramp, then export with the
/// export ramp from the same quantization.
///
/// # Errors
/// Returns an error if the image cannot be loaded or an export fails.
pub fn run(path: PathBuf, settings: &Settings, exports: &Exports) -> Result<()> {
    let rx = gc_source::spawn_image_load(path)?;
    let frame = rx.recv().context("Image loader exited without a result")??;

    let mut pipeline = ConversionPipeline::new(settings.scale_parameters());
    pipeline.load(frame);
    let (shown, exported) = render_both(&mut pipeline, settings)?;

    println!("{}", shown.grid.to_text());
    println!("{} | {}", shown.dimensions_label(), shown.source_label());

    if !exports.is_empty() {
        exports.write_all(&exported.grid)?;
    }
    Ok(())
}

/// Display and export renders of the loaded frame.
fn render_both(pipeline: &mut ConversionPipeline, settings: &Settings) -> Result<(Rendered, Rendered)> {
    let shown = pipeline
        .render(settings.invert_display)
        .context("No frame loaded")?;
    let exported = pipeline
        .render(settings.invert_export)
        .context("No frame loaded")?;
    Ok((shown, exported))
}

#[cfg(test)]
mod tests {
    use gc_core::frame::PixelBuffer;

    use super::*;

    #[test]
    fn display_and_export_use_their_own_ramps() {
        let settings = Settings {
            max_columns: 4,
            ..Settings::default()
        };
        let mut pipeline = ConversionPipeline::new(settings.scale_parameters());
        pipeline.load(PixelBuffer::filled(2, 1, [255, 255, 255, 255]));
        let (shown, exported) = render_both(&mut pipeline, &settings).unwrap();
        assert_eq!(shown.grid.to_text(), "@@");
        assert_eq!(exported.grid.to_text(), "  ");
        assert!(pipeline.is_cached());
        assert_eq!(shown.source_label(), "1px x 2px");
    }

    #[test]
    fn image_run_exports_text() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("in.png");
        image_of(&image_path);
        let exports = Exports {
            text: Some(dir.path().join("out.txt")),
            image: None,
        };
        let settings = Settings {
            max_columns: 3,
            aspect_ratio: 1.0,
            ..Settings::default()
        };
        run(image_path, &settings, &exports).unwrap();
        let text = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(text, "@@@\n@@@\n@@@");
    }

    fn image_of(path: &std::path::Path) {
        let fb = PixelBuffer::filled(6, 6, [0, 0, 0, 255]);
        gc_export::write_image(&fb, path).unwrap();
    }
}
