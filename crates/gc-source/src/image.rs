use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use gc_core::frame::PixelBuffer;
use gc_core::traits::FrameSource;

/// A still image as a one-frame source.
///
/// Yields its frame once, then reports end of stream. The frame rate is zero,
/// so the scheduler never paces it.
///
/// # Example
/// ```
/// use gc_core::frame::PixelBuffer;
/// use gc_core::traits::FrameSource;
/// use gc_source::image::ImageSource;
///
/// let mut source = ImageSource::from_buffer(PixelBuffer::new(4, 2));
/// assert_eq!(source.native_size(), (4, 2));
/// assert!(source.next_frame().is_some());
/// assert!(source.next_frame().is_none());
/// ```
pub struct ImageSource {
    frame: Option<PixelBuffer>,
    size: (u32, u32),
}

impl ImageSource {
    /// Decode an image file and wrap it as a source.
    ///
    /// # Errors
    /// Returns an error if the image cannot be loaded.
    pub fn new(path: &Path) -> Result<Self> {
        load_image(path).map(Self::from_buffer)
    }

    /// Wrap an already decoded buffer.
    #[must_use]
    pub fn from_buffer(frame: PixelBuffer) -> Self {
        let size = (frame.width, frame.height);
        Self {
            frame: Some(frame),
            size,
        }
    }
}

impl FrameSource for ImageSource {
    fn next_frame(&mut self) -> Option<PixelBuffer> {
        self.frame.take()
    }

    fn frame_rate(&self) -> f64 {
        0.0
    }

    fn native_size(&self) -> (u32, u32) {
        self.size
    }
}

/// Decode an image file (PNG, JPEG, BMP, GIF) into RGBA8.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use gc_source::image::load_image;
/// let frame = load_image(std::path::Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path).with_context(|| format!("Cannot load {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("load_image: {width}x{height} from {}", path.display());
    Ok(PixelBuffer::from_rgba(width, height, rgba.into_raw())?)
}

/// Decode an image on a short-lived background thread.
///
/// The receiver yields exactly one message: the decoded buffer or the load
/// error.
///
/// # Errors
/// Returns an error if the loader thread cannot be spawned.
pub fn spawn_image_load(path: PathBuf) -> Result<flume::Receiver<Result<PixelBuffer>>> {
    let (tx, rx) = flume::bounded(1);
    thread::Builder::new()
        .name("gc-image-load".to_string())
        .spawn(move || {
            let result = load_image(&path);
            if let Err(e) = &result {
                log::warn!("Image load failed: {e:#}");
            }
            let _ = tx.send(result);
        })
        .context("Cannot spawn image loader thread")?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path) -> PathBuf {
        let path = dir.join("tiny.png");
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn loads_rgba_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let frame = load_image(&write_png(dir.path())).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.pixel(1, 0), (10, 20, 30, 255));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_image(Path::new("/nonexistent/none.png")).is_err());
        assert!(ImageSource::new(Path::new("/nonexistent/none.png")).is_err());
    }

    #[test]
    fn source_yields_once_without_pacing() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ImageSource::new(&write_png(dir.path())).unwrap();
        assert_eq!(source.native_size(), (3, 2));
        assert!(source.frame_rate() <= 0.0);
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn background_load_delivers_result() {
        let dir = tempfile::tempdir().unwrap();
        let rx = spawn_image_load(write_png(dir.path())).unwrap();
        let frame = rx.recv().unwrap().unwrap();
        assert_eq!(frame.width, 3);

        let rx = spawn_image_load(PathBuf::from("/nonexistent/none.png")).unwrap();
        assert!(rx.recv().unwrap().is_err());
    }
}
