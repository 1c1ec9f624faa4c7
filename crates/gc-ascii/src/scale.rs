use std::borrow::Cow;

use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use gc_core::config::ScaleParameters;
use gc_core::frame::PixelBuffer;

/// Downsamples source frames to the character-grid resolution.
///
/// Wraps a reusable `fast_image_resize` resizer; never upscales.
///
/// # Example
/// ```
/// use gc_ascii::scale::FrameScaler;
/// use gc_core::config::ScaleParameters;
/// use gc_core::frame::PixelBuffer;
///
/// let mut scaler = FrameScaler::new();
/// let src = PixelBuffer::new(100, 50);
/// let out = scaler.scale(&src, &ScaleParameters::new(10, 2.0));
/// assert_eq!((out.width, out.height), (10, 2));
/// ```
pub struct FrameScaler {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch copy of the source (the resizer wants a mutable slice).
    src_buf: Vec<u8>,
}

impl FrameScaler {
    /// Create a scaler with bilinear filtering.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
            src_buf: Vec::new(),
        }
    }

    /// Scale `src` to fit `params`.
    ///
    /// A source that already fits within the column budget is returned
    /// borrowed and untouched. Resizer failures fall back to nearest-neighbour
    /// sampling, so the result is always defined.
    pub fn scale<'a>(
        &mut self,
        src: &'a PixelBuffer,
        params: &ScaleParameters,
    ) -> Cow<'a, PixelBuffer> {
        let Some((width, height)) = params.target_size(src.width, src.height) else {
            return Cow::Borrowed(src);
        };

        let mut dst = PixelBuffer::new(width, height);
        if let Err(e) = self.resize_into(src, &mut dst) {
            log::warn!(
                "scale: resize {}x{} -> {width}x{height} failed ({e:#}), sampling instead",
                src.width,
                src.height
            );
            return Cow::Owned(sample_nearest(src, width, height));
        }
        Cow::Owned(dst)
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if the resize operation fails.
    pub fn resize_into(&mut self, src: &PixelBuffer, dst: &mut PixelBuffer) -> Result<()> {
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .context("Invalid source dimensions")?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .context("Invalid destination dimensions")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;

        Ok(())
    }
}

impl Default for FrameScaler {
    fn default() -> Self {
        Self::new()
    }
}

/// Nearest-neighbour downsample.
fn sample_nearest(src: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    let mut dst = PixelBuffer::new(width, height);
    for y in 0..height {
        let sy = (u64::from(y) * u64::from(src.height) / u64::from(height)) as u32;
        let sy = sy.min(src.height.saturating_sub(1));
        for x in 0..width {
            let sx = (u64::from(x) * u64::from(src.width) / u64::from(width)) as u32;
            let sx = sx.min(src.width.saturating_sub(1));
            let (r, g, b, a) = src.pixel(sx, sy);
            dst.set_pixel(x, y, [r, g, b, a]);
        }
    }
    dst
}
