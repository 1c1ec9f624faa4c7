use gc_core::charset::ramp_index;
use gc_core::frame::{LuminanceBuffer, PixelBuffer};

/// Ramp indices for every cell of a [`LuminanceBuffer`], same shape.
///
/// Independent of which ramp is later applied, so switching between the
/// normal and inverted ramp only re-indexes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RampIndexBuffer {
    /// Indices in `0..=13`, row-major.
    pub data: Vec<u8>,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

/// Unweighted RGB mean per pixel, alpha ignored: `floor((r + g + b) / 3)`.
///
/// Single linear pass, one allocation for the output.
///
/// # Example
/// ```
/// use gc_core::frame::PixelBuffer;
/// use gc_ascii::luminance::quantize;
///
/// let frame = PixelBuffer::from_rgba(1, 1, vec![30, 60, 91, 0]).unwrap();
/// assert_eq!(quantize(&frame).data, vec![60]);
/// ```
#[must_use]
pub fn quantize(frame: &PixelBuffer) -> LuminanceBuffer {
    let data = frame
        .data
        .chunks_exact(4)
        .map(|px| mean_rgb(px[0], px[1], px[2]))
        .collect();
    LuminanceBuffer {
        data,
        width: frame.width,
        height: frame.height,
    }
}

/// Bucket every luminance value into a ramp index.
///
/// # Example
/// ```
/// use gc_core::frame::LuminanceBuffer;
/// use gc_ascii::luminance::bucketize;
///
/// let lum = LuminanceBuffer { data: vec![0, 85, 170, 255], width: 2, height: 2 };
/// assert_eq!(bucketize(&lum).data, vec![0, 4, 8, 13]);
/// ```
#[must_use]
pub fn bucketize(luminance: &LuminanceBuffer) -> RampIndexBuffer {
    RampIndexBuffer {
        data: luminance.data.iter().map(|&l| ramp_index(l)).collect(),
        width: luminance.width,
        height: luminance.height,
    }
}

#[inline(always)]
fn mean_rgb(r: u8, g: u8, b: u8) -> u8 {
    ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_is_ignored() {
        let a = PixelBuffer::from_rgba(1, 1, vec![90, 90, 90, 0]).unwrap();
        let b = PixelBuffer::from_rgba(1, 1, vec![90, 90, 90, 255]).unwrap();
        assert_eq!(quantize(&a), quantize(&b));
    }

    #[test]
    fn mean_truncates() {
        assert_eq!(mean_rgb(255, 255, 254), 254);
        assert_eq!(mean_rgb(1, 1, 0), 0);
        assert_eq!(mean_rgb(255, 255, 255), 255);
    }

    #[test]
    fn shape_is_preserved() {
        let frame = PixelBuffer::new(7, 3);
        let lum = quantize(&frame);
        assert_eq!((lum.width, lum.height, lum.data.len()), (7, 3, 21));
        let idx = bucketize(&lum);
        assert_eq!((idx.width, idx.height, idx.data.len()), (7, 3, 21));
    }

    #[test]
    fn input_is_untouched() {
        let frame = PixelBuffer::filled(2, 2, [10, 200, 30, 255]);
        let before = frame.clone();
        let _ = quantize(&frame);
        assert_eq!(frame, before);
    }
}
