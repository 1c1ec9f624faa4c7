use gc_core::charset::SymbolRamp;
use gc_core::config::ScaleParameters;
use gc_core::frame::{AsciiGrid, LuminanceBuffer, PixelBuffer};

use crate::luminance::{self, RampIndexBuffer};
use crate::mapper;
use crate::scale::FrameScaler;

/// Identity of a frame loaded into a [`ConversionPipeline`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameId(u64);

/// Output of one conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    /// Converted grid.
    pub grid: AsciiGrid,
    /// (width, height) of the source frame before scaling.
    pub source_size: (u32, u32),
}

impl Rendered {
    /// `"{H}symbols x {W}symbols"`.
    #[must_use]
    pub fn dimensions_label(&self) -> String {
        self.grid.dimensions_label()
    }

    /// `"{H}px x {W}px"` of the source frame.
    #[must_use]
    pub fn source_label(&self) -> String {
        format!("{}px x {}px", self.source_size.1, self.source_size.0)
    }
}

/// Quantized state for one (frame, parameters) pair.
struct Quantized {
    frame: FrameId,
    params: ScaleParameters,
    luminance: LuminanceBuffer,
    indexes: RampIndexBuffer,
}

/// Scaler → Quantizer → Mapper for one frame at a time.
///
/// Remembers the quantized result for the current frame and parameters, so
/// rendering the same frame with the other ramp only re-runs the Mapper.
/// Loading a new frame or changing parameters drops the cache.
///
/// # Example
/// ```
/// use gc_ascii::pipeline::ConversionPipeline;
/// use gc_core::config::ScaleParameters;
/// use gc_core::frame::PixelBuffer;
///
/// let mut pipeline = ConversionPipeline::new(ScaleParameters::new(10, 2.0));
/// pipeline.load(PixelBuffer::new(100, 50));
/// let out = pipeline.render_normal().unwrap();
/// assert_eq!(out.dimensions_label(), "2symbols x 10symbols");
/// assert!(pipeline.is_cached());
/// ```
pub struct ConversionPipeline {
    scaler: FrameScaler,
    params: ScaleParameters,
    source: Option<(FrameId, PixelBuffer)>,
    cache: Option<Quantized>,
    next_id: u64,
}

impl ConversionPipeline {
    /// Empty pipeline with the given scale parameters.
    #[must_use]
    pub fn new(params: ScaleParameters) -> Self {
        Self {
            scaler: FrameScaler::new(),
            params,
            source: None,
            cache: None,
            next_id: 0,
        }
    }

    /// Take ownership of a new source frame. Invalidates the cache.
    pub fn load(&mut self, frame: PixelBuffer) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.source = Some((id, frame));
        self.cache = None;
        id
    }

    /// Replace the scale parameters. Invalidates the cache only if they
    /// actually differ. Returns `true` if they changed.
    pub fn set_params(&mut self, params: ScaleParameters) -> bool {
        if params == self.params {
            return false;
        }
        self.params = params;
        self.cache = None;
        true
    }

    /// Current scale parameters.
    #[must_use]
    pub fn params(&self) -> ScaleParameters {
        self.params
    }

    /// `true` if a quantized result for the current frame and parameters is held.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        match (&self.cache, &self.source) {
            (Some(q), Some((id, _))) => q.frame == *id && q.params == self.params,
            _ => false,
        }
    }

    /// Luminance of the current frame at the current parameters, if cached.
    #[must_use]
    pub fn luminance(&self) -> Option<&LuminanceBuffer> {
        self.cache
            .as_ref()
            .filter(|_| self.is_cached())
            .map(|q| &q.luminance)
    }

    /// (width, height) of the loaded source frame.
    #[must_use]
    pub fn source_size(&self) -> Option<(u32, u32)> {
        self.source.as_ref().map(|(_, f)| (f.width, f.height))
    }

    /// Drop the loaded frame and any cached result.
    pub fn clear(&mut self) {
        self.source = None;
        self.cache = None;
    }

    /// Convert the loaded frame with the dense-to-sparse ramp.
    pub fn render_normal(&mut self) -> Option<Rendered> {
        self.render_with(&SymbolRamp::normal())
    }

    /// Convert the loaded frame with the sparse-to-dense ramp.
    pub fn render_inverted(&mut self) -> Option<Rendered> {
        self.render_with(&SymbolRamp::inverted())
    }

    /// Convert with the ramp selected by `invert`.
    pub fn render(&mut self, invert: bool) -> Option<Rendered> {
        self.render_with(&SymbolRamp::for_invert(invert))
    }

    /// Convert the loaded frame with `ramp`. `None` if nothing is loaded.
    pub fn render_with(&mut self, ramp: &SymbolRamp) -> Option<Rendered> {
        let (id, frame) = self.source.as_ref()?;
        let source_size = (frame.width, frame.height);

        if !self.is_cached() {
            let scaled = self.scaler.scale(frame, &self.params);
            let lum = luminance::quantize(&scaled);
            let indexes = luminance::bucketize(&lum);
            log::trace!(
                "pipeline: quantized {}x{} -> {}x{}",
                source_size.0,
                source_size.1,
                lum.width,
                lum.height
            );
            self.cache = Some(Quantized {
                frame: *id,
                params: self.params,
                luminance: lum,
                indexes,
            });
        }

        let quantized = self.cache.as_ref()?;
        Some(Rendered {
            grid: mapper::map_indexes(&quantized.indexes, ramp),
            source_size,
        })
    }
}

impl Default for ConversionPipeline {
    fn default() -> Self {
        Self::new(ScaleParameters::default())
    }
}

/// Stateless one-shot conversion.
///
/// # Example
/// ```
/// use gc_ascii::pipeline::convert;
/// use gc_core::charset::SymbolRamp;
/// use gc_core::config::ScaleParameters;
/// use gc_core::frame::PixelBuffer;
///
/// let grid = convert(&PixelBuffer::filled(2, 1, [255, 255, 255, 255]),
///                    &ScaleParameters::new(2, 2.0), &SymbolRamp::normal());
/// assert_eq!(grid.to_text(), "  ");
/// ```
#[must_use]
pub fn convert(frame: &PixelBuffer, params: &ScaleParameters, ramp: &SymbolRamp) -> AsciiGrid {
    let mut scaler = FrameScaler::new();
    let scaled = scaler.scale(frame, params);
    mapper::map_indexes(&luminance::bucketize(&luminance::quantize(&scaled)), ramp)
}
