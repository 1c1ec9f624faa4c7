/// Shared types, traits and configuration for glyphcast.
///
/// Pixel buffers, luminance buffers, character grids, symbol ramps, the
/// built-in 5×5 glyph font and the settings consumed by the conversion core
/// all live here so the other crates only depend on each other through them.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod glyph;
pub mod traits;

pub use charset::SymbolRamp;
pub use config::{ScaleParameters, Settings};
pub use error::CoreError;
pub use frame::{AsciiGrid, DisplayFrame, LuminanceBuffer, PixelBuffer};
pub use glyph::GlyphPattern;
pub use traits::{DisplaySink, FrameSource};
