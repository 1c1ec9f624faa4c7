/// ASCII conversion engine for glyphcast.
///
/// Scaler → Quantizer → Mapper, plus a caching pipeline that ties them
/// together for one frame at a time.
pub mod luminance;
pub mod mapper;
pub mod pipeline;
pub mod scale;

pub use pipeline::{ConversionPipeline, Rendered};
