/// Export of converted grids: glyph rasterization and file writers.
pub mod rasterizer;
pub mod writer;

pub use rasterizer::{Rasterizer, rasterize};
pub use writer::{export_image, export_text, write_image, write_text};
