/// Frame sources for glyphcast: still images and ffmpeg-decoded video.

pub mod image;

#[cfg(feature = "video")]
pub mod video;

pub use image::{ImageSource, load_image, spawn_image_load};
#[cfg(feature = "video")]
pub use video::VideoSource;
