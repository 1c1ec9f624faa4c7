use crate::frame::{DisplayFrame, PixelBuffer};

/// Supplies decoded frames to the conversion pipeline.
///
/// Implemented by: `ImageSource`, `VideoSource`, and test doubles.
///
/// # Example
/// ```
/// use gc_core::traits::FrameSource;
/// use gc_core::frame::PixelBuffer;
///
/// struct DummySource;
/// impl FrameSource for DummySource {
///     fn next_frame(&mut self) -> Option<PixelBuffer> { None }
///     fn frame_rate(&self) -> f64 { 0.0 }
///     fn native_size(&self) -> (u32, u32) { (0, 0) }
/// }
/// ```
pub trait FrameSource: Send + 'static {
    /// Next frame in source order, handed over by value.
    ///
    /// Returns `None` at end of stream. End of stream is not an error.
    fn next_frame(&mut self) -> Option<PixelBuffer>;

    /// Frames per second of the source. Zero or negative disables pacing.
    fn frame_rate(&self) -> f64;

    /// Native dimensions (width, height) before scaling.
    fn native_size(&self) -> (u32, u32);
}

/// Receives converted frames for display.
///
/// Push-only: the display never pulls from the pipeline.
///
/// # Example
/// ```
/// use gc_core::traits::DisplaySink;
/// use gc_core::frame::DisplayFrame;
///
/// struct NullSink;
/// impl DisplaySink for NullSink {
///     fn publish(&self, _frame: DisplayFrame) {}
/// }
/// ```
pub trait DisplaySink: Send + Sync + 'static {
    /// Make `frame` the current display content. A later publish always
    /// supersedes an earlier one.
    ///
    /// Must return promptly and never block: the playback pump calls it while
    /// holding its session's control lock, so a blocking sink would stall
    /// `pause` and `cancel`. Drop the frame rather than wait.
    fn publish(&self, frame: DisplayFrame);
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> Option<PixelBuffer> {
        (**self).next_frame()
    }

    fn frame_rate(&self) -> f64 {
        (**self).frame_rate()
    }

    fn native_size(&self) -> (u32, u32) {
        (**self).native_size()
    }
}
