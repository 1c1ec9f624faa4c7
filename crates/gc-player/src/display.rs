use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use gc_core::frame::DisplayFrame;
use gc_core::traits::DisplaySink;

/// Holds the most recently published frame. Last publish wins.
///
/// Readers poll [`LatestFrame::generation`] and fetch the frame only when it
/// changed; both operations are lock-free.
///
/// # Example
/// ```
/// use gc_core::frame::{AsciiGrid, DisplayFrame};
/// use gc_core::traits::DisplaySink;
/// use gc_player::display::LatestFrame;
///
/// let latest = LatestFrame::new();
/// assert!(latest.current().is_none());
/// latest.publish(DisplayFrame { grid: AsciiGrid::from_lines("@"), source_size: (1, 1), sequence: 0, inverted: false });
/// assert_eq!(latest.generation(), 1);
/// assert_eq!(latest.current().unwrap().text(), "@");
/// ```
#[derive(Default)]
pub struct LatestFrame {
    frame: ArcSwapOption<DisplayFrame>,
    generation: AtomicU64,
}

impl LatestFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame, if anything was published.
    #[must_use]
    pub fn current(&self) -> Option<Arc<DisplayFrame>> {
        self.frame.load_full()
    }

    /// Number of publishes so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl DisplaySink for LatestFrame {
    fn publish(&self, frame: DisplayFrame) {
        self.frame.store(Some(Arc::new(frame)));
        self.generation.fetch_add(1, Ordering::Release);
    }
}

/// Forwards published frames over a channel.
///
/// Never blocks: a frame that does not fit a bounded channel is dropped, and
/// a disconnected receiver is ignored.
pub struct ChannelSink {
    tx: flume::Sender<DisplayFrame>,
}

impl ChannelSink {
    #[must_use]
    pub fn new(tx: flume::Sender<DisplayFrame>) -> Self {
        Self { tx }
    }

    /// Unbounded sink plus its receiving end.
    #[must_use]
    pub fn unbounded() -> (Self, flume::Receiver<DisplayFrame>) {
        let (tx, rx) = flume::unbounded();
        (Self::new(tx), rx)
    }

    /// Sink over a channel holding at most `cap` undelivered frames.
    #[must_use]
    pub fn bounded(cap: usize) -> (Self, flume::Receiver<DisplayFrame>) {
        let (tx, rx) = flume::bounded(cap);
        (Self::new(tx), rx)
    }
}

impl DisplaySink for ChannelSink {
    fn publish(&self, frame: DisplayFrame) {
        match self.tx.try_send(frame) {
            Ok(()) => {}
            Err(flume::TrySendError::Full(f)) => {
                log::trace!("ChannelSink: channel full, frame {} dropped", f.sequence);
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                log::trace!("ChannelSink: receiver gone, frame dropped");
            }
        }
    }
}
