/// Live playback for glyphcast.
///
/// A [`Player`] owns at most one [`PlaybackSession`]. Each session runs a
/// pump thread that pulls frames from a `FrameSource`, converts them with a
/// `ConversionPipeline` and publishes them to a `DisplaySink`, paced to the
/// source frame rate and gated by a [`SessionControl`].

pub mod control;
pub mod display;
pub mod player;
pub mod session;

pub use control::SessionControl;
pub use display::{ChannelSink, LatestFrame};
pub use player::Player;
pub use session::{ExitReason, PlaybackSession, PlaybackState, PumpExit};
