use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use gc_ascii::pipeline::ConversionPipeline;
use gc_core::config::Settings;
use gc_core::frame::DisplayFrame;
use gc_core::traits::{DisplaySink, FrameSource};

use crate::control::SessionControl;

/// Pacing sleeps are shortened by this much to absorb wake-up latency.
pub const PACING_SLACK: Duration = Duration::from_millis(2);

/// Observable state of playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No session.
    Idle,
    Running,
    Paused,
    /// Cancelled by the caller or ended by end of stream. Terminal.
    Cancelled,
}

/// Why a pump thread stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    EndOfStream,
    Cancelled,
}

/// Handed back by a pump thread when it stops.
pub struct PumpExit {
    /// The pipeline the session owned, with its cache.
    pub pipeline: ConversionPipeline,
    pub frames_published: u64,
    pub reason: ExitReason,
}

/// One playback run over one source.
///
/// Owns the pump thread, its control token and the completion channel. The
/// pipeline moves into the pump thread for the lifetime of the session and
/// comes back through [`PlaybackSession::wait`]. Dropping a session cancels
/// it without waiting.
pub struct PlaybackSession {
    control: Arc<SessionControl>,
    frames: Arc<AtomicU64>,
    done_rx: flume::Receiver<PumpExit>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PlaybackSession {
    /// Spawn the pump thread for `source`.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn start<S: FrameSource>(
        source: S,
        pipeline: ConversionPipeline,
        settings: Arc<ArcSwap<Settings>>,
        sink: Arc<dyn DisplaySink>,
    ) -> Result<Self> {
        let control = Arc::new(SessionControl::new());
        let frames = Arc::new(AtomicU64::new(0));
        let (done_tx, done_rx) = flume::bounded(1);

        let pump = Pump {
            pipeline,
            settings,
            sink,
            control: Arc::clone(&control),
            frames: Arc::clone(&frames),
        };
        let handle = thread::Builder::new()
            .name("gc-pump".to_string())
            .spawn(move || {
                let exit = pump.run(source);
                // The owner may have given up waiting.
                let _ = done_tx.send(exit);
            })
            .context("Cannot spawn pump thread")?;

        Ok(Self {
            control,
            frames,
            done_rx,
            handle: Some(handle),
        })
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    /// Signal cancellation. The pump stops at its next checkpoint; a frame
    /// mid-conversion completes but is not published.
    pub fn cancel(&self) {
        self.control.cancel();
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        let s = self.control.snapshot();
        if s.cancelled || s.finished {
            PlaybackState::Cancelled
        } else if s.paused {
            PlaybackState::Paused
        } else {
            PlaybackState::Running
        }
    }

    #[must_use]
    pub fn frames_published(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Wait up to `timeout` for the pump to stop. Returns what it handed
    /// back, or `None` if it is still running.
    pub fn wait(&mut self, timeout: Duration) -> Option<PumpExit> {
        let exit = self.done_rx.recv_timeout(timeout).ok()?;
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("Pump thread panicked after reporting exit");
        }
        Some(exit)
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.control.cancel();
    }
}

/// Everything the pump thread owns.
struct Pump {
    pipeline: ConversionPipeline,
    settings: Arc<ArcSwap<Settings>>,
    sink: Arc<dyn DisplaySink>,
    control: Arc<SessionControl>,
    frames: Arc<AtomicU64>,
}

impl Pump {
    fn run<S: FrameSource>(mut self, mut source: S) -> PumpExit {
        let (w, h) = source.native_size();
        log::info!(
            "Playback: session started, {w}x{h} @ {:.3}fps",
            source.frame_rate()
        );
        let mut published: u64 = 0;

        let reason = loop {
            if !self.control.wait_if_paused() {
                break ExitReason::Cancelled;
            }
            let started = Instant::now();

            let Some(frame) = source.next_frame() else {
                log::info!("Playback: end of stream after {published} frames");
                self.control.finish();
                break ExitReason::EndOfStream;
            };

            let (params, invert, max_fps) = {
                let s = self.settings.load();
                (s.scale_parameters(), s.invert_display, s.max_fps)
            };
            // The pipeline cache belongs to whichever session is live.
            if self.control.is_cancelled() {
                break ExitReason::Cancelled;
            }
            self.pipeline.set_params(params);
            self.pipeline.load(frame);
            let Some(rendered) = self.pipeline.render(invert) else {
                continue;
            };

            {
                let state = self.control.lock();
                if state.cancelled {
                    break ExitReason::Cancelled;
                }
                self.sink.publish(DisplayFrame {
                    grid: rendered.grid,
                    source_size: rendered.source_size,
                    sequence: published,
                    inverted: invert,
                });
            }
            published += 1;
            self.frames.store(published, Ordering::Release);

            let Some(frame_time) = frame_time(source.frame_rate(), max_fps) else {
                continue;
            };
            let elapsed = started.elapsed();
            match frame_time.checked_sub(elapsed + PACING_SLACK) {
                Some(remaining) if !remaining.is_zero() => {
                    if !self.control.sleep_unless_cancelled(remaining) {
                        break ExitReason::Cancelled;
                    }
                }
                _ => log::trace!("Playback: frame {published} over budget ({elapsed:?})"),
            }
        };

        if reason == ExitReason::Cancelled {
            log::debug!("Playback: cancelled after {published} frames");
        }
        PumpExit {
            pipeline: self.pipeline,
            frames_published: published,
            reason,
        }
    }
}

/// Target time per frame: `1 / min(source_fps, max_fps)`. `None` disables
/// pacing (non-positive or non-finite source rate).
fn frame_time(source_fps: f64, max_fps: u32) -> Option<Duration> {
    if !source_fps.is_finite() || source_fps <= 0.0 {
        return None;
    }
    let fps = source_fps.min(f64::from(max_fps.max(1)));
    Some(Duration::from_secs_f64(1.0 / fps))
}

#[cfg(test)]
pub(crate) mod tests {
    use gc_core::config::ScaleParameters;
    use gc_core::frame::PixelBuffer;

    use super::*;
    use crate::display::ChannelSink;

    /// Yields `count` frames; frame `i` is `(i + 1)` pixels wide so the
    /// published grid width identifies it.
    pub(crate) struct CountingSource {
        pub count: u32,
        pub fps: f64,
        pub delivered: Arc<AtomicU64>,
    }

    impl CountingSource {
        pub(crate) fn new(count: u32, fps: f64) -> (Self, Arc<AtomicU64>) {
            let delivered = Arc::new(AtomicU64::new(0));
            let source = Self {
                count,
                fps,
                delivered: Arc::clone(&delivered),
            };
            (source, delivered)
        }
    }

    impl FrameSource for CountingSource {
        fn next_frame(&mut self) -> Option<PixelBuffer> {
            let i = self.delivered.load(Ordering::SeqCst);
            if i >= u64::from(self.count) {
                return None;
            }
            self.delivered.store(i + 1, Ordering::SeqCst);
            Some(PixelBuffer::filled(i as u32 + 1, 1, [255, 255, 255, 255]))
        }

        fn frame_rate(&self) -> f64 {
            self.fps
        }

        fn native_size(&self) -> (u32, u32) {
            (self.count, 1)
        }
    }

    pub(crate) fn shared(settings: Settings) -> Arc<ArcSwap<Settings>> {
        Arc::new(ArcSwap::from_pointee(settings))
    }

    pub(crate) fn wide_settings() -> Settings {
        Settings {
            max_columns: 999,
            max_fps: 240,
            ..Settings::default()
        }
    }

    fn start(
        source: CountingSource,
        settings: Settings,
    ) -> (PlaybackSession, flume::Receiver<DisplayFrame>) {
        let (sink, rx) = ChannelSink::unbounded();
        let session = PlaybackSession::start(
            source,
            ConversionPipeline::new(settings.scale_parameters()),
            shared(settings),
            Arc::new(sink),
        )
        .unwrap();
        (session, rx)
    }

    #[test]
    fn end_of_stream_publishes_every_frame_in_order() {
        let (source, delivered) = CountingSource::new(12, 0.0);
        let (mut session, rx) = start(source, wide_settings());
        let exit = session.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(exit.reason, ExitReason::EndOfStream);
        assert_eq!(exit.frames_published, 12);
        assert_eq!(delivered.load(Ordering::SeqCst), 12);
        assert_eq!(session.state(), PlaybackState::Cancelled);

        let widths: Vec<u32> = rx.try_iter().map(|f| f.grid.width).collect();
        assert_eq!(widths, (1..=12).collect::<Vec<u32>>());
    }

    #[test]
    fn display_uses_invert_setting() {
        let (source, _) = CountingSource::new(1, 0.0);
        let (mut session, rx) = start(source, wide_settings());
        session.wait(Duration::from_secs(5)).unwrap();
        // White under the inverted ramp is the densest symbol.
        assert_eq!(rx.recv().unwrap().text(), "@");

        let (source, _) = CountingSource::new(1, 0.0);
        let settings = Settings {
            invert_display: false,
            ..wide_settings()
        };
        let (mut session, rx) = start(source, settings);
        session.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(rx.recv().unwrap().text(), " ");
    }

    #[test]
    fn pause_and_resume_neither_skip_nor_repeat() {
        let (source, delivered) = CountingSource::new(40, 100.0);
        let (mut session, rx) = start(source, wide_settings());

        thread::sleep(Duration::from_millis(60));
        session.pause();
        // Let an in-flight frame finish.
        thread::sleep(Duration::from_millis(40));
        assert_eq!(session.state(), PlaybackState::Paused);
        let at_pause = delivered.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(80));
        assert_eq!(delivered.load(Ordering::SeqCst), at_pause);
        assert_eq!(session.frames_published(), at_pause);

        session.resume();
        let exit = session.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(exit.reason, ExitReason::EndOfStream);
        assert_eq!(exit.frames_published, 40);

        let widths: Vec<u32> = rx.try_iter().map(|f| f.grid.width).collect();
        assert_eq!(widths, (1..=40).collect::<Vec<u32>>());
    }

    #[test]
    fn cancel_while_paused_exits_promptly() {
        let (source, delivered) = CountingSource::new(1000, 50.0);
        let (mut session, _rx) = start(source, wide_settings());
        thread::sleep(Duration::from_millis(30));
        session.pause();
        thread::sleep(Duration::from_millis(30));
        let before = delivered.load(Ordering::SeqCst);
        session.cancel();
        let exit = session.wait(Duration::from_secs(2)).unwrap();
        assert_eq!(exit.reason, ExitReason::Cancelled);
        assert_eq!(delivered.load(Ordering::SeqCst), before);
        assert_eq!(session.state(), PlaybackState::Cancelled);
    }

    #[test]
    fn cancel_interrupts_pacing_sleep() {
        let (source, _) = CountingSource::new(10, 0.5);
        let (mut session, rx) = start(source, wide_settings());
        // First frame is published, then the pump sleeps for ~2s.
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let start = Instant::now();
        session.cancel();
        let exit = session.wait(Duration::from_secs(1)).unwrap();
        assert_eq!(exit.frames_published, 1);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn pacing_follows_source_rate() {
        let (source, _) = CountingSource::new(10, 50.0);
        let started = Instant::now();
        let (mut session, _rx) = start(source, wide_settings());
        session.wait(Duration::from_secs(5)).unwrap();
        // 10 frames at 20ms, each sleep shortened by the slack.
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn pacing_is_capped_by_max_fps() {
        let (source, _) = CountingSource::new(5, 1000.0);
        let settings = Settings {
            max_fps: 20,
            ..wide_settings()
        };
        let started = Instant::now();
        let (mut session, _rx) = start(source, settings);
        session.wait(Duration::from_secs(5)).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn pipeline_comes_back_with_live_params() {
        let (source, _) = CountingSource::new(3, 0.0);
        let settings = Settings {
            max_columns: 7,
            ..wide_settings()
        };
        let (mut session, _rx) = start(source, settings);
        let exit = session.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(exit.pipeline.params(), ScaleParameters::new(7, 2.0));
    }

    #[test]
    fn cancel_returns_while_bounded_sink_is_full() {
        let (source, _) = CountingSource::new(100, 200.0);
        let settings = wide_settings();
        // Capacity one and never read: fills after the first frame.
        let (sink, _rx) = ChannelSink::bounded(1);
        let mut session = PlaybackSession::start(
            source,
            ConversionPipeline::new(settings.scale_parameters()),
            shared(settings),
            Arc::new(sink),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(100));

        let control = Arc::clone(&session.control);
        let (done_tx, done_rx) = flume::bounded(1);
        thread::spawn(move || {
            control.cancel();
            let _ = done_tx.send(());
        });
        done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(session.state(), PlaybackState::Cancelled);
        let exit = session.wait(Duration::from_secs(2)).unwrap();
        assert_eq!(exit.reason, ExitReason::Cancelled);
        // Playback kept going past the full channel.
        assert!(exit.frames_published > 1);
    }

    #[test]
    fn settings_change_during_pacing_sleep_applies_to_next_frame() {
        let (source, _) = CountingSource::new(2, 5.0);
        let settings = shared(wide_settings());
        let (sink, rx) = ChannelSink::unbounded();
        let mut session = PlaybackSession::start(
            source,
            ConversionPipeline::new(wide_settings().scale_parameters()),
            Arc::clone(&settings),
            Arc::new(sink),
        )
        .unwrap();
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(first.inverted);
        // The pump is now sleeping ~200ms before the second frame.
        settings.store(Arc::new(Settings {
            invert_display: false,
            ..wide_settings()
        }));
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(!second.inverted);
        assert_eq!(second.text(), "  ");
        session.wait(Duration::from_secs(2)).unwrap();
    }

    #[test]
    fn frame_time_rules() {
        assert_eq!(frame_time(0.0, 60), None);
        assert_eq!(frame_time(-5.0, 60), None);
        assert_eq!(frame_time(f64::NAN, 60), None);
        assert_eq!(frame_time(25.0, 60), Some(Duration::from_millis(40)));
        assert_eq!(frame_time(1000.0, 50), Some(Duration::from_millis(20)));
    }
}
