// Video decode runs ffmpeg as a subprocess and reads raw RGBA frames from its
// stdout. `ffmpeg` and `ffprobe` must be on PATH.

use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{Context, Result};
use gc_core::frame::PixelBuffer;
use gc_core::traits::FrameSource;

/// Stream metadata reported by ffprobe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Frames per second (e.g. 23.976, 24.0, 30.0).
    pub fps: f64,
}

/// Parse `key=value` lines from
/// `ffprobe -show_entries stream=width,height,r_frame_rate`.
///
/// Missing keys keep their fallback (1920x1080 @ 30). A zero-sized stream
/// yields `None`.
///
/// # Example
/// ```
/// use gc_source::video::parse_probe_output;
///
/// let info = parse_probe_output("width=640\nheight=360\nr_frame_rate=30000/1001\n").unwrap();
/// assert_eq!((info.width, info.height), (640, 360));
/// assert!((info.fps - 29.97).abs() < 0.01);
/// ```
#[must_use]
pub fn parse_probe_output(text: &str) -> Option<VideoInfo> {
    let mut width: u32 = 1920;
    let mut height: u32 = 1080;
    let mut fps: f64 = 30.0;

    for line in text.lines() {
        if let Some(val) = line.strip_prefix("width=") {
            width = val.trim().parse().unwrap_or(1920);
        } else if let Some(val) = line.strip_prefix("height=") {
            height = val.trim().parse().unwrap_or(1080);
        } else if let Some(val) = line.strip_prefix("r_frame_rate=") {
            // "24/1", "30000/1001"
            let mut parts = val.trim().splitn(2, '/');
            let num: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(30.0);
            let den: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1.0);
            if den > 0.0 {
                fps = num / den;
            }
        }
    }

    (width > 0 && height > 0).then_some(VideoInfo { width, height, fps })
}

/// Query ffprobe for the first video stream.
///
/// # Errors
/// Returns an error if ffprobe cannot be started or the file has no
/// decodable video stream.
pub fn probe_video(path: &Path) -> Result<VideoInfo> {
    let path_str = path.to_str().context("Video path is not valid UTF-8")?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "default=noprint_wrappers=1",
            "-i",
            path_str,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .context("Cannot run ffprobe. Check that it is installed and on PATH.")?;

    let text = String::from_utf8_lossy(&output.stdout);
    if text.trim().is_empty() {
        anyhow::bail!("ffprobe found no video stream in {}", path.display());
    }
    let info = parse_probe_output(&text)
        .with_context(|| format!("ffprobe reported an empty video stream in {}", path.display()))?;

    log::info!(
        "probe_video: {}x{} @ {:.3}fps, {}",
        info.width,
        info.height,
        info.fps,
        path.display()
    );
    Ok(info)
}

/// Start ffmpeg writing raw RGBA frames at native size to stdout.
///
/// Each frame is `w × h × 4` bytes, row-major, no padding. Audio is dropped.
///
/// # Errors
/// Returns an error if the path is not UTF-8 or ffmpeg cannot be started.
pub fn spawn_ffmpeg_pipe(path: &Path) -> Result<Child> {
    let path_str = path.to_str().context("Video path is not valid UTF-8")?;

    let child = Command::new("ffmpeg")
        .args([
            "-i",
            path_str,
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-an",
            "-hide_banner",
            "-loglevel",
            "error",
            "pipe:1",
        ])
        .stdout(Stdio::piped())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Cannot run ffmpeg. Check that it is installed and on PATH.")?;
    log::debug!("ffmpeg spawned for {}", path.display());
    Ok(child)
}

/// Read exactly `buf.len()` bytes from `reader`.
///
/// Returns `Ok(true)` on a full read, `Ok(false)` on EOF before completion.
///
/// # Errors
/// Returns an error on a fatal I/O error.
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => return Ok(false),
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// Decoded video as a [`FrameSource`].
///
/// Frames come out at native resolution; scaling is the pipeline's job. The
/// ffmpeg child is killed and reaped on drop.
pub struct VideoSource<R: Read + Send + 'static = ChildStdout> {
    info: VideoInfo,
    reader: Option<R>,
    child: Option<Child>,
    frames_read: u64,
}

impl VideoSource {
    /// Probe and open a video file.
    ///
    /// # Errors
    /// Returns an error if probing fails or ffmpeg cannot be started.
    pub fn open(path: &Path) -> Result<Self> {
        let info = probe_video(path)?;
        let mut child = spawn_ffmpeg_pipe(path)?;
        let reader = child.stdout.take().context("ffmpeg stdout was not captured")?;
        Ok(Self {
            info,
            reader: Some(reader),
            child: Some(child),
            frames_read: 0,
        })
    }
}

impl<R: Read + Send + 'static> VideoSource<R> {
    /// Read raw RGBA frames of the given geometry from any byte stream.
    #[must_use]
    pub fn from_reader(reader: R, info: VideoInfo) -> Self {
        Self {
            info,
            reader: Some(reader),
            child: None,
            frames_read: 0,
        }
    }

    /// Stream metadata.
    #[must_use]
    pub fn info(&self) -> VideoInfo {
        self.info
    }

    /// Frames delivered so far.
    #[must_use]
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl<R: Read + Send + 'static> FrameSource for VideoSource<R> {
    fn next_frame(&mut self) -> Option<PixelBuffer> {
        let reader = self.reader.as_mut()?;
        let mut frame = PixelBuffer::new(self.info.width, self.info.height);
        match read_exact_or_eof(reader, &mut frame.data) {
            Ok(true) => {
                self.frames_read += 1;
                Some(frame)
            }
            Ok(false) => {
                log::info!("Video: end of stream after {} frames", self.frames_read);
                self.reader = None;
                None
            }
            Err(e) => {
                log::warn!("Video: pipe read failed: {e:#}");
                self.reader = None;
                None
            }
        }
    }

    fn frame_rate(&self) -> f64 {
        self.info.fps
    }

    fn native_size(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }
}

impl<R: Read + Send + 'static> Drop for VideoSource<R> {
    fn drop(&mut self) {
        self.reader = None;
        if let Some(mut c) = self.child.take() {
            let _ = c.kill();
            let _ = c.wait();
        }
    }
}
