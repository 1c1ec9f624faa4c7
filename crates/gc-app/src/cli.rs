use std::path::PathBuf;

use clap::Parser;
use gc_core::config::Settings;

/// glyphcast: image and video to ASCII art.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Still image to convert (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Video to play in the terminal. Needs ffmpeg and ffprobe on PATH.
    #[arg(long)]
    pub video: Option<PathBuf>,

    /// TOML configuration file, watched for changes.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Maximum grid width in symbols (1-999).
    #[arg(long)]
    pub columns: Option<u32>,

    /// Glyph cell height/width correction (0.1-10.0).
    #[arg(long)]
    pub aspect: Option<f32>,

    /// Display with the normal (dense-to-sparse) ramp.
    #[arg(long, default_value_t = false)]
    pub no_invert: bool,

    /// Export with the inverted ramp.
    #[arg(long, default_value_t = false)]
    pub invert_export: bool,

    /// Write the final grid as text.
    #[arg(long)]
    pub export_text: Option<PathBuf>,

    /// Write the final grid as a glyph image; format follows the extension.
    #[arg(long)]
    pub export_image: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Which source the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceArg {
    Image(PathBuf),
    Video(PathBuf),
}

/// Settings fields given on the command line. Reapplied after every config
/// reload so flags keep precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub columns: Option<u32>,
    pub aspect: Option<f32>,
    pub no_invert: bool,
    pub invert_export: bool,
}

impl Overrides {
    /// Apply over `settings`, then clamp.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(columns) = self.columns {
            settings.max_columns = columns;
        }
        if let Some(aspect) = self.aspect {
            settings.aspect_ratio = aspect;
        }
        if self.no_invert {
            settings.invert_display = false;
        }
        if self.invert_export {
            settings.invert_export = true;
        }
        settings.clamp_all();
    }
}

impl Cli {
    /// Exactly one of `--image` / `--video`.
    ///
    /// # Errors
    /// Returns an error if zero or both sources are given.
    pub fn validate_source(&self) -> anyhow::Result<SourceArg> {
        match (&self.image, &self.video) {
            (Some(path), None) => Ok(SourceArg::Image(path.clone())),
            (None, Some(path)) => Ok(SourceArg::Video(path.clone())),
            (None, None) => anyhow::bail!("No source given. Use --image or --video."),
            (Some(_), Some(_)) => {
                anyhow::bail!("One source at a time. Use --image OR --video.")
            }
        }
    }

    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            columns: self.columns,
            aspect: self.aspect,
            no_invert: self.no_invert,
            invert_export: self.invert_export,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("glyphcast").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn exactly_one_source() {
        assert!(parse(&[]).validate_source().is_err());
        assert!(
            parse(&["--image", "a.png", "--video", "b.mp4"])
                .validate_source()
                .is_err()
        );
        assert_eq!(
            parse(&["--video", "b.mp4"]).validate_source().unwrap(),
            SourceArg::Video(PathBuf::from("b.mp4"))
        );
    }

    #[test]
    fn overrides_win_and_clamp() {
        let cli = parse(&[
            "--image",
            "a.png",
            "--columns",
            "5000",
            "--aspect",
            "1.5",
            "--no-invert",
            "--invert-export",
        ]);
        let mut settings = Settings::default();
        cli.overrides().apply(&mut settings);
        assert_eq!(settings.max_columns, 999);
        assert!((settings.aspect_ratio - 1.5).abs() < f32::EPSILON);
        assert!(!settings.invert_display);
        assert!(settings.invert_export);
    }

    #[test]
    fn no_flags_keep_file_values() {
        let cli = parse(&["--image", "a.png"]);
        let mut settings = Settings {
            max_columns: 80,
            invert_display: true,
            ..Settings::default()
        };
        cli.overrides().apply(&mut settings);
        assert_eq!(settings.max_columns, 80);
        assert!(settings.invert_display);
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
    }
}
