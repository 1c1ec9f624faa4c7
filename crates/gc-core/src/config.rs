use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Upper bound for the character-grid width.
pub const MAX_COLUMNS_LIMIT: u32 = 999;
/// Lower bound for the glyph aspect correction.
pub const MIN_ASPECT_RATIO: f32 = 0.1;
/// Upper bound for the glyph aspect correction.
pub const MAX_ASPECT_RATIO: f32 = 10.0;

const DEFAULT_MAX_COLUMNS: u32 = 250;
const DEFAULT_ASPECT_RATIO: f32 = 2.0;

fn clamp_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() {
        aspect.clamp(MIN_ASPECT_RATIO, MAX_ASPECT_RATIO)
    } else {
        DEFAULT_ASPECT_RATIO
    }
}

/// Scaler inputs: column budget and glyph height/width correction.
///
/// Constructed values are always clamped; there is no invalid state.
///
/// # Example
/// ```
/// use gc_core::config::ScaleParameters;
/// let p = ScaleParameters::new(0, 50.0);
/// assert_eq!(p.max_columns(), 1);
/// assert_eq!(p.aspect_ratio(), 10.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleParameters {
    max_columns: u32,
    aspect_ratio: f32,
}

impl ScaleParameters {
    /// Clamp and wrap.
    #[must_use]
    pub fn new(max_columns: u32, aspect_ratio: f32) -> Self {
        Self {
            max_columns: max_columns.max(1),
            aspect_ratio: clamp_aspect(aspect_ratio),
        }
    }

    /// Column budget, at least 1.
    #[must_use]
    pub fn max_columns(&self) -> u32 {
        self.max_columns
    }

    /// Aspect correction in [0.1, 10.0].
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Target grid size for a `width`×`height` source, or `None` when the
    /// source already fits within the column budget.
    ///
    /// Height is `floor(height / aspect * columns / width)`, at least 1.
    ///
    /// # Example
    /// ```
    /// use gc_core::config::ScaleParameters;
    /// let p = ScaleParameters::new(10, 2.0);
    /// assert_eq!(p.target_size(100, 50), Some((10, 2)));
    /// assert_eq!(p.target_size(8, 8), None);
    /// ```
    #[must_use]
    pub fn target_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width == 0 || height == 0 {
            return None;
        }
        let columns = self.max_columns.min(width);
        if columns >= width {
            return None;
        }
        let rows = f64::from(height) / f64::from(self.aspect_ratio) * f64::from(columns)
            / f64::from(width);
        Some((columns, (rows.floor() as u32).max(1)))
    }
}

impl Default for ScaleParameters {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COLUMNS, DEFAULT_ASPECT_RATIO)
    }
}

/// User-facing settings consumed by the conversion core.
///
/// Serialisable as TOML. Every field has a sane default.
///
/// # Example
/// ```
/// use gc_core::config::Settings;
/// let settings = Settings::default();
/// assert_eq!(settings.max_columns, 250);
/// assert!(settings.invert_display);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    /// Character-grid width cap [1, 999].
    pub max_columns: u32,
    /// Glyph cell height/width correction [0.1, 10.0].
    pub aspect_ratio: f32,
    /// Use the inverted ramp for on-screen display.
    pub invert_display: bool,
    /// Use the inverted ramp for text/image export.
    pub invert_export: bool,
    /// Playback pacing never exceeds this rate [1, 240].
    pub max_fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_columns: DEFAULT_MAX_COLUMNS,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            invert_display: true,
            invert_export: false,
            max_fps: 60,
        }
    }
}

impl Settings {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    pub fn clamp_all(&mut self) {
        self.max_columns = self.max_columns.clamp(1, MAX_COLUMNS_LIMIT);
        self.aspect_ratio = clamp_aspect(self.aspect_ratio);
        self.max_fps = self.max_fps.clamp(1, 240);
    }

    /// Scaler inputs derived from these settings.
    #[must_use]
    pub fn scale_parameters(&self) -> ScaleParameters {
        ScaleParameters::new(self.max_columns.min(MAX_COLUMNS_LIMIT), self.aspect_ratio)
    }
}

/// Intermediate TOML layout, all sections optional.
#[derive(Deserialize)]
struct ConfigFile {
    conversion: Option<ConversionSection>,
    font: Option<FontSection>,
    playback: Option<PlaybackSection>,
}

#[derive(Deserialize)]
struct ConversionSection {
    max_columns: Option<u32>,
    aspect_ratio: Option<f32>,
}

#[derive(Deserialize)]
struct FontSection {
    invert_display: Option<bool>,
    invert_export: Option<bool>,
}

#[derive(Deserialize)]
struct PlaybackSection {
    max_fps: Option<u32>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this layout.
///
/// # Example
/// ```
/// use gc_core::config::parse_config;
/// let s = parse_config("[conversion]\nmax_columns = 5000\n").unwrap();
/// assert_eq!(s.max_columns, 999);
/// ```
pub fn parse_config(content: &str) -> Result<Settings> {
    let file: ConfigFile = toml::from_str(content).context("TOML parse error")?;
    let mut settings = Settings::default();

    if let Some(c) = file.conversion {
        if let Some(v) = c.max_columns {
            settings.max_columns = v;
        }
        if let Some(v) = c.aspect_ratio {
            settings.aspect_ratio = v;
        }
    }
    if let Some(f) = file.font {
        if let Some(v) = f.invert_display {
            settings.invert_display = v;
        }
        if let Some(v) = f.invert_export {
            settings.invert_export = v;
        }
    }
    if let Some(p) = file.playback
        && let Some(v) = p.max_fps
    {
        settings.max_fps = v;
    }

    settings.clamp_all();
    Ok(settings)
}

/// Load a TOML file and merge it over the defaults.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gc_core::config::load_config;
/// use std::path::Path;
/// let settings = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let settings =
        parse_config(&content).with_context(|| format!("Invalid config in {}", path.display()))?;
    log::debug!("Config loaded from {}: {settings:?}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn clamp_all_bounds_values() {
        let mut s = Settings {
            max_columns: 0,
            aspect_ratio: 0.01,
            invert_display: false,
            invert_export: true,
            max_fps: 1000,
        };
        s.clamp_all();
        assert_eq!(s.max_columns, 1);
        assert!((s.aspect_ratio - MIN_ASPECT_RATIO).abs() < f32::EPSILON);
        assert_eq!(s.max_fps, 240);

        s.max_columns = 5000;
        s.aspect_ratio = f32::NAN;
        s.clamp_all();
        assert_eq!(s.max_columns, MAX_COLUMNS_LIMIT);
        assert!((s.aspect_ratio - DEFAULT_ASPECT_RATIO).abs() < f32::EPSILON);
    }

    #[test]
    fn target_height_uses_floor() {
        let p = ScaleParameters::new(10, 2.0);
        // 50 / 2 * 10 / 100 = 2.5
        assert_eq!(p.target_size(100, 50), Some((10, 2)));
        let p = ScaleParameters::new(3, 1.0);
        // 10 / 1 * 3 / 7 = 4.28
        assert_eq!(p.target_size(7, 10), Some((3, 4)));
    }

    #[test]
    fn target_height_never_zero() {
        let p = ScaleParameters::new(1, 10.0);
        assert_eq!(p.target_size(1000, 2), Some((1, 1)));
    }

    #[test]
    fn fitting_source_passes_through() {
        let p = ScaleParameters::new(2, 2.0);
        assert_eq!(p.target_size(2, 2), None);
        assert_eq!(p.target_size(0, 5), None);
    }

    #[test]
    fn parse_partial_override() {
        let s = parse_config("[font]\ninvert_display = false\n").unwrap();
        assert!(!s.invert_display);
        assert_eq!(s.max_columns, 250);
        assert!((s.aspect_ratio - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_config("[conversion\nmax_columns = ").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[conversion]\nmax_columns = 80\naspect_ratio = 1.5").unwrap();
        writeln!(file, "[playback]\nmax_fps = 24").unwrap();
        let s = load_config(file.path()).unwrap();
        assert_eq!(s.max_columns, 80);
        assert!((s.aspect_ratio - 1.5).abs() < f32::EPSILON);
        assert_eq!(s.max_fps, 24);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/glyphcast.toml")).is_err());
    }
}
