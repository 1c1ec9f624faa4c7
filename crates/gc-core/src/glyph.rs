/// Side length of a glyph cell in pixels.
pub const GLYPH_SIZE: usize = 5;

/// Intensity of one glyph pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ink {
    /// Background.
    White,
    /// Anti-aliased edge.
    Gray,
    /// Stroke.
    Black,
}

impl Ink {
    /// Opaque RGBA for this level.
    #[inline(always)]
    #[must_use]
    pub const fn rgba(self) -> [u8; 4] {
        match self {
            Ink::White => [255, 255, 255, 255],
            Ink::Gray => [128, 128, 128, 255],
            Ink::Black => [0, 0, 0, 255],
        }
    }

    const fn from_level(level: u8) -> Self {
        match level {
            0 => Ink::White,
            1 => Ink::Gray,
            _ => Ink::Black,
        }
    }
}

/// 5×5 raster template for one symbol, rows top to bottom.
///
/// Levels: 0 = white, 1 = gray, 2 = black.
///
/// # Example
/// ```
/// use gc_core::glyph::{GlyphPattern, Ink};
/// let dot = GlyphPattern::for_symbol('.');
/// assert_eq!(dot.ink(2, 3), Ink::Black);
/// assert_eq!(dot.ink(0, 0), Ink::White);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphPattern {
    rows: [[u8; GLYPH_SIZE]; GLYPH_SIZE],
}

impl GlyphPattern {
    /// All-white pattern used for spaces and unknown symbols.
    pub const BLANK: Self = Self {
        rows: [[0; GLYPH_SIZE]; GLYPH_SIZE],
    };

    /// Pattern for `symbol`; anything outside the ramp maps to [`Self::BLANK`].
    #[must_use]
    pub const fn for_symbol(symbol: char) -> Self {
        let rows = match symbol {
            '.' => DOT,
            ',' => COMMA,
            '_' => UNDERSCORE,
            ':' => COLON,
            ';' => SEMICOLON,
            '-' => DASH,
            '+' => PLUS,
            '*' => STAR,
            '#' => HASH,
            '%' => PERCENT,
            '&' => AMPERSAND,
            '$' => DOLLAR,
            '@' => AT,
            _ => return Self::BLANK,
        };
        Self { rows }
    }

    /// Ink at column `x`, row `y`.
    #[inline(always)]
    #[must_use]
    pub const fn ink(&self, x: usize, y: usize) -> Ink {
        Ink::from_level(self.rows[y][x])
    }

    /// `true` if every pixel is white.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(|&v| v == 0)
    }
}

type Rows = [[u8; GLYPH_SIZE]; GLYPH_SIZE];

const DOT: Rows = [
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 2, 0, 0],
    [0, 0, 0, 0, 0],
];
const COMMA: Rows = [
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 2, 0, 0],
    [0, 2, 1, 0, 0],
];
const UNDERSCORE: Rows = [
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 2, 2, 2, 0],
    [0, 0, 0, 0, 0],
];
const COLON: Rows = [
    [0, 0, 0, 0, 0],
    [0, 0, 2, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 2, 0, 0],
    [0, 0, 0, 0, 0],
];
const SEMICOLON: Rows = [
    [0, 0, 0, 0, 0],
    [0, 0, 2, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 2, 0, 0],
    [0, 2, 1, 0, 0],
];
const DASH: Rows = [
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 2, 2, 2, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
];
const PLUS: Rows = [
    [0, 0, 1, 0, 0],
    [0, 0, 2, 0, 0],
    [1, 2, 2, 2, 1],
    [0, 0, 2, 0, 0],
    [0, 0, 1, 0, 0],
];
const STAR: Rows = [
    [2, 0, 2, 0, 2],
    [0, 2, 2, 2, 0],
    [0, 0, 2, 0, 0],
    [0, 2, 0, 2, 0],
    [2, 0, 0, 0, 2],
];
const HASH: Rows = [
    [0, 2, 0, 2, 0],
    [2, 2, 2, 2, 2],
    [0, 2, 0, 2, 0],
    [2, 2, 2, 0, 2],
    [0, 2, 0, 2, 0],
];
const PERCENT: Rows = [
    [1, 2, 1, 0, 2],
    [2, 0, 2, 2, 0],
    [1, 2, 2, 2, 1],
    [0, 2, 2, 0, 2],
    [2, 0, 1, 2, 1],
];
const AMPERSAND: Rows = [
    [0, 0, 1, 2, 0],
    [0, 1, 2, 0, 2],
    [0, 1, 2, 0, 0],
    [0, 2, 0, 2, 0],
    [0, 2, 2, 0, 2],
];
const DOLLAR: Rows = [
    [0, 1, 2, 1, 0],
    [0, 2, 2, 2, 0],
    [0, 0, 2, 0, 0],
    [0, 0, 2, 1, 0],
    [0, 2, 2, 2, 0],
];
const AT: Rows = [
    [0, 2, 2, 1, 0],
    [2, 2, 0, 0, 1],
    [2, 2, 0, 0, 2],
    [2, 1, 2, 1, 0],
    [1, 2, 1, 0, 0],
];
