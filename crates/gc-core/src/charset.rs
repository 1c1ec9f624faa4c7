/// Number of symbols in every ramp.
pub const RAMP_LEN: usize = 14;

/// Highest valid ramp index.
pub const MAX_INDEX: u8 = (RAMP_LEN - 1) as u8;

/// Darkest-looking glyph first: dark pixels print dense symbols.
pub const NORMAL_SYMBOLS: [char; RAMP_LEN] = [
    '@', '$', '&', '%', '#', '*', '+', '-', ';', ':', '_', ',', '.', ' ',
];

/// Mirror of [`NORMAL_SYMBOLS`], for light-on-dark displays.
pub const INVERTED_SYMBOLS: [char; RAMP_LEN] = [
    ' ', '.', ',', '_', ':', ';', '-', '+', '*', '#', '%', '&', '$', '@',
];

/// Bucket a luminance value into a ramp index: `floor(lum / 255 * 13)`.
///
/// Integer arithmetic gives the exact floor without float rounding.
///
/// # Example
/// ```
/// use gc_core::charset::ramp_index;
/// assert_eq!(ramp_index(0), 0);
/// assert_eq!(ramp_index(85), 4);
/// assert_eq!(ramp_index(170), 8);
/// assert_eq!(ramp_index(255), 13);
/// ```
#[inline(always)]
#[must_use]
pub fn ramp_index(luminance: u8) -> u8 {
    ((u32::from(luminance) * u32::from(MAX_INDEX)) / 255).min(u32::from(MAX_INDEX)) as u8
}

/// Ordered 14-symbol palette turning a ramp index into a printable character.
///
/// # Example
/// ```
/// use gc_core::charset::SymbolRamp;
/// let ramp = SymbolRamp::normal();
/// assert_eq!(ramp.symbol(0), '@');
/// assert_eq!(ramp.map(255), ' ');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolRamp {
    symbols: [char; RAMP_LEN],
}

impl SymbolRamp {
    /// Dense-to-sparse ramp.
    #[must_use]
    pub const fn normal() -> Self {
        Self {
            symbols: NORMAL_SYMBOLS,
        }
    }

    /// Sparse-to-dense ramp.
    #[must_use]
    pub const fn inverted() -> Self {
        Self {
            symbols: INVERTED_SYMBOLS,
        }
    }

    /// Pick the ramp for an invert flag.
    #[must_use]
    pub const fn for_invert(invert: bool) -> Self {
        if invert {
            Self::inverted()
        } else {
            Self::normal()
        }
    }

    /// Symbol at `index`; indices past the end clamp to the last symbol.
    #[inline(always)]
    #[must_use]
    pub fn symbol(&self, index: u8) -> char {
        self.symbols[usize::from(index.min(MAX_INDEX))]
    }

    /// Luminance straight to symbol.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.symbol(ramp_index(luminance))
    }

    /// Ramp index of `ch`, if it belongs to this ramp.
    #[must_use]
    pub fn index_of(&self, ch: char) -> Option<u8> {
        self.symbols.iter().position(|&s| s == ch).map(|i| i as u8)
    }

    /// All symbols in ramp order.
    #[must_use]
    pub fn symbols(&self) -> &[char; RAMP_LEN] {
        &self.symbols
    }
}

impl Default for SymbolRamp {
    fn default() -> Self {
        Self::normal()
    }
}
