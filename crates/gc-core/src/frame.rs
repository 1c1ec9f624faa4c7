use crate::error::CoreError;

/// Owned RGBA pixel buffer, row-major, 4 bytes per pixel.
///
/// A buffer has exactly one owner at a time; pipeline stages hand it over by
/// value rather than sharing it.
///
/// # Example
/// ```
/// use gc_core::frame::PixelBuffer;
/// let fb = PixelBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Pixels RGBA, row-major, 4 bytes per pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelBuffer {
    /// Allocate a zeroed (transparent black) buffer.
    ///
    /// # Example
    /// ```
    /// use gc_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Wrap raw RGBA bytes, checking that the length matches the dimensions.
    ///
    /// # Errors
    /// Returns [`CoreError::BufferSize`] if `data.len() != width * height * 4`.
    ///
    /// # Example
    /// ```
    /// use gc_core::frame::PixelBuffer;
    /// assert!(PixelBuffer::from_rgba(1, 1, vec![1, 2, 3, 4]).is_ok());
    /// assert!(PixelBuffer::from_rgba(2, 1, vec![1, 2, 3, 4]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CoreError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Buffer filled with a single RGBA colour.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut fb = Self::new(width, height);
        for px in fb.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        fb
    }

    /// `true` if the buffer holds no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Access pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use gc_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Overwrite pixel (x, y). Out-of-bounds writes are ignored.
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }
}

/// One brightness byte per pixel, same shape as the buffer it was computed from.
///
/// # Example
/// ```
/// use gc_core::frame::LuminanceBuffer;
/// let lum = LuminanceBuffer { data: vec![0, 255], width: 2, height: 1 };
/// assert_eq!(lum.get(1, 0), 255);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LuminanceBuffer {
    /// Luminance values, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl LuminanceBuffer {
    /// Luminance at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// Character grid produced by the symbol mapper.
///
/// Logically an H×W matrix; rendered as H newline-joined lines of W chars.
///
/// # Example
/// ```
/// use gc_core::frame::AsciiGrid;
/// let mut grid = AsciiGrid::new(3, 2);
/// grid.set(0, 0, '@');
/// assert_eq!(grid.get(0, 0), '@');
/// assert_eq!(grid.to_text(), "@  \n   ");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<char>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl AsciiGrid {
    /// Space-filled grid.
    ///
    /// # Example
    /// ```
    /// use gc_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![' '; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Build a grid from text lines. Short lines are padded with spaces so the
    /// grid stays rectangular.
    ///
    /// # Example
    /// ```
    /// use gc_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::from_lines("ab\nc");
    /// assert_eq!((grid.width, grid.height), (2, 2));
    /// assert_eq!(grid.get(1, 1), ' ');
    /// ```
    #[must_use]
    pub fn from_lines(text: &str) -> Self {
        let lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        let width = lines.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Self::default();
        }
        let mut cells = Vec::with_capacity(width * lines.len());
        for line in &lines {
            cells.extend_from_slice(line);
            cells.extend(std::iter::repeat_n(' ', width - line.len()));
        }
        Self {
            cells,
            width: width as u32,
            height: lines.len() as u32,
        }
    }

    /// `true` if the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, ch: char) {
        self.cells[y as usize * self.width as usize + x as usize] = ch;
    }

    /// Get the cell at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> char {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Rows joined by `\n`, no trailing newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut text = String::with_capacity(self.cells.len() + self.height as usize);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.extend(row.iter());
        }
        text
    }

    /// Dimension label, height first: `"24symbols x 80symbols"`.
    ///
    /// # Example
    /// ```
    /// use gc_core::frame::AsciiGrid;
    /// assert_eq!(AsciiGrid::new(80, 24).dimensions_label(), "24symbols x 80symbols");
    /// ```
    #[must_use]
    pub fn dimensions_label(&self) -> String {
        format!("{}symbols x {}symbols", self.height, self.width)
    }
}

/// What the display side receives for each conversion.
#[derive(Clone, Debug)]
pub struct DisplayFrame {
    /// Converted grid.
    pub grid: AsciiGrid,
    /// Dimensions (width, height) of the source frame before scaling.
    pub source_size: (u32, u32),
    /// Position of the frame within its playback session, starting at 0.
    pub sequence: u64,
    /// `true` if the grid was mapped with the inverted ramp.
    pub inverted: bool,
}

impl DisplayFrame {
    /// Grid as display text.
    #[must_use]
    pub fn text(&self) -> String {
        self.grid.to_text()
    }

    /// Source label, height first: `"1080px x 1920px"`.
    #[must_use]
    pub fn source_label(&self) -> String {
        format!("{}px x {}px", self.source_size.1, self.source_size.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_rejects_short_buffer() {
        let err = PixelBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            CoreError::BufferSize {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn set_pixel_ignores_out_of_bounds() {
        let mut fb = PixelBuffer::new(2, 2);
        fb.set_pixel(5, 5, [255; 4]);
        assert!(fb.data.iter().all(|&b| b == 0));
        fb.set_pixel(1, 1, [1, 2, 3, 4]);
        assert_eq!(fb.pixel(1, 1), (1, 2, 3, 4));
    }

    #[test]
    fn text_joins_rows_without_trailing_newline() {
        let grid = AsciiGrid::from_lines("@#\n;.");
        assert_eq!(grid.to_text(), "@#\n;.");
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn empty_grid_has_empty_text() {
        let grid = AsciiGrid::from_lines("");
        assert!(grid.is_empty());
        assert_eq!(grid.to_text(), "");
    }

    #[test]
    fn display_labels_are_height_first() {
        let frame = DisplayFrame {
            grid: AsciiGrid::new(4, 2),
            source_size: (1920, 1080),
            sequence: 0,
            inverted: false,
        };
        assert_eq!(frame.source_label(), "1080px x 1920px");
        assert_eq!(frame.grid.dimensions_label(), "2symbols x 4symbols");
    }
}
