//! Strip: one row of styled terminal cells.
//!
//! Widgets and the pager components produce `Vec<Strip>` from `render()`.
//! Strips carry absolute coordinates; the frame buffer clips them.

use unicode_width::UnicodeWidthChar;

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Visual style for a single terminal cell.
///
/// Colors are stored as strings and parsed by the driver as named colors or
/// `#rrggbb` hex values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub dim: bool,
    pub underline: bool,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Foreground color only.
    pub fn fg(color: impl Into<String>) -> Self {
        Self {
            fg: Some(color.into()),
            ..Self::default()
        }
    }

    /// Same style, bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// One character with its style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// A space with default style.
    pub fn blank() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank()
    }
}

// ---------------------------------------------------------------------------
// Strip
// ---------------------------------------------------------------------------

/// A horizontal run of cells at row `y`, starting at column `x_offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pub y: i32,
    pub x_offset: i32,
    pub cells: Vec<StyledCell>,
}

impl Strip {
    pub fn new(y: i32, x_offset: i32) -> Self {
        Self {
            y,
            x_offset,
            cells: Vec::new(),
        }
    }

    pub fn push(&mut self, ch: char, style: CellStyle) {
        self.cells.push(StyledCell::new(ch, style));
    }

    /// Push every printable character of `text` with the same style.
    ///
    /// Zero-width and control characters are skipped.
    pub fn push_str(&mut self, text: &str, style: CellStyle) {
        for ch in text.chars() {
            if ch.width().is_some_and(|w| w > 0) {
                self.cells.push(StyledCell::new(ch, style.clone()));
            }
        }
    }

    /// Push `count` copies of `ch`.
    pub fn repeat(&mut self, ch: char, count: usize, style: CellStyle) {
        self.cells
            .extend(std::iter::repeat_n(StyledCell::new(ch, style), count));
    }

    pub fn width(&self) -> i32 {
        self.cells.len() as i32
    }

    /// Rightmost column (exclusive).
    pub fn right(&self) -> i32 {
        self.x_offset + self.width()
    }

    /// Keep only cells whose absolute column lies in `[x_start, x_end)`.
    pub fn crop(&self, x_start: i32, x_end: i32) -> Strip {
        let mut result = Strip::new(self.y, x_start);
        for (i, cell) in self.cells.iter().enumerate() {
            let cell_x = self.x_offset + i as i32;
            if cell_x >= x_start && cell_x < x_end {
                if result.cells.is_empty() {
                    result.x_offset = cell_x;
                }
                result.cells.push(cell.clone());
            }
        }
        result
    }

    /// The same strip moved by `dx` columns.
    pub fn shifted(mut self, dx: i32) -> Strip {
        self.x_offset += dx;
        self
    }

    /// The characters as a `String`, ignoring style.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.ch).collect()
    }
}
