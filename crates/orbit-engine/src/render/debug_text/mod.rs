//! Debug text overlay.
//!
//! A fixed grid of character cells drawn on top of the frame. Text is placed
//! by `(column, row)` and colored with a VGA-style attribute byte: the low
//! nibble selects the foreground and the high nibble the background from
//! [`PALETTE`]. Background index 0 leaves the cell transparent.

mod renderer;

pub(crate) use renderer::DebugTextRenderer;

use super::color::{Abgr, PALETTE};

/// Cell width in physical pixels.
pub const CELL_WIDTH: u32 = 8;
/// Cell height in physical pixels.
pub const CELL_HEIGHT: u32 = 16;

/// VGA-style color attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextAttr(pub u8);

impl TextAttr {
    /// Foreground color. Index 0 is opaque black.
    pub fn foreground(self) -> Abgr {
        match self.0 & 0x0f {
            0 => Abgr::BLACK,
            i => PALETTE[i as usize],
        }
    }

    /// Background color, `None` when transparent.
    pub fn background(self) -> Option<Abgr> {
        match self.0 >> 4 {
            0 => None,
            i => Some(PALETTE[i as usize]),
        }
    }
}

/// One character cell ready for drawing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextCell {
    pub column: u16,
    pub row: u16,
    pub ch: char,
    pub attr: TextAttr,
}

impl TextCell {
    /// Top-left corner in physical pixels.
    pub fn origin(&self) -> [f32; 2] {
        [
            (self.column as u32 * CELL_WIDTH) as f32,
            (self.row as u32 * CELL_HEIGHT) as f32,
        ]
    }
}

#[derive(Debug, Clone)]
struct Line {
    column: u16,
    row: u16,
    attr: TextAttr,
    text: String,
}

/// Per-frame overlay contents.
#[derive(Debug, Clone, Default)]
pub struct DebugText {
    lines: Vec<Line>,
}

impl DebugText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes everything printed so far.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Prints `text` starting at cell `(column, row)`.
    pub fn print(&mut self, column: u16, row: u16, attr: u8, text: impl Into<String>) {
        self.lines.push(Line { column, row, attr: TextAttr(attr), text: text.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.text.is_empty())
    }

    /// Cells in print order. Control characters are skipped but still advance
    /// the column; text past the last column is dropped.
    pub fn cells(&self) -> impl Iterator<Item = TextCell> + '_ {
        self.lines.iter().flat_map(|line| {
            line.text.chars().enumerate().filter_map(move |(i, ch)| {
                let column = line.column.checked_add(u16::try_from(i).ok()?)?;
                (!ch.is_control()).then_some(TextCell { column, row: line.row, ch, attr: line.attr })
            })
        })
    }
}
