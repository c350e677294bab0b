//! Render sink abstraction.
//!
//! The game draws through [`RenderSink`] so that the terminal backend lives
//! in the binary and tests can record draw calls instead.

pub mod mock;

use crate::error::Result;
use crate::lane::Color;

/// Character-cell drawing surface.
pub trait RenderSink: Send {
    /// Take over the terminal.
    fn init(&mut self) -> Result<()>;

    /// Put one glyph at a cell. Off-screen cells are ignored.
    fn set_content(&mut self, column: u16, row: u16, glyph: char, color: Color);

    /// Blank the whole surface.
    fn clear(&mut self);

    /// Push pending draws to the display.
    fn flush(&mut self) -> Result<()>;

    /// Re-read the surface size and repaint everything.
    fn resync(&mut self) -> Result<()>;

    /// Give the terminal back. Called exactly once per session.
    fn shutdown(&mut self) -> Result<()>;
}

/// Draw `text` left to right starting at `(column, row)`.
pub fn draw_text<S: RenderSink + ?Sized>(
    sink: &mut S,
    column: u16,
    row: u16,
    text: &str,
    color: Color,
) {
    for (offset, glyph) in text.chars().enumerate() {
        let Some(column) = u16::try_from(offset)
            .ok()
            .and_then(|offset| column.checked_add(offset))
        else {
            break;
        };
        sink.set_content(column, row, glyph, color);
    }
}

/// Clamp a game row to a screen row.
pub fn screen_row(row: u32) -> u16 {
    u16::try_from(row).unwrap_or(u16::MAX)
}
