//! crossterm render sink.
//!
//! Draw calls are queued into a buffered writer and written out on `flush`.
//! The sink keeps a copy of what is on screen so `resync` can repaint after
//! a resize.

use std::collections::HashMap;
use std::io::{self, BufWriter, Stdout, Write};

use crossterm::cursor::{self, MoveTo};
use crossterm::style::{self, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use keyfall_core::{Color, Error, RenderSink, Result};
use tracing::debug;

fn terminal_error(context: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |e| Error::Terminal(format!("{}: {}", context, e))
}

/// Terminal colour for a lane colour.
pub fn to_terminal_color(color: Color) -> style::Color {
    match color {
        Color::Green => style::Color::Green,
        Color::Red => style::Color::Red,
        Color::Yellow => style::Color::Yellow,
        Color::Blue => style::Color::Blue,
        Color::Orange => style::Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        Color::Magenta => style::Color::Magenta,
        Color::Cyan => style::Color::Cyan,
        Color::White => style::Color::White,
    }
}

pub struct TerminalSink {
    writer: BufWriter<Stdout>,
    cells: HashMap<(u16, u16), (char, Color)>,
    size: (u16, u16),
    active: bool,
    queue_error: Option<io::Error>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            cells: HashMap::new(),
            size: (0, 0),
            active: false,
            queue_error: None,
        }
    }

    fn in_bounds(&self, column: u16, row: u16) -> bool {
        column < self.size.0 && row < self.size.1
    }

    fn draw_cell(&mut self, column: u16, row: u16, glyph: char, color: Color) -> io::Result<()> {
        queue!(
            self.writer,
            MoveTo(column, row),
            SetForegroundColor(to_terminal_color(color)),
            Print(glyph)
        )
    }

    /// Keep the first queueing error for the next flush.
    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result
            && self.queue_error.is_none()
        {
            self.queue_error = Some(e);
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TerminalSink {
    fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode().map_err(terminal_error("enable raw mode"))?;
        self.active = true;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
        .map_err(terminal_error("enter alternate screen"))?;
        self.size = terminal::size().map_err(terminal_error("query terminal size"))?;
        debug!("Terminal initialized at {}x{}", self.size.0, self.size.1);
        Ok(())
    }

    fn set_content(&mut self, column: u16, row: u16, glyph: char, color: Color) {
        self.cells.insert((column, row), (glyph, color));
        if self.in_bounds(column, row) {
            let result = self.draw_cell(column, row, glyph, color);
            self.record(result);
        }
    }

    fn clear(&mut self) {
        self.cells.clear();
        let result = queue!(self.writer, ResetColor, Clear(ClearType::All));
        self.record(result);
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(e) = self.queue_error.take() {
            return Err(terminal_error("queue draw command")(e));
        }
        self.writer.flush().map_err(terminal_error("flush"))
    }

    fn resync(&mut self) -> Result<()> {
        self.size = terminal::size().map_err(terminal_error("query terminal size"))?;
        queue!(self.writer, ResetColor, Clear(ClearType::All))
            .map_err(terminal_error("clear"))?;

        let cells: Vec<_> = self
            .cells
            .iter()
            .map(|(&(column, row), &(glyph, color))| (column, row, glyph, color))
            .filter(|&(column, row, _, _)| self.in_bounds(column, row))
            .collect();
        for (column, row, glyph, color) in cells {
            self.draw_cell(column, row, glyph, color)
                .map_err(terminal_error("repaint"))?;
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let restore = execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        terminal::disable_raw_mode().map_err(terminal_error("disable raw mode"))?;
        restore.map_err(terminal_error("leave alternate screen"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orange_is_rgb() {
        assert_eq!(
            to_terminal_color(Color::Orange),
            style::Color::Rgb {
                r: 255,
                g: 165,
                b: 0
            }
        );
    }

    #[test]
    fn test_colors_are_distinct() {
        let all = [
            Color::Green,
            Color::Red,
            Color::Yellow,
            Color::Blue,
            Color::Orange,
            Color::Magenta,
            Color::Cyan,
            Color::White,
        ];
        let mapped: Vec<_> = all.iter().map(|&c| to_terminal_color(c)).collect();
        for (i, a) in mapped.iter().enumerate() {
            for b in &mapped[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_bounds_before_init() {
        let mut sink = TerminalSink::new();
        // Off-screen cells are kept for the next resync.
        sink.set_content(3, 4, 'A', Color::Green);
        assert!(!sink.in_bounds(3, 4));
        assert_eq!(sink.cells.get(&(3, 4)), Some(&('A', Color::Green)));
    }

    #[test]
    fn test_shutdown_without_init_is_noop() {
        let mut sink = TerminalSink::new();
        assert!(sink.shutdown().is_ok());
    }
}
