//! Recording render sink for testing
//!
//! Stores every call in memory so tests can assert on what was drawn without
//! a terminal. Clones share the same recording, which lets a test keep a
//! handle while the session owns the sink.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::lane::Color;

use super::RenderSink;

/// A single recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOp {
    Init,
    Set {
        column: u16,
        row: u16,
        glyph: char,
        color: Color,
    },
    Clear,
    Flush,
    Resync,
    Shutdown,
}

#[derive(Debug, Default)]
struct Recording {
    ops: Vec<SinkOp>,
    screen: HashMap<(u16, u16), (char, Color)>,
    fail_init: bool,
}

/// Render sink that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `init` fails, for exercising startup aborts.
    pub fn failing_init() -> Self {
        let sink = Self::default();
        sink.lock().fail_init = true;
        sink
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn ops(&self) -> Vec<SinkOp> {
        self.lock().ops.clone()
    }

    fn count(&self, op: &SinkOp) -> usize {
        self.lock().ops.iter().filter(|o| *o == op).count()
    }

    pub fn init_count(&self) -> usize {
        self.count(&SinkOp::Init)
    }

    pub fn shutdown_count(&self) -> usize {
        self.count(&SinkOp::Shutdown)
    }

    pub fn flush_count(&self) -> usize {
        self.count(&SinkOp::Flush)
    }

    pub fn resync_count(&self) -> usize {
        self.count(&SinkOp::Resync)
    }

    /// Glyph currently on screen at a cell (since the last clear).
    pub fn glyph_at(&self, column: u16, row: u16) -> Option<(char, Color)> {
        self.lock().screen.get(&(column, row)).copied()
    }

    /// Read `len` cells starting at `(column, row)`; blanks become spaces.
    pub fn text_at(&self, column: u16, row: u16, len: u16) -> String {
        let recording = self.lock();
        (column..column.saturating_add(len))
            .map(|c| recording.screen.get(&(c, row)).map_or(' ', |(g, _)| *g))
            .collect()
    }

    /// Every glyph drawn at a cell over the whole recording.
    pub fn history_at(&self, column: u16, row: u16) -> Vec<char> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                SinkOp::Set {
                    column: c,
                    row: r,
                    glyph,
                    ..
                } if *c == column && *r == row => Some(*glyph),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn init(&mut self) -> Result<()> {
        let mut recording = self.lock();
        recording.ops.push(SinkOp::Init);
        if recording.fail_init {
            return Err(Error::Terminal("recording sink configured to fail".into()));
        }
        Ok(())
    }

    fn set_content(&mut self, column: u16, row: u16, glyph: char, color: Color) {
        let mut recording = self.lock();
        recording.ops.push(SinkOp::Set {
            column,
            row,
            glyph,
            color,
        });
        recording.screen.insert((column, row), (glyph, color));
    }

    fn clear(&mut self) {
        let mut recording = self.lock();
        recording.ops.push(SinkOp::Clear);
        recording.screen.clear();
    }

    fn flush(&mut self) -> Result<()> {
        self.lock().ops.push(SinkOp::Flush);
        Ok(())
    }

    fn resync(&mut self) -> Result<()> {
        self.lock().ops.push(SinkOp::Resync);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.lock().ops.push(SinkOp::Shutdown);
        Ok(())
    }
}
