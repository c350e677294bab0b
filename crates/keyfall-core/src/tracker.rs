//! Note positions and hit judgement.

use tracing::trace;

use crate::chart::{Chart, Note};
use crate::config::{GameConfig, timing};
use crate::lane::normalize_key;

/// A note that moved during [`NoteTracker::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteMove {
    pub key: char,
    pub row: u32,
}

/// Owns the live chart and the score.
///
/// Notes fall one row per tick from their spawn time until they park at the
/// target row. A note parked there stays visible until a matching press
/// lands exactly `hit_window` ticks after its spawn; unhit notes are never
/// removed or counted as misses.
#[derive(Debug, Clone)]
pub struct NoteTracker {
    chart: Chart,
    score: u64,
    target_row: u32,
    hit_window: u64,
}

impl NoteTracker {
    pub fn new(chart: Chart) -> Self {
        Self::with_timing(chart, timing::TARGET_ROW, timing::HIT_WINDOW_TICKS)
    }

    pub fn with_timing(chart: Chart, target_row: u32, hit_window: u64) -> Self {
        Self {
            chart,
            score: 0,
            target_row,
            hit_window,
        }
    }

    pub fn from_config(chart: Chart, config: &GameConfig) -> Self {
        Self::with_timing(chart, config.target_row, config.hit_window)
    }

    /// Move every due note down one row.
    pub fn advance(&mut self, now: u64) -> Vec<NoteMove> {
        let target_row = self.target_row;
        self.chart
            .notes_mut()
            .iter_mut()
            .filter(|note| !note.consumed && note.spawn_time <= now && note.row < target_row)
            .map(|note| {
                note.row += 1;
                NoteMove {
                    key: note.key,
                    row: note.row,
                }
            })
            .collect()
    }

    /// Judge a key press at `now`. Returns `true` on a hit.
    ///
    /// At most one note is hit per press: the first in chart order that sits
    /// on the target row with its window ending at `now`.
    pub fn judge(&mut self, now: u64, key: char) -> bool {
        let key = normalize_key(key);
        let (target_row, hit_window) = (self.target_row, self.hit_window);

        let hit = self.chart.notes_mut().iter_mut().find(|note| {
            !note.consumed
                && note.key == key
                && note.row == target_row
                && note.spawn_time.checked_add(hit_window) == Some(now)
        });

        match hit {
            Some(note) => {
                note.row = target_row + 1;
                note.consumed = true;
                self.score += 1;
                trace!("Hit {} at tick {} (score {})", key, now, self.score);
                true
            }
            None => false,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn notes(&self) -> &[Note] {
        self.chart.notes()
    }

    pub fn len(&self) -> usize {
        self.chart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chart.is_empty()
    }

    /// Notes not yet hit.
    pub fn pending(&self) -> usize {
        self.chart.notes().iter().filter(|note| !note.consumed).count()
    }
}
