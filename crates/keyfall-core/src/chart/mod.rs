//! Notes and charts.

mod generator;

pub use generator::ChartGenerator;

/// A single scheduled key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Key label of the lane this note falls in.
    pub key: char,
    /// Tick on which the note starts falling.
    pub spawn_time: u64,
    /// Current row; 0 until the note spawns.
    pub row: u32,
    /// Set once the note has been hit.
    pub consumed: bool,
}

impl Note {
    pub fn new(key: char, spawn_time: u64) -> Self {
        Self {
            key,
            spawn_time,
            row: 0,
            consumed: false,
        }
    }
}

/// Ordered note sequence for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chart {
    notes: Vec<Note>,
}

impl Chart {
    /// Build a chart from notes, sorting them by spawn time.
    ///
    /// The sort is stable, so notes sharing a spawn time keep their order.
    pub fn from_notes(mut notes: Vec<Note>) -> Self {
        notes.sort_by_key(|note| note.spawn_time);
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub(crate) fn notes_mut(&mut self) -> &mut [Note] {
        &mut self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Spawn time of the last note.
    pub fn end_time(&self) -> Option<u64> {
        self.notes.last().map(|note| note.spawn_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_notes_sorts_by_spawn_time() {
        let chart = Chart::from_notes(vec![
            Note::new('K', 7),
            Note::new('A', 2),
            Note::new('S', 7),
            Note::new('J', 1),
        ]);
        let order: Vec<(char, u64)> = chart.notes().iter().map(|n| (n.key, n.spawn_time)).collect();
        assert_eq!(order, vec![('J', 1), ('A', 2), ('K', 7), ('S', 7)]);
        assert_eq!(chart.end_time(), Some(7));
    }

    #[test]
    fn test_new_note_is_unspawned() {
        let note = Note::new('A', 3);
        assert_eq!(note.row, 0);
        assert!(!note.consumed);
    }

    #[test]
    fn test_empty_chart() {
        let chart = Chart::default();
        assert!(chart.is_empty());
        assert_eq!(chart.end_time(), None);
    }
}
