//! Render loop.
//!
//! One iteration per tick: advance and draw the notes that are due, draw the
//! score, show the frame, then block on the clock. After each tick the
//! screen is cleared and the lane markers are redrawn. The loop has no end
//! condition of its own and runs until shutdown is requested, even after the
//! last note has scrolled in.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::clock::GameClock;
use crate::config::layout;
use crate::lane::{Color, LaneRegistry};
use crate::render::{RenderSink, draw_text, screen_row};

use super::{SessionState, ShutdownOnDrop};

pub struct RenderLoop<'a, S: RenderSink> {
    state: &'a SessionState,
    lanes: &'a LaneRegistry,
    sink: &'a Mutex<S>,
    marker_row: u16,
    score_column: u16,
}

impl<'a, S: RenderSink> RenderLoop<'a, S> {
    pub fn new(
        state: &'a SessionState,
        lanes: &'a LaneRegistry,
        sink: &'a Mutex<S>,
        target_row: u32,
    ) -> Self {
        Self {
            state,
            lanes,
            sink,
            marker_row: screen_row(target_row),
            score_column: lanes.score_column(),
        }
    }

    /// Drive frames until shutdown. Returns the final game time.
    pub fn run<C: GameClock + ?Sized>(&self, clock: &mut C) -> u64 {
        let _shutdown = ShutdownOnDrop(self.state);

        self.redraw_static();
        loop {
            self.draw_frame(self.state.now());

            if !clock.wait_tick(self.state.shutdown()) {
                break;
            }
            let now = self.state.tick();
            if now % 64 == 0 {
                debug!("Tick {} (score {})", now, self.state.score());
            }
            self.redraw_static();
        }

        let now = self.state.now();
        debug!("Render loop stopped at tick {}", now);
        now
    }

    /// Advance notes for `now` and draw the ones that moved plus the score.
    fn draw_frame(&self, now: u64) {
        let moves = self.state.advance_notes(now);
        let score = self.state.score();

        let mut sink = self.lock_sink();
        for note in moves {
            if let Some(lane) = self.lanes.get(note.key) {
                sink.set_content(lane.column, screen_row(note.row), lane.key, lane.color);
            }
        }
        draw_text(
            &mut *sink,
            self.score_column,
            layout::SCORE_ROW,
            &format!("Score: {}", score),
            Color::Green,
        );
        if let Err(e) = sink.flush() {
            warn!("Failed to flush frame: {}", e);
        }
    }

    /// Clear the screen and draw each lane's key on the target row.
    fn redraw_static(&self) {
        let mut sink = self.lock_sink();
        sink.clear();
        for lane in self.lanes {
            sink.set_content(lane.column, self.marker_row, lane.key, lane.color);
        }
        if let Err(e) = sink.resync() {
            warn!("Failed to resync: {}", e);
        }
        if let Err(e) = sink.flush() {
            warn!("Failed to flush lane markers: {}", e);
        }
    }

    fn lock_sink(&self) -> MutexGuard<'a, S> {
        self.sink.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Chart, Note};
    use crate::render::mock::RecordingSink;
    use crate::shutdown::ShutdownSignal;
    use crate::tracker::NoteTracker;

    /// Ticks a fixed number of times, then stops.
    struct CountdownClock {
        remaining: u64,
    }

    impl GameClock for CountdownClock {
        fn wait_tick(&mut self, shutdown: &ShutdownSignal) -> bool {
            if self.remaining == 0 || shutdown.is_shutdown() {
                return false;
            }
            self.remaining -= 1;
            true
        }
    }

    fn run_for(notes: Vec<Note>, ticks: u64) -> (SessionState, RecordingSink, u64) {
        let state = SessionState::new(NoteTracker::new(Chart::from_notes(notes)));
        let lanes = LaneRegistry::default();
        let sink = RecordingSink::new();
        let shared = Mutex::new(sink.clone());
        let mut clock = CountdownClock { remaining: ticks };
        let end = RenderLoop::new(&state, &lanes, &shared, 9).run(&mut clock);
        (state, sink, end)
    }

    #[test]
    fn test_game_time_counts_ticks() {
        let (state, _, end) = run_for(Vec::new(), 5);
        assert_eq!(end, 5);
        assert_eq!(state.now(), 5);
        assert!(state.is_shutdown());
    }

    #[test]
    fn test_note_drawn_each_tick_while_falling() {
        let (_, sink, _) = run_for(vec![Note::new('J', 0)], 12);
        let column = 8;
        for row in 1..=8u16 {
            assert_eq!(sink.history_at(column, row), vec!['J'], "row {}", row);
        }
        // Row 9 also carries the lane marker, redrawn every tick.
        assert!(sink.history_at(column, 9).iter().all(|&g| g == 'J'));
        assert!(sink.history_at(column, 10).is_empty());
    }

    #[test]
    fn test_markers_and_score_on_screen() {
        let (_, sink, _) = run_for(Vec::new(), 1);
        for (column, key) in [(0, 'A'), (4, 'S'), (8, 'J'), (12, 'K'), (16, 'L')] {
            assert_eq!(sink.glyph_at(column, 9).map(|(g, _)| g), Some(key));
        }
        assert_eq!(sink.text_at(20, 0, 8), "Score: 0");
    }

    #[test]
    fn test_static_redraw_each_tick() {
        let (_, sink, _) = run_for(Vec::new(), 3);
        // Initial draw plus one per tick.
        assert_eq!(sink.resync_count(), 4);
        assert_eq!(sink.flush_count(), 4 + 4);
    }
}
