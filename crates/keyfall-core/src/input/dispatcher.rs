use std::sync::Mutex;

use tracing::{debug, error, warn};

use crate::config::{input, layout};
use crate::lane::LaneRegistry;
use crate::render::{RenderSink, screen_row};
use crate::session::{SessionState, ShutdownOnDrop};

use super::{EventSource, InputEvent};

/// Turns input events into judgements, feedback marks and shutdown.
pub struct InputDispatcher<'a, S: RenderSink> {
    state: &'a SessionState,
    lanes: &'a LaneRegistry,
    sink: &'a Mutex<S>,
    feedback_row: u16,
}

impl<'a, S: RenderSink> InputDispatcher<'a, S> {
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
            feedback_row: screen_row(target_row),
        }
    }

    /// Consume events until shutdown.
    ///
    /// Polls with a short timeout so a quit raised elsewhere is noticed
    /// promptly. Leaving this function for any reason ends the session.
    pub fn run<E: EventSource + ?Sized>(&self, events: &mut E) {
        let _shutdown = ShutdownOnDrop(self.state);

        while !self.state.is_shutdown() {
            match events.poll_event(input::POLL_TIMEOUT) {
                Ok(Some(event)) => self.dispatch(event),
                Ok(None) => {}
                Err(e) => {
                    error!("Input error: {}", e);
                    break;
                }
            }
        }
        debug!("Input dispatcher stopped");
    }

    /// Handle one event.
    pub fn dispatch(&self, event: InputEvent) {
        match event {
            InputEvent::KeyPress(key) => self.key_press(key),
            InputEvent::Resize { columns, rows } => {
                debug!("Terminal resized to {}x{}", columns, rows);
                if let Err(e) = self.lock_sink().resync() {
                    warn!("Failed to resync after resize: {}", e);
                }
            }
            InputEvent::Quit => self.state.request_shutdown(),
        }
    }

    fn key_press(&self, key: char) {
        let hit = self.state.judge(key);

        let Some(lane) = self.lanes.get(key) else {
            return;
        };
        debug!(
            "Key {} at tick {}: {}",
            lane.key,
            self.state.now(),
            if hit { "hit" } else { "miss" }
        );

        let mut sink = self.lock_sink();
        sink.set_content(lane.column, self.feedback_row, layout::FEEDBACK_GLYPH, lane.color);
        if let Err(e) = sink.flush() {
            warn!("Failed to flush feedback: {}", e);
        }
    }

    fn lock_sink(&self) -> std::sync::MutexGuard<'a, S> {
        self.sink.lock().unwrap_or_else(|e| e.into_inner())
    }
}
