use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::shutdown::ShutdownSignal;
use crate::tracker::{NoteMove, NoteTracker};

/// State shared by the render loop and the input dispatcher.
///
/// The tracker sits behind its own mutex. Game time is written only by the
/// render loop; the dispatcher just reads it.
#[derive(Debug)]
pub struct SessionState {
    tracker: Mutex<NoteTracker>,
    game_time: AtomicU64,
    shutdown: ShutdownSignal,
}

impl SessionState {
    pub fn new(tracker: NoteTracker) -> Self {
        Self {
            tracker: Mutex::new(tracker),
            game_time: AtomicU64::new(0),
            shutdown: ShutdownSignal::new(),
        }
    }

    fn tracker(&self) -> MutexGuard<'_, NoteTracker> {
        self.tracker.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current game time in ticks.
    pub fn now(&self) -> u64 {
        self.game_time.load(Ordering::Acquire)
    }

    /// Step game time forward by one tick. Render loop only.
    pub(crate) fn tick(&self) -> u64 {
        self.game_time.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn advance_notes(&self, now: u64) -> Vec<NoteMove> {
        self.tracker().advance(now)
    }

    /// Judge a key press against the current game time.
    pub fn judge(&self, key: char) -> bool {
        let now = self.now();
        self.tracker().judge(now, key)
    }

    pub fn score(&self) -> u64 {
        self.tracker().score()
    }

    /// Run `f` with the tracker locked.
    pub fn with_tracker<T>(&self, f: impl FnOnce(&NoteTracker) -> T) -> T {
        f(&*self.tracker())
    }

    pub fn shutdown(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    pub fn request_shutdown(&self) {
        if self.shutdown.trigger() {
            debug!("Shutdown requested at tick {}", self.now());
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_shutdown()
    }
}

/// Raises the shutdown flag when dropped, including during a panic.
pub(crate) struct ShutdownOnDrop<'a>(pub(crate) &'a SessionState);

impl Drop for ShutdownOnDrop<'_> {
    fn drop(&mut self) {
        self.0.request_shutdown();
    }
}
