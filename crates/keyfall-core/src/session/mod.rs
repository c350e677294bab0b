//! Game session orchestration.
//!
//! A session owns the render sink for its whole lifetime and runs two
//! activities side by side: the [`RenderLoop`] on the calling thread and the
//! [`InputDispatcher`](crate::input::InputDispatcher) on a scoped thread.
//! The sink is shared behind a mutex, the note tracker behind another, and
//! no code path holds both at once.

mod game_loop;
mod state;

pub use game_loop::RenderLoop;
pub use state::SessionState;
pub(crate) use state::ShutdownOnDrop;

use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, error, info, warn};

use crate::chart::{Chart, ChartGenerator};
use crate::clock::GameClock;
use crate::config::GameConfig;
use crate::error::Result;
use crate::input::{EventSource, InputDispatcher};
use crate::render::RenderSink;
use crate::tracker::NoteTracker;

/// Outcome of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub score: u64,
    pub ticks: u64,
    pub notes: usize,
}

/// Owns the sink and releases it exactly once when dropped.
struct SinkGuard<S: RenderSink> {
    sink: Mutex<S>,
}

impl<S: RenderSink> SinkGuard<S> {
    fn new(sink: S) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    fn init(&self) -> Result<()> {
        self.sink.lock().unwrap_or_else(|e| e.into_inner()).init()
    }
}

impl<S: RenderSink> Drop for SinkGuard<S> {
    fn drop(&mut self) {
        let sink = self.sink.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = sink.shutdown() {
            warn!("Failed to release render sink: {}", e);
        }
    }
}

/// One play-through of a chart.
pub struct Session {
    config: GameConfig,
    state: Arc<SessionState>,
}

impl Session {
    /// Create a session with a freshly generated chart.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let chart =
            ChartGenerator::from_config(&config)?.generate(config.chart_length, &config.lanes)?;
        Self::with_chart(config, chart)
    }

    /// Create a session over a given chart.
    pub fn with_chart(config: GameConfig, chart: Chart) -> Result<Self> {
        config.validate()?;
        let tracker = NoteTracker::from_config(chart, &config);
        Ok(Self {
            config,
            state: Arc::new(SessionState::new(tracker)),
        })
    }

    /// Shared state handle, usable while [`Session::run`] is in progress.
    pub fn state(&self) -> Arc<SessionState> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Play until quit.
    ///
    /// Takes ownership of the sink, initializes it, and releases it exactly
    /// once on every exit path, including an init failure or a panic in
    /// either activity.
    pub fn run<S, C, E>(self, sink: S, mut clock: C, mut events: E) -> Result<SessionReport>
    where
        S: RenderSink,
        C: GameClock,
        E: EventSource,
    {
        let guard = SinkGuard::new(sink);
        guard.init()?;

        let state = &*self.state;
        let lanes = &self.config.lanes;
        let target_row = self.config.target_row;
        let notes = state.with_tracker(|tracker| tracker.len());
        info!("Session started with {} notes", notes);
        for lane in lanes {
            debug!("Lane {} at column {} ({})", lane.key, lane.column, lane.color.name());
        }

        let ticks = thread::scope(|scope| {
            let dispatcher = thread::Builder::new()
                .name("input".into())
                .spawn_scoped(scope, || {
                    InputDispatcher::new(state, lanes, &guard.sink, target_row).run(&mut events);
                });
            let dispatcher = match dispatcher {
                Ok(handle) => Some(handle),
                Err(e) => {
                    error!("Failed to start input thread: {}", e);
                    state.request_shutdown();
                    None
                }
            };

            let ticks = RenderLoop::new(state, lanes, &guard.sink, target_row).run(&mut clock);

            if let Some(handle) = dispatcher
                && handle.join().is_err()
            {
                error!("Input dispatcher panicked");
            }
            ticks
        });

        let report = SessionReport {
            score: state.score(),
            ticks,
            notes,
        };
        debug!("Session finished: {:?}", report);
        drop(guard);
        Ok(report)
    }
}
