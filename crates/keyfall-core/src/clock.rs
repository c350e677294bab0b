//! Game clock.
//!
//! The render loop blocks on [`GameClock::wait_tick`] between frames. Ticks
//! are scheduled on a fixed grid from the moment the clock starts. A consumer
//! that falls behind receives every overdue tick immediately on its next
//! waits: ticks queue up, nothing is dropped or coalesced.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::config::{input, timing};
use crate::shutdown::ShutdownSignal;

/// Source of simulation ticks.
pub trait GameClock: Send {
    /// Block until the next tick. Returns `false` once shutdown is requested.
    fn wait_tick(&mut self, shutdown: &ShutdownSignal) -> bool;
}

/// Wall-clock ticker with a fixed rate.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Duration,
    next: Instant,
}

impl IntervalClock {
    pub fn new(ticks_per_second: u32) -> Self {
        let interval = timing::tick_interval(ticks_per_second);
        Self {
            interval,
            next: Instant::now() + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl GameClock for IntervalClock {
    fn wait_tick(&mut self, shutdown: &ShutdownSignal) -> bool {
        loop {
            if shutdown.is_shutdown() {
                return false;
            }
            let now = Instant::now();
            if now >= self.next {
                self.next += self.interval;
                return true;
            }
            if shutdown.wait(self.next - now) {
                return false;
            }
        }
    }
}

/// Clock that only ticks when its [`ClockHandle`] says so.
pub struct ManualClock {
    ticks: Receiver<()>,
    frames: Sender<()>,
}

/// Test-side controller for a [`ManualClock`].
pub struct ClockHandle {
    ticks: Sender<()>,
    frames: Receiver<()>,
}

impl ManualClock {
    pub fn new() -> (Self, ClockHandle) {
        let (tick_tx, tick_rx) = mpsc::channel();
        let (frame_tx, frame_rx) = mpsc::channel();
        (
            Self {
                ticks: tick_rx,
                frames: frame_tx,
            },
            ClockHandle {
                ticks: tick_tx,
                frames: frame_rx,
            },
        )
    }
}

impl GameClock for ManualClock {
    fn wait_tick(&mut self, shutdown: &ShutdownSignal) -> bool {
        // The handle may already be gone; the loop then idles until shutdown.
        let _ = self.frames.send(());
        loop {
            if shutdown.is_shutdown() {
                return false;
            }
            match self.ticks.recv_timeout(input::POLL_TIMEOUT) {
                Ok(()) => return !shutdown.is_shutdown(),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if shutdown.wait(input::POLL_TIMEOUT) {
                        return false;
                    }
                }
            }
        }
    }
}

impl ClockHandle {
    /// Wait until the loop has finished a frame and is blocked on the clock.
    pub fn wait_frame(&self, timeout: Duration) -> bool {
        self.frames.recv_timeout(timeout).is_ok()
    }

    /// Release one tick.
    pub fn tick(&self) -> bool {
        self.ticks.send(()).is_ok()
    }
}
