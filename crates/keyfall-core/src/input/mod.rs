//! Player input.
//!
//! Events arrive through an [`EventSource`] and are handled on their own
//! thread by the [`InputDispatcher`].

mod dispatcher;

pub use dispatcher::InputDispatcher;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::error::{Error, Result};

/// Everything the dispatcher reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable key was pressed.
    KeyPress(char),
    /// The terminal changed size.
    Resize { columns: u16, rows: u16 },
    /// Escape or interrupt.
    Quit,
}

/// Blocking source of input events.
pub trait EventSource: Send {
    /// Wait up to `timeout` for the next event.
    ///
    /// `Ok(None)` means nothing arrived in time. An error ends the session.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>>;
}

/// Event source fed from another thread through a channel.
pub struct ChannelEventSource {
    events: Receiver<InputEvent>,
}

impl ChannelEventSource {
    pub fn new() -> (Sender<InputEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { events: rx })
    }
}

impl EventSource for ChannelEventSource {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::InputClosed),
        }
    }
}
