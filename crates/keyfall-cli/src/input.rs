//! crossterm event source.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keyfall_core::{EventSource, InputEvent, Result};

/// Reads key and resize events from the terminal.
pub struct TerminalEvents;

/// Map a terminal event to a game input event.
///
/// Only key presses count; repeats and releases are dropped. Esc and Ctrl-C
/// quit.
pub fn translate(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Esc => Some(InputEvent::Quit),
            KeyCode::Char('c') | KeyCode::Char('C')
                if modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(InputEvent::Quit)
            }
            KeyCode::Char(c) => Some(InputEvent::KeyPress(c)),
            _ => None,
        },
        Event::Resize(columns, rows) => Some(InputEvent::Resize { columns, rows }),
        _ => None,
    }
}

impl EventSource for TerminalEvents {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(translate(event::read()?))
    }
}
