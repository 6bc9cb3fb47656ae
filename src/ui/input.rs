/// Keyboard event tracker.
///
/// Drains all pending terminal events once per frame. The simulation
/// consumes at most one directional event per tick, so only the latest
/// direction key seen this frame is reported; Press and Repeat both count
/// (holding a key keeps requesting the same turn, which is harmless).

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::domain::geometry::Direction;

pub struct InputState {
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame, before the
    /// simulation tick.
    pub fn drain_events(&mut self) {
        self.raw_events.clear();
        while event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    self.raw_events.push(key);
                }
            }
        }
    }

    /// The latest direction key seen this frame, if any.
    pub fn requested_direction(&self) -> Option<Direction> {
        self.raw_events.iter().rev().find_map(|key| match key.code {
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(Direction::Right)
            }
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(Direction::Left)
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(Direction::Down)
            }
            _ => None,
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.raw_events.iter().any(|key| {
            matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
                || (key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')))
        })
    }
}
