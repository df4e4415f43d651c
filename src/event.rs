//! Input/event collaborator seam
//!
//! Keys and the pipe spawn timer both arrive as [`InputEvent`]s through one
//! queue, drained in full before each simulation step.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Flap,
    Restart,
    /// Periodic spawn timer fired
    SpawnPipe,
}

pub trait EventSource {
    /// Append every event pending since the last call, in arrival order.
    /// `phase` lets a source map one physical key to different events.
    fn drain(&mut self, phase: Phase, out: &mut Vec<InputEvent>) -> io::Result<()>;
}

/// Translate a key press. Space and Up flap while playing and restart once
/// the game is over. Terminals without release reporting send a held key as
/// repeated presses, so holding Space through a restart flaps in the new game.
pub fn map_key(key: KeyEvent, phase: Phase) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Char(' ') | KeyCode::Up => Some(match phase {
            Phase::Playing => InputEvent::Flap,
            Phase::GameOver => InputEvent::Restart,
        }),
        KeyCode::Char('r') | KeyCode::Enter => Some(InputEvent::Restart),
        _ => None,
    }
}

/// Fires once per interval. A stall longer than one interval yields a single
/// event, then the schedule restarts from `now`.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval: Duration,
    next: Instant,
}

impl SpawnTimer {
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next: start + interval,
        }
    }

    /// Start a fresh schedule: the next event is one full interval after `now`
    pub fn reset(&mut self, now: Instant) {
        self.next = now + self.interval;
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }
}
