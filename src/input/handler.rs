use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, TickInput};

/// Most tick events held at once; extra key presses are dropped
pub const MAX_BUFFERED_TICKS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    TogglePause,
    ToggleHelp,
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::Right),

            // Controls
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') | KeyCode::Esc => {
                KeyAction::TogglePause
            }
            KeyCode::Char('h') | KeyCode::Char('H') => KeyAction::ToggleHelp,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('n') | KeyCode::Char('N') => {
                KeyAction::Restart
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Key presses waiting for the next ticks, one tick event each.
///
/// Keys arrive faster than ticks; queueing them keeps a quick
/// down-then-left from collapsing into just "left".
#[derive(Debug, Default)]
pub struct InputBuffer {
    pending: VecDeque<TickInput>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a game-relevant action. Returns false if it was not queued.
    pub fn push(&mut self, action: KeyAction) -> bool {
        let input = match action {
            KeyAction::Turn(direction) => TickInput::from(direction),
            KeyAction::TogglePause => TickInput::pause(),
            _ => return false,
        };

        // Holding an arrow repeats it; one copy is enough. Pause presses all
        // count, each one flips the state.
        let repeated_turn =
            matches!(action, KeyAction::Turn(_)) && self.pending.back() == Some(&input);
        if repeated_turn || self.pending.len() >= MAX_BUFFERED_TICKS {
            return false;
        }
        self.pending.push_back(input);
        true
    }

    /// The input for the coming tick; empty if nothing is queued
    pub fn next_tick(&mut self) -> TickInput {
        self.pending.pop_front().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
