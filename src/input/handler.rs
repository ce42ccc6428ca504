use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Restart,
    /// Keep playing after a win
    Continue,
    ToggleAutoplay,
    TogglePause,
    /// Playback speed slot, 1 (slowest) to 4
    Speed(u8),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Move(Direction::Up),
            KeyCode::Down => KeyAction::Move(Direction::Down),
            KeyCode::Left => KeyAction::Move(Direction::Left),
            KeyCode::Right => KeyAction::Move(Direction::Right),

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => KeyAction::Move(Direction::Up),
                's' => KeyAction::Move(Direction::Down),
                'a' => KeyAction::Move(Direction::Left),
                'd' => KeyAction::Move(Direction::Right),
                'r' => KeyAction::Restart,
                'c' => KeyAction::Continue,
                'i' => KeyAction::ToggleAutoplay,
                ' ' => KeyAction::TogglePause,
                'q' => KeyAction::Quit,
                '1'..='4' => KeyAction::Speed(c as u8 - b'0'),
                _ => KeyAction::None,
            },

            KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
