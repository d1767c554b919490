use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
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
            // Steering - arrow keys
            KeyCode::Up => KeyAction::Command(Command::SetDirection(Direction::Up)),
            KeyCode::Down => KeyAction::Command(Command::SetDirection(Direction::Down)),
            KeyCode::Left => KeyAction::Command(Command::SetDirection(Direction::Left)),
            KeyCode::Right => KeyAction::Command(Command::SetDirection(Direction::Right)),

            // Session controls
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char(' ') => {
                KeyAction::Command(Command::Play)
            }
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Command(Command::Pause),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Command(Command::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
