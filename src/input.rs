//! Keyboard commands for the viewer.
//!
//! | Key | Command |
//! |-----|---------|
//! | Space / Enter | toggle between scattered and tree |
//! | P | pause or resume the clock |
//! | Escape | quit |

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleMorph,
    TogglePause,
    Quit,
}

impl Command {
    /// The command bound to a physical key, if any.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter => Some(Command::ToggleMorph),
            KeyCode::KeyP => Some(Command::TogglePause),
            KeyCode::Escape => Some(Command::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(KeyCode::Space), Some(Command::ToggleMorph));
        assert_eq!(Command::from_key(KeyCode::Enter), Some(Command::ToggleMorph));
        assert_eq!(Command::from_key(KeyCode::KeyP), Some(Command::TogglePause));
        assert_eq!(Command::from_key(KeyCode::Escape), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::KeyW), None);
    }
}
