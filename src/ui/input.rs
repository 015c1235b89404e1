use crate::ui::message::AppMessage;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Global keys, consulted after the active view passed on a key.
pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent) -> Option<AppMessage> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppMessage::Quit),
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => Some(AppMessage::Logout),
            (KeyCode::Char(' '), _) => Some(AppMessage::TogglePlayPause),
            (KeyCode::Char('n'), _) => Some(AppMessage::NextTrack),
            (KeyCode::Char('p'), _) => Some(AppMessage::PreviousTrack),
            (KeyCode::Char('+'), _) => Some(AppMessage::VolumeUp),
            (KeyCode::Char('='), _) => Some(AppMessage::VolumeUp),
            (KeyCode::Char('-'), _) => Some(AppMessage::VolumeDown),
            (KeyCode::Char('H'), _) => Some(AppMessage::SeekBackward),
            (KeyCode::Char('L'), _) => Some(AppMessage::SeekForward),
            (KeyCode::Char('r'), _) => Some(AppMessage::ToggleRepeat),
            (KeyCode::Char('s'), _) => Some(AppMessage::ToggleShuffle),
            (KeyCode::Char('m'), _) => Some(AppMessage::ToggleMute),
            (KeyCode::Char(c @ '0'..='9'), _) => {
                c.to_digit(10).map(|d| AppMessage::SeekToTenth(d as u8))
            }
            (KeyCode::Tab, _) => Some(AppMessage::NextSurface),
            (KeyCode::BackTab, _) => Some(AppMessage::PreviousSurface),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_seek_to_tenths() {
        assert_eq!(
            InputHandler::handle_key(key(KeyCode::Char('7'))),
            Some(AppMessage::SeekToTenth(7))
        );
        assert_eq!(
            InputHandler::handle_key(key(KeyCode::Char('0'))),
            Some(AppMessage::SeekToTenth(0))
        );
    }

    #[test]
    fn control_shortcuts() {
        let ctrl_l = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(InputHandler::handle_key(ctrl_l), Some(AppMessage::Logout));
        assert_eq!(
            InputHandler::handle_key(key(KeyCode::Char('L'))),
            Some(AppMessage::SeekForward)
        );
    }

    #[test]
    fn unbound_keys_pass() {
        assert_eq!(InputHandler::handle_key(key(KeyCode::Char('z'))), None);
    }
}
