//! Single-line text editing shared by pages and overlays.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Applies an editing key to `value`. Returns true when the key was consumed.
///
/// Handles printable characters, Backspace and Ctrl+U (clear line).
pub fn apply_text_key(value: &mut String, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Backspace => {
            value.pop();
            true
        }
        KeyCode::Char('u') if ctrl => {
            value.clear();
            true
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            value.push(c);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_backspace() {
        let mut value = String::new();
        assert!(apply_text_key(&mut value, key(KeyCode::Char('ง'))));
        assert!(apply_text_key(&mut value, key(KeyCode::Char('x'))));
        assert!(apply_text_key(&mut value, key(KeyCode::Backspace)));
        assert_eq!(value, "ง");
    }

    #[test]
    fn control_chords_are_not_text() {
        let mut value = "abc".to_string();
        assert!(!apply_text_key(
            &mut value,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
        ));
        assert_eq!(value, "abc");
        assert!(apply_text_key(
            &mut value,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)
        ));
        assert!(value.is_empty());
    }

    #[test]
    fn navigation_keys_are_ignored() {
        let mut value = "abc".to_string();
        assert!(!apply_text_key(&mut value, key(KeyCode::Tab)));
        assert!(!apply_text_key(&mut value, key(KeyCode::Enter)));
    }
}
