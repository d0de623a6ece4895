//! Decodes `crossterm` key events into [`scriv_core::Key`]. Ctrl/Alt are
//! folded into the `Ctrl`/`Alt` variants rather than carried as separate
//! modifier flags, since the controller dispatches on them directly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use scriv_core::Key;

pub fn convert_key_event(event: KeyEvent) -> Key {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);

    match event.code {
        KeyCode::Char(ch) => {
            if ctrl {
                Key::Ctrl(ctrl_byte(ch))
            } else if alt {
                Key::Alt(ch as u8)
            } else if ch.is_ascii() {
                Key::Char(ch as u8)
            } else {
                Key::Codepoint(ch as u32)
            }
        }
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab if shift => Key::ShiftTab,
        KeyCode::Tab if ctrl && shift => Key::CtrlShiftTab,
        KeyCode::Tab if ctrl => Key::CtrlTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete if alt => Key::AltDelete,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Up if alt => Key::AltArrowUp,
        KeyCode::Down if alt => Key::AltArrowDown,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        _ => Key::Escape,
    }
}

/// `crossterm` reports `Ctrl-<letter>` as the plain char plus the CONTROL
/// modifier (possibly uppercased under shift); normalize to the lowercase
/// ASCII byte the controller matches on. `Ctrl-Space` maps to NUL.
fn ctrl_byte(ch: char) -> u8 {
    if ch == ' ' {
        return 0;
    }
    ch.to_ascii_lowercase() as u8
}

#[cfg(test)]
mod test {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent { code, modifiers, kind: KeyEventKind::Press, state: Default::default() }
    }

    #[test]
    fn ctrl_letter_normalizes_to_lowercase_byte() {
        let k = convert_key_event(key(KeyCode::Char('F'), KeyModifiers::CONTROL));
        assert_eq!(k, Key::Ctrl(b'f'));
    }

    #[test]
    fn ctrl_space_is_nul() {
        let k = convert_key_event(key(KeyCode::Char(' '), KeyModifiers::CONTROL));
        assert_eq!(k, Key::Ctrl(0));
    }

    #[test]
    fn plain_char_passes_through() {
        let k = convert_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(k, Key::Char(b'x'));
    }
}
