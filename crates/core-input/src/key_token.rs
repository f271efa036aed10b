use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into an input event.
///
/// Returns `None` for releases and for key codes the editor has no use for (function keys,
/// media keys, lone modifiers).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<InputEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let mods = map_mods(event.modifiers);
    if mods.contains(KeyModifiers::CTRL) && matches!(event.code, CKeyCode::Char('c' | 'C')) {
        return Some(InputEvent::CtrlC);
    }
    let code = map_key_code(&event.code)?;
    Some(InputEvent::Key(KeyEvent::new(code, mods)))
}

pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        _ => return None,
    };
    Some(code)
}

pub(crate) fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
