//! Core event types for acedit.
//!
//! Everything the host delivers to the interpreter travels as an [`Event`]
//! over a single bounded channel and is handled strictly in arrival order.

use std::fmt;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// One producer (input task) and one consumer (event loop). The producer awaits channel capacity
// instead of dropping keys: every keystroke matters to the command buffer, so lossy strategies are
// not acceptable here.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 8192;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Interrupt (Ctrl-C) surfaced distinctly so the host can shut down without routing it
    /// through the key dispatcher.
    CtrlC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key press.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Unmodified printable character.
    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    /// Printable character carried by this event, if any. Shift does not disqualify a
    /// character (`A`, `G`, `$`, `^` all arrive shifted); Ctrl and Alt do.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                Some(c)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// KeyCode enumerates normalized logical key representations consumed by higher layers.
/// Printable keys (including ':' and '!') always arrive as `Char`.
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifted_chars_stay_printable() {
        let dollar = KeyEvent::new(KeyCode::Char('$'), KeyModifiers::SHIFT);
        assert_eq!(dollar.printable(), Some('$'));
        assert_eq!(KeyEvent::char('j').printable(), Some('j'));
    }

    #[test]
    fn ctrl_and_alt_chars_are_not_printable() {
        assert_eq!(KeyEvent::ctrl('s').printable(), None);
        let alt = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(alt.printable(), None);
        assert_eq!(KeyEvent::plain(KeyCode::Enter).printable(), None);
    }
}
