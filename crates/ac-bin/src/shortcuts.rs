//! Host shortcuts. These are resolved before the modal interpreter and never reach it.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_model::EditorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostShortcut {
    NewDocument,
    Save,
    SaveAs,
    Open,
    NextDocument,
    PrevDocument,
    Quit,
}

impl HostShortcut {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if !key.mods.contains(KeyModifiers::CTRL) {
            return None;
        }
        if key.mods.contains(KeyModifiers::ALT) {
            return match key.code {
                KeyCode::Char('s' | 'S') => Some(HostShortcut::SaveAs),
                _ => None,
            };
        }
        let shortcut = match key.code {
            KeyCode::Char('n' | 'N') => HostShortcut::NewDocument,
            KeyCode::Char('s' | 'S') => HostShortcut::Save,
            KeyCode::Char('o' | 'O') => HostShortcut::Open,
            KeyCode::Char('q' | 'Q') => HostShortcut::Quit,
            KeyCode::Right => HostShortcut::NextDocument,
            KeyCode::Left => HostShortcut::PrevDocument,
            _ => return None,
        };
        Some(shortcut)
    }
}

/// Quitting with documents that have something to lose takes a second request in a row.
#[derive(Debug, Default)]
pub struct QuitGate {
    armed: bool,
}

impl QuitGate {
    /// `Ok` when the host may exit; otherwise the refusal message to show.
    pub fn request(&mut self, session: &EditorSession) -> Result<(), String> {
        let unsaved = session
            .documents()
            .iter()
            .filter(|d| d.needs_close_prompt())
            .count();
        if unsaved == 0 || self.armed {
            return Ok(());
        }
        self.armed = true;
        let noun = if unsaved == 1 { "document has" } else { "documents have" };
        Err(format!(
            "{unsaved} {noun} unsaved changes (quit again to discard)"
        ))
    }

    /// Any other input cancels a pending quit.
    pub fn disarm(&mut self) {
        self.armed = false;
    }
}
