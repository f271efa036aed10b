#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{
    CloseDecision, DispatchResult, FileActionError, FileActionProvider, edit, handle_key,
};
use core_events::{KeyCode, KeyEvent};
use core_model::{Document, EditorSession};
use core_state::NullIndicator;

/// Provider that records every call and answers prompts with a fixed decision.
pub struct RecordingFiles {
    pub decision: CloseDecision,
    pub saves: Vec<String>,
    pub prompts: Vec<String>,
    pub fail_saves: bool,
}

impl RecordingFiles {
    pub fn answering(decision: CloseDecision) -> Self {
        Self {
            decision,
            saves: Vec::new(),
            prompts: Vec::new(),
            fail_saves: false,
        }
    }
}

impl FileActionProvider for RecordingFiles {
    fn save(&mut self, document: &mut Document) -> Result<(), FileActionError> {
        self.saves.push(document.name.clone());
        if self.fail_saves {
            Err(FileActionError::NoFilename)
        } else {
            Ok(())
        }
    }

    fn confirm_close(&mut self, document: &Document) -> CloseDecision {
        self.prompts.push(document.name.clone());
        self.decision
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Stroke {
    Char(char),
    Esc,
    Enter,
    Backspace,
}

impl Stroke {
    pub fn to_event(self) -> KeyEvent {
        match self {
            Stroke::Char(c) => KeyEvent::char(c),
            Stroke::Esc => KeyEvent::plain(KeyCode::Esc),
            Stroke::Enter => KeyEvent::plain(KeyCode::Enter),
            Stroke::Backspace => KeyEvent::plain(KeyCode::Backspace),
        }
    }
}

pub fn session() -> EditorSession {
    EditorSession::new(Box::new(NullIndicator))
}

/// Deliver one key the way the host does: interpreter first, default text handling if the
/// interpreter lets it through.
pub fn press(
    session: &mut EditorSession,
    stroke: Stroke,
    files: &mut dyn FileActionProvider,
) -> DispatchResult {
    let key = stroke.to_event();
    let result = handle_key(session, &key, files);
    if !result.consumed {
        edit::apply_default(session.active_document_mut(), &key);
    }
    result
}

/// Type every char of `text` as a plain key.
pub fn type_str(session: &mut EditorSession, text: &str, files: &mut dyn FileActionProvider) {
    for c in text.chars() {
        press(session, Stroke::Char(c), files);
    }
}

/// `n` lines named `line0`..`line{n-1}`.
pub fn numbered_lines(n: usize) -> String {
    (0..n)
        .map(|i| format!("line{i}"))
        .collect::<Vec<_>>()
        .join("\n")
}
