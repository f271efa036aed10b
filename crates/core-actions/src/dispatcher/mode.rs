//! Normal -> Insert transitions. Leaving Insert is the cancel key's job (see `handle_cancel`).

use core_model::{CursorMotion, EditorSession, TextSurface};

/// Enter Insert mode on the active document, optionally moving to the end of the line first.
/// Any pending command is abandoned.
pub(super) fn enter_insert(session: &mut EditorSession, at_line_end: bool) {
    let index = session.active_index();
    if at_line_end {
        session.active_document_mut().move_cursor(CursorMotion::LineEnd);
    }
    session.switch_insert(index);
}
