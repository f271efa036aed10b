//! Default text-widget handling for keys the interpreter lets through.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_model::{CursorMotion, Document, TextSurface};
use tracing::trace;

/// Apply the default behavior of `key` to `document`. Returns true if anything changed
/// (text or cursor). Text edits mark the document modified.
pub fn apply_default(document: &mut Document, key: &KeyEvent) -> bool {
    if key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
        return false;
    }
    let edited = match key.code {
        KeyCode::Char(c) => {
            let mut tmp = [0u8; 4];
            document.insert_text(c.encode_utf8(&mut tmp));
            true
        }
        KeyCode::Enter => {
            document.insert_text("\n");
            true
        }
        KeyCode::Tab => {
            document.insert_text("\t");
            true
        }
        KeyCode::Backspace => document.delete_before_cursor(),
        KeyCode::Left => return move_by(document, CursorMotion::Chars(-1)),
        KeyCode::Right => return move_by(document, CursorMotion::Chars(1)),
        KeyCode::Up => return move_by(document, CursorMotion::Lines(-1)),
        KeyCode::Down => return move_by(document, CursorMotion::Lines(1)),
        KeyCode::Esc => false,
    };
    if edited {
        document.modified = true;
        trace!(target: "input.dispatch", key = %key, "default_edit");
    }
    edited
}

fn move_by(document: &mut Document, motion: CursorMotion) -> bool {
    let before = document.cursor();
    document.move_cursor(motion);
    document.cursor() != before
}
