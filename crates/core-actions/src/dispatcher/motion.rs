//! Cursor motions. Horizontal motions are character offsets that wrap across lines; vertical
//! motions are line offsets keeping the visual column.

use core_keymap::{CommandAction, Direction};
use core_model::{CursorMotion, Document, TextSurface};

pub(super) fn counted(document: &mut Document, direction: Direction, count: u32) {
    let n = count as isize;
    let motion = match direction {
        Direction::Left => CursorMotion::Chars(-n),
        Direction::Right => CursorMotion::Chars(n),
        Direction::Up => CursorMotion::Lines(-n),
        Direction::Down => CursorMotion::Lines(n),
    };
    document.move_cursor(motion);
}

pub(super) fn jump(document: &mut Document, action: CommandAction) {
    let motion = match action {
        CommandAction::JumpLineStart => CursorMotion::LineStart,
        CommandAction::JumpLineEnd => CursorMotion::LineEnd,
        CommandAction::JumpDocumentStart => CursorMotion::DocumentStart,
        CommandAction::JumpDocumentEnd => CursorMotion::DocumentEnd,
        _ => return,
    };
    document.move_cursor(motion);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn horizontal_motion_wraps_lines() {
        let mut doc = Document::with_text("t", "ab\ncd");
        counted(&mut doc, Direction::Right, 3);
        assert_eq!(doc.cursor(), Position::new(1, 0));
        counted(&mut doc, Direction::Left, 1);
        assert_eq!(doc.cursor(), Position::new(0, 2));
    }

    #[test]
    fn oversized_counts_clamp() {
        let mut doc = Document::with_text("t", "ab\ncd\nef");
        counted(&mut doc, Direction::Down, 999_999);
        assert_eq!(doc.cursor().line, 2);
        counted(&mut doc, Direction::Left, 999_999);
        assert_eq!(doc.cursor(), Position::origin());
    }

    #[test]
    fn document_end_is_start_of_last_line() {
        let mut doc = Document::with_text("t", "one\ntwo\nthree");
        jump(&mut doc, CommandAction::JumpDocumentEnd);
        assert_eq!(doc.cursor(), Position::new(2, 0));
        jump(&mut doc, CommandAction::JumpLineEnd);
        assert_eq!(doc.cursor(), Position::new(2, 5));
        jump(&mut doc, CommandAction::JumpDocumentStart);
        assert_eq!(doc.cursor(), Position::origin());
    }
}
