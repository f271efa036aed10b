//! Cursor motion helpers.
//!
//! These operate purely on a `Buffer` + `Position` pair and are free of editor state.
//! Horizontal motions count grapheme clusters and treat a line break as one step, so a
//! character motion may wrap onto the neighbouring line. Vertical motions keep a sticky
//! visual column across successive moves.

use crate::{Buffer, Position, grapheme};

/// Move back `count` characters, wrapping onto previous lines. Stops at the document start.
/// Each visited line is fetched and scanned once, so the cost is bounded by the text walked.
pub fn chars_backward(buf: &Buffer, pos: &mut Position, count: usize) {
    clamp(buf, pos);
    let mut remaining = count;
    while remaining > 0 {
        let content = buf.line_content(pos.line).unwrap_or_default();
        let (byte, taken) = grapheme::step_back(&content, pos.byte, remaining);
        pos.byte = byte;
        remaining -= taken;
        if remaining == 0 || pos.line == 0 {
            return;
        }
        // The line break counts as one step.
        pos.line -= 1;
        pos.byte = buf.line_byte_len(pos.line);
        remaining -= 1;
    }
}

/// Move forward `count` characters, wrapping onto following lines. Stops at the document end.
pub fn chars_forward(buf: &Buffer, pos: &mut Position, count: usize) {
    clamp(buf, pos);
    let last_line = buf.line_count().saturating_sub(1);
    let mut remaining = count;
    while remaining > 0 {
        let content = buf.line_content(pos.line).unwrap_or_default();
        let (byte, taken) = grapheme::step_forward(&content, pos.byte, remaining);
        pos.byte = byte;
        remaining -= taken;
        if remaining == 0 || pos.line >= last_line {
            return;
        }
        pos.line += 1;
        pos.byte = 0;
        remaining -= 1;
    }
}

/// Move up `count` lines preserving a target visual column (sticky). Returns the updated sticky
/// column; callers keep it across successive vertical motions.
pub fn lines_up(
    buf: &Buffer,
    pos: &mut Position,
    count: usize,
    sticky_col: Option<usize>,
) -> Option<usize> {
    clamp(buf, pos);
    let target = pos.line.saturating_sub(count);
    move_to_line(buf, pos, target, sticky_col)
}

/// Move down `count` lines preserving sticky visual column. Clamps at the last line.
pub fn lines_down(
    buf: &Buffer,
    pos: &mut Position,
    count: usize,
    sticky_col: Option<usize>,
) -> Option<usize> {
    clamp(buf, pos);
    let last_line = buf.line_count().saturating_sub(1);
    let target = pos.line.saturating_add(count).min(last_line);
    move_to_line(buf, pos, target, sticky_col)
}

fn move_to_line(
    buf: &Buffer,
    pos: &mut Position,
    target: usize,
    sticky_col: Option<usize>,
) -> Option<usize> {
    let col = sticky_col.unwrap_or_else(|| {
        let content = buf.line_content(pos.line).unwrap_or_default();
        grapheme::visual_col(&content, pos.byte)
    });
    pos.line = target;
    pos.byte = byte_for_visual_col(buf, target, col);
    Some(col)
}

/// Move to start of line.
pub fn line_start(_buf: &Buffer, pos: &mut Position) {
    pos.byte = 0;
}

/// Move to end of line (after last grapheme).
pub fn line_end(buf: &Buffer, pos: &mut Position) {
    pos.byte = buf.line_byte_len(pos.line);
}

/// Move to the first position of the document.
pub fn document_start(_buf: &Buffer, pos: &mut Position) {
    *pos = Position::origin();
}

/// Move to the start of the last line of the document.
pub fn document_end(buf: &Buffer, pos: &mut Position) {
    pos.line = buf.line_count().saturating_sub(1);
    pos.byte = 0;
}

fn clamp(buf: &Buffer, pos: &mut Position) {
    pos.clamp_to(buf.line_count(), |l| buf.line_byte_len(l));
}

/// Convert a target visual column into a byte offset on a given line, clamping to line end.
fn byte_for_visual_col(buf: &Buffer, line: usize, target_col: usize) -> usize {
    let Some(content) = buf.line_content(line) else {
        return 0;
    };
    let mut col = 0;
    let mut byte = 0;
    for g in grapheme::iter(&content) {
        let w = grapheme::cluster_width(g);
        if col + w > target_col {
            return byte;
        }
        col += w;
        byte += g.len();
    }
    byte
}
