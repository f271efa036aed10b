//! Full-frame composition from the editor session.

use crate::status::{StatusContext, build_status};
use crate::writer::Writer;
use crate::{CellFlags, Frame, IndicatorState};
use anyhow::Result;
use core_model::{EditorSession, TextSurface};
use core_text::grapheme;
use std::io::Write;
use tracing::trace;

/// Everything besides the session that the frame depends on.
pub struct FrameInput<'a> {
    pub width: u16,
    pub height: u16,
    pub indicator: &'a IndicatorState,
    pub show_pending: bool,
    pub message: Option<&'a str>,
    /// Open host prompt; replaces the status line while present.
    pub prompt: Option<&'a str>,
}

/// Rows available for document text in a terminal of `height` rows.
pub fn text_rows(height: u16) -> usize {
    height.saturating_sub(2) as usize
}

/// Build the frame. Scrolls the active document's viewport to keep the cursor visible.
pub fn build_frame(session: &mut EditorSession, input: &FrameInput<'_>) -> Frame {
    let mut frame = Frame::new(input.width, input.height);
    if input.width == 0 || input.height < 2 || session.is_empty() {
        return frame;
    }
    draw_tabs(&mut frame, session);

    let rows = text_rows(input.height);
    let document = session.active_document_mut();
    document.auto_scroll(rows);
    let first = document.viewport_first_line;
    let cursor = document.cursor();
    let buffer = document.buffer();
    for row in 0..rows {
        let Some(line) = buffer.line_content(first + row) else {
            break;
        };
        let y = (row + 1) as u16;
        let mut x = 0u16;
        let mut byte = 0usize;
        for g in grapheme::iter(&line) {
            if x >= input.width {
                break;
            }
            let w = grapheme::cluster_width(g) as u16;
            let flags = if first + row == cursor.line && byte == cursor.byte {
                CellFlags::REVERSE | CellFlags::CURSOR
            } else {
                CellFlags::empty()
            };
            if g == "\t" {
                for dx in 0..w {
                    let f = if dx == 0 { flags } else { CellFlags::empty() };
                    frame.set_cluster(x + dx, y, " ", 1, f);
                }
            } else {
                frame.set_cluster(x, y, g, w, flags);
            }
            x = x.saturating_add(w);
            byte += g.len();
        }
    }

    // Cursor past the last cluster (line end, empty line).
    let cursor_row = cursor.line.wrapping_sub(first);
    if cursor_row < rows {
        let line = buffer.line_content(cursor.line).unwrap_or_default();
        if cursor.byte >= line.len() {
            let col = grapheme::visual_col(&line, cursor.byte) as u16;
            frame.apply_flags_span(col, (cursor_row + 1) as u16, 1, CellFlags::REVERSE | CellFlags::CURSOR);
        }
    }

    let status_row = input.height - 1;
    if let Some(prompt) = input.prompt {
        let end = draw_text(&mut frame, 0, status_row, prompt, CellFlags::empty());
        frame.apply_flags_span(end, status_row, 1, CellFlags::REVERSE | CellFlags::CURSOR);
        return frame;
    }

    let line = buffer.line_content(cursor.line).unwrap_or_default();
    let status = build_status(&StatusContext {
        mode: input.indicator.mode,
        pending: &input.indicator.pending,
        show_pending: input.show_pending,
        name: &document.name,
        modified: document.modified,
        line: cursor.line,
        col: grapheme::visual_col(&line, cursor.byte),
        message: input.message,
    });
    draw_text_row(&mut frame, status_row, &status, CellFlags::REVERSE);
    frame.apply_flags_span(0, status_row, input.width, CellFlags::REVERSE);
    frame
}

fn draw_tabs(frame: &mut Frame, session: &EditorSession) {
    let active = session.active_index();
    let mut x = 0u16;
    for (i, doc) in session.documents().iter().enumerate() {
        let label = format!(" {}{} ", doc.name, if doc.modified { "*" } else { "" });
        let flags = if i == active {
            CellFlags::REVERSE
        } else {
            CellFlags::empty()
        };
        x = draw_text(frame, x, 0, &label, flags);
        if x >= frame.width {
            break;
        }
        x = draw_text(frame, x, 0, "|", CellFlags::empty());
    }
}

fn draw_text_row(frame: &mut Frame, y: u16, text: &str, flags: CellFlags) {
    draw_text(frame, 0, y, text, flags);
}

fn draw_text(frame: &mut Frame, mut x: u16, y: u16, text: &str, flags: CellFlags) -> u16 {
    for g in grapheme::iter(text) {
        if x >= frame.width {
            break;
        }
        let w = grapheme::cluster_width(g) as u16;
        frame.set_cluster(x, y, g, w, flags);
        x = x.saturating_add(w);
    }
    x
}

/// Translate a frame into writer commands (row-major, one MoveTo per row).
pub fn emit(frame: &Frame, writer: &mut Writer) {
    for y in 0..frame.height {
        writer.move_to(0, y);
        writer.clear_line();
        let mut reversed = false;
        let mut run = String::new();
        for (cluster, _, flags, _) in frame.row_leaders(y) {
            let want = flags.contains(CellFlags::REVERSE);
            if want != reversed {
                writer.print(std::mem::take(&mut run));
                writer.reverse(want);
                reversed = want;
            }
            run.push_str(cluster);
        }
        writer.print(run);
        if reversed {
            writer.reverse(false);
        }
    }
}

/// Compose and draw a full frame to `out`.
pub fn render<W: Write>(
    session: &mut EditorSession,
    input: &FrameInput<'_>,
    out: &mut W,
) -> Result<()> {
    let frame = build_frame(session, input);
    let mut writer = Writer::new();
    emit(&frame, &mut writer);
    trace!(target: "render", width = input.width, height = input.height, "frame_rendered");
    writer.flush_to(out)
}
