//! A single open document: text, cursor, viewport origin, and file metadata.

use core_state::{LineEnding, normalize_line_endings};
use core_text::{Buffer, Position, motion};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Cursor requests understood by a [`TextSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    /// Relative character offset; negative moves backwards. Wraps across lines.
    Chars(isize),
    /// Relative line offset; negative moves up. Keeps the sticky column.
    Lines(isize),
    LineStart,
    LineEnd,
    DocumentStart,
    /// Start of the last line.
    DocumentEnd,
}

/// The cursor/text surface the interpreter drives. The interpreter reads and writes document
/// text only through this trait.
pub trait TextSurface {
    fn move_cursor(&mut self, motion: CursorMotion);
    fn cursor(&self) -> Position;
    fn text(&self) -> String;
    /// Insert at the cursor, leaving the cursor after the inserted text.
    fn insert_text(&mut self, text: &str);
}

#[derive(Clone)]
pub struct Document {
    buffer: Buffer,
    cursor: Position,
    sticky_col: Option<usize>,
    pub viewport_first_line: usize,
    pub name: String,
    pub path: Option<PathBuf>,
    /// Text changed since the last successful save.
    pub modified: bool,
    pub line_ending: LineEnding,
    pub had_trailing_newline: bool,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("modified", &self.modified)
            .field("cursor", &self.cursor)
            .field("len_bytes", &self.buffer.len_bytes())
            .finish()
    }
}

impl Document {
    /// Empty document with no backing file.
    pub fn untitled(name: impl Into<String>) -> Self {
        Self::with_text(name, "")
    }

    /// Document with initial text and no backing file.
    pub fn with_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            buffer: Buffer::new(text),
            cursor: Position::origin(),
            sticky_col: None,
            viewport_first_line: 0,
            name: name.into(),
            path: None,
            modified: false,
            line_ending: LineEnding::Lf,
            had_trailing_newline: false,
        }
    }

    /// Document backed by `path` holding already normalized (LF-only) text.
    pub fn from_file(
        path: impl Into<PathBuf>,
        normalized: &str,
        line_ending: LineEnding,
        had_trailing_newline: bool,
    ) -> Self {
        let path = path.into();
        let mut doc = Self::with_text(display_name(&path), normalized);
        doc.path = Some(path);
        doc.line_ending = line_ending;
        doc.had_trailing_newline = had_trailing_newline;
        doc
    }

    /// Read `path`, normalizing line endings to LF. The original style and the presence of a
    /// trailing newline are remembered for write-back; the trailing newline itself is not part
    /// of the in-memory text.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let norm = normalize_line_endings(&content);
        if norm.mixed {
            warn!(target: "io", path = %path.display(), chosen = ?norm.original, "mixed_line_endings");
        }
        let mut text = norm.normalized;
        if norm.had_trailing_newline {
            text.pop();
        }
        info!(target: "io", path = %path.display(), bytes = content.len(), "file_read");
        Ok(Self::from_file(
            path,
            &text,
            norm.original,
            norm.had_trailing_newline,
        ))
    }

    /// No file backs this document yet.
    pub fn is_unsaved(&self) -> bool {
        self.path.is_none()
    }

    /// Closing without `!` asks first when there is something to lose: unsaved edits, or an
    /// untitled document that holds any text.
    pub fn needs_close_prompt(&self) -> bool {
        self.modified || (self.is_unsaved() && !self.buffer.is_empty())
    }

    /// Attach (or re-attach) a backing file; the display name follows the path.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.name = display_name(&path);
        self.path = Some(path);
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Mutable access to the cursor for edit primitives; clears the sticky column.
    pub fn cursor_mut(&mut self) -> &mut Position {
        self.sticky_col = None;
        &mut self.cursor
    }

    /// Delete the grapheme before the cursor, joining lines at column 0.
    /// Returns false when the cursor is at the start of the document.
    pub fn delete_before_cursor(&mut self) -> bool {
        self.clamp_cursor();
        if self.cursor == Position::origin() {
            return false;
        }
        self.buffer.delete_grapheme_before(&mut self.cursor);
        self.sticky_col = None;
        true
    }

    /// Keep the cursor inside the vertical viewport of `text_height` rows.
    /// Returns true if the first visible line changed.
    pub fn auto_scroll(&mut self, text_height: usize) -> bool {
        match crate::compute_scroll_intent(
            self.viewport_first_line,
            self.cursor.line,
            text_height,
            0,
        ) {
            Some(first) => {
                self.viewport_first_line = first;
                true
            }
            None => false,
        }
    }

    fn clamp_cursor(&mut self) {
        let buffer = &self.buffer;
        self.cursor
            .clamp_to(buffer.line_count(), |l| buffer.line_byte_len(l));
    }
}

impl TextSurface for Document {
    fn move_cursor(&mut self, request: CursorMotion) {
        let buf = &self.buffer;
        let pos = &mut self.cursor;
        match request {
            CursorMotion::Lines(n) => {
                let count = n.unsigned_abs();
                self.sticky_col = if n < 0 {
                    motion::lines_up(buf, pos, count, self.sticky_col)
                } else {
                    motion::lines_down(buf, pos, count, self.sticky_col)
                };
                return;
            }
            CursorMotion::Chars(n) if n < 0 => motion::chars_backward(buf, pos, n.unsigned_abs()),
            CursorMotion::Chars(n) => motion::chars_forward(buf, pos, n.unsigned_abs()),
            CursorMotion::LineStart => motion::line_start(buf, pos),
            CursorMotion::LineEnd => motion::line_end(buf, pos),
            CursorMotion::DocumentStart => motion::document_start(buf, pos),
            CursorMotion::DocumentEnd => motion::document_end(buf, pos),
        }
        self.sticky_col = None;
        self.clamp_cursor();
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn text(&self) -> String {
        self.buffer.text()
    }

    fn insert_text(&mut self, text: &str) {
        self.clamp_cursor();
        self.buffer.insert_text(&mut self.cursor, text);
        self.sticky_col = None;
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn close_prompt_rules() {
        let mut doc = Document::untitled("New 1");
        assert!(!doc.needs_close_prompt());
        doc.insert_text("x");
        assert!(doc.needs_close_prompt(), "untitled with text prompts");

        let mut file = Document::from_file("/tmp/a.txt", "abc", LineEnding::Lf, false);
        assert!(!file.needs_close_prompt());
        file.modified = true;
        assert!(file.needs_close_prompt());
    }

    #[test]
    fn set_path_renames() {
        let mut doc = Document::untitled("New 3");
        doc.set_path("/some/dir/notes.md");
        assert_eq!(doc.name, "notes.md");
        assert!(!doc.is_unsaved());
    }

    #[test]
    fn surface_moves_and_inserts() {
        let mut doc = Document::with_text("t", "one\ntwo\nthree");
        doc.move_cursor(CursorMotion::Lines(2));
        assert_eq!(doc.cursor(), Position::new(2, 0));
        doc.move_cursor(CursorMotion::LineEnd);
        doc.insert_text("!");
        assert_eq!(doc.text(), "one\ntwo\nthree!");
        doc.move_cursor(CursorMotion::Chars(-7));
        assert_eq!(doc.cursor(), Position::new(1, 3));
        doc.move_cursor(CursorMotion::DocumentStart);
        assert_eq!(doc.cursor(), Position::origin());
    }

    #[test]
    fn delete_before_cursor_joins_lines() {
        let mut doc = Document::with_text("t", "ab\ncd");
        assert!(!doc.delete_before_cursor());
        doc.move_cursor(CursorMotion::Lines(1));
        assert!(doc.delete_before_cursor());
        assert_eq!(doc.text(), "abcd");
        assert_eq!(doc.cursor(), Position::new(0, 2));
    }

    #[test]
    fn load_strips_single_trailing_newline_and_remembers_style() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        std::fs::write(&path, "a\r\nb\r\n").unwrap();
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.text(), "a\nb");
        assert_eq!(doc.line_ending, LineEnding::Crlf);
        assert!(doc.had_trailing_newline);
        assert_eq!(doc.name, "crlf.txt");
        assert!(!doc.modified);
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Document::load(&dir.path().join("nope.txt")).is_err());
    }

    #[test]
    fn auto_scroll_follows_cursor() {
        let text = "l\n".repeat(50);
        let mut doc = Document::with_text("t", &text);
        doc.move_cursor(CursorMotion::Lines(30));
        assert!(doc.auto_scroll(10));
        assert_eq!(doc.viewport_first_line, 21);
        assert!(!doc.auto_scroll(10));
    }
}
