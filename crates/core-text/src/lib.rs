//! Rope-based text buffer abstraction.
//!
//! This crate is the text half of the cursor/text surface: it stores document
//! text and knows how to move a [`Position`] around it. It has no notion of
//! modes, commands or documents.

use ropey::Rope;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

/// A position inside a buffer expressed as (line index, byte offset within that line).
/// Byte offsets are kept on grapheme boundaries by the motion and edit helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub byte: usize,
}

impl Position {
    pub fn new(line: usize, byte: usize) -> Self {
        Self { line, byte }
    }
    pub fn origin() -> Self {
        Self { line: 0, byte: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.byte = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.byte > max_len {
            self.byte = max_len;
        }
    }
}

pub mod motion;

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn new(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Total number of lines in the buffer (an empty buffer has one empty line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total byte length of the text.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Full text of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Line content without its trailing newline.
    pub fn line_content(&self, idx: usize) -> Option<String> {
        self.line(idx).map(|mut s| {
            if s.ends_with('\n') {
                s.pop();
            }
            s
        })
    }

    /// Byte length of a line (excluding any newline) for clamping purposes.
    pub fn line_byte_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        let len = line.len_bytes();
        if len > 0 && line.char(line.len_chars() - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn absolute_byte_index(&self, pos: &Position) -> usize {
        self.rope.line_to_byte(pos.line) + pos.byte
    }

    fn char_index(&self, pos: &Position) -> usize {
        self.rope.byte_to_char(self.absolute_byte_index(pos))
    }

    /// Insert a string (may be multi-byte, must not contain newlines) at the given position;
    /// advances position by its byte length.
    pub fn insert_grapheme(&mut self, pos: &mut Position, g: &str) {
        let char_index = self.char_index(pos);
        self.rope.insert(char_index, g);
        pos.byte += g.len();
    }

    /// Insert a newline at the given position, splitting the current line. Cursor moves to start of new line.
    pub fn insert_newline(&mut self, pos: &mut Position) {
        let char_index = self.char_index(pos);
        self.rope.insert(char_index, "\n");
        pos.line += 1;
        pos.byte = 0;
    }

    /// Insert arbitrary text (newlines allowed) at the position; the position ends up
    /// just after the inserted text.
    pub fn insert_text(&mut self, pos: &mut Position, text: &str) {
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.insert_newline(pos);
            }
            if !segment.is_empty() {
                self.insert_grapheme(pos, segment);
            }
        }
    }

    /// Delete the grapheme cluster before the position (like backspace). If at start of line and not first line, joins with previous.
    pub fn delete_grapheme_before(&mut self, pos: &mut Position) {
        if pos.line == 0 && pos.byte == 0 {
            return;
        }
        if pos.byte == 0 {
            // join with previous line: remove the newline at end of previous line
            let prev_line = pos.line - 1;
            let prev_len = self.line_byte_len(prev_line);
            let newline_byte = self.rope.line_to_byte(prev_line) + prev_len;
            let newline_char_index = self.rope.byte_to_char(newline_byte);
            self.rope.remove(newline_char_index..newline_char_index + 1);
            pos.line = prev_line;
            pos.byte = prev_len;
            return;
        }
        let line_str = self.line_content(pos.line).unwrap_or_default();
        let prev = grapheme::prev_boundary(&line_str, pos.byte);
        if prev == pos.byte {
            return;
        }
        let start_char = self.char_index(&Position::new(pos.line, prev));
        let end_char = self.char_index(pos);
        self.rope.remove(start_char..end_char);
        pos.byte = prev;
    }
}

/// Grapheme and width utilities. These are pure helpers operating on a single line.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;
    use unicode_width::UnicodeWidthStr;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Previous grapheme boundary (returns 0 if already at or below 1st boundary).
    pub fn prev_boundary(line: &str, byte: usize) -> usize {
        if byte == 0 || byte > line.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Next grapheme boundary (returns line.len() if at or beyond end).
    pub fn next_boundary(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        for (idx, _) in line.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        line.len()
    }

    /// Walk up to `count` clusters forward from `byte`. Returns the new offset and the number
    /// of clusters actually crossed (fewer than `count` when the line ends first).
    pub fn step_forward(line: &str, byte: usize, count: usize) -> (usize, usize) {
        let Some(rest) = line.get(byte..) else {
            return (line.len(), 0);
        };
        let mut at = byte;
        let mut taken = 0;
        for g in rest.graphemes(true).take(count) {
            at += g.len();
            taken += 1;
        }
        (at, taken)
    }

    /// Walk up to `count` clusters backward from `byte`. Returns the new offset and the number
    /// of clusters actually crossed.
    pub fn step_back(line: &str, byte: usize, count: usize) -> (usize, usize) {
        let Some(head) = line.get(..byte) else {
            return (prev_boundary(line, byte), 1);
        };
        let mut at = byte;
        let mut taken = 0;
        for (idx, _) in head.grapheme_indices(true).rev().take(count) {
            at = idx;
            taken += 1;
        }
        (at, taken)
    }

    /// Compute visual column (terminal cells) up to (but not including) byte offset.
    pub fn visual_col(line: &str, byte: usize) -> usize {
        let mut col = 0;
        for (idx, g) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            col += cluster_width(g);
        }
        col
    }

    /// Width in terminal cells of this grapheme cluster (never less than one cell so the
    /// cursor always has somewhere to sit).
    pub fn cluster_width(g: &str) -> usize {
        if g == "\t" {
            return 4;
        }
        g.width().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::grapheme;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::new("hello\nworld");
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "hello\n");
        assert_eq!(b.line(1).unwrap(), "world");
        assert_eq!(b.line_content(0).unwrap(), "hello");
        assert_eq!(b.line_byte_len(0), 5);
    }

    #[test]
    fn empty_buffer_has_one_line() {
        let b = Buffer::default();
        assert!(b.is_empty());
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line_byte_len(0), 0);
    }

    #[test]
    fn grapheme_combining_mark() {
        let s = "e\u{301}"; // 'e' + combining acute
        let nb = grapheme::next_boundary(s, 0);
        assert_eq!(nb, s.len());
        assert_eq!(grapheme::prev_boundary(s, nb), 0);
    }

    #[test]
    fn grapheme_cjk_is_wide() {
        let s = "\u{6f22}\u{5b57}";
        let first = grapheme::next_boundary(s, 0);
        assert_eq!(grapheme::visual_col(s, first), 2);
        assert_eq!(grapheme::prev_boundary(s, s.len()), first);
    }

    #[test]
    fn insert_grapheme_middle() {
        let mut b = Buffer::new("abc");
        let mut pos = Position::new(0, 1);
        b.insert_grapheme(&mut pos, "\u{1F600}");
        assert_eq!(b.line(0).unwrap(), "a\u{1F600}bc");
        assert_eq!(pos.byte, 1 + "\u{1F600}".len());
    }

    #[test]
    fn insert_newline_split() {
        let mut b = Buffer::new("abcd");
        let mut pos = Position::new(0, 2);
        b.insert_newline(&mut pos);
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "ab\n");
        assert_eq!(b.line(1).unwrap(), "cd");
        assert_eq!(pos, Position::new(1, 0));
    }

    #[test]
    fn insert_text_with_newlines_moves_past_it() {
        let mut b = Buffer::new("xy");
        let mut pos = Position::new(0, 1);
        b.insert_text(&mut pos, "1\n2");
        assert_eq!(b.text(), "x1\n2y");
        assert_eq!(pos, Position::new(1, 1));
    }

    #[test]
    fn delete_grapheme_before_join_lines() {
        let mut b = Buffer::new("ab\ncd");
        let mut pos = Position::new(1, 0);
        b.delete_grapheme_before(&mut pos);
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0).unwrap(), "abcd");
        assert_eq!(pos, Position::new(0, 2));
    }

    #[test]
    fn delete_grapheme_before_multibyte() {
        let mut b = Buffer::new("ab\u{1F600}c");
        let mut pos = Position::new(0, b.line_byte_len(0));
        b.delete_grapheme_before(&mut pos);
        b.delete_grapheme_before(&mut pos);
        assert_eq!(b.text(), "ab");
        assert_eq!(pos.byte, 2);
    }

    #[test]
    fn step_helpers_report_clusters_crossed() {
        let s = "ab\u{6f22}";
        assert_eq!(grapheme::step_forward(s, 1, 5), (s.len(), 2));
        assert_eq!(grapheme::step_forward(s, 0, 1), (1, 1));
        assert_eq!(grapheme::step_back(s, s.len(), 2), (1, 2));
        assert_eq!(grapheme::step_back(s, 1, 4), (0, 1));
        assert_eq!(grapheme::step_back(s, 0, 4), (0, 0));
    }
}
