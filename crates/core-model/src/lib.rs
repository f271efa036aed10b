//! High-level editor model: the open documents and their vim states, owned together.
//!
//! `EditorSession` is the single owner of both ordered collections. Every public call that
//! opens or closes a document mutates both in the same call, so the index alignment between
//! `documents[i]` and the controller's state `i` cannot drift. The controller itself is only
//! lent out immutably; per-document mutators are forwarded so no caller can add or drop a
//! state on its own.
//!
//! Core invariants (must hold after every public call):
//! * `documents.len() == vim.len()`.
//! * At least one document is open once `ensure_document` (or any open) has run; closing the
//!   last document opens a fresh untitled one.
//! * `active < documents.len()` whenever documents exist.

use core_state::{ModeIndicator, VimController};
use std::path::Path;
use tracing::{debug, info};

mod document;
pub use document::{CursorMotion, Document, TextSurface};

pub const DEFAULT_UNTITLED_PREFIX: &str = "New";

#[derive(Debug)]
pub struct EditorSession {
    documents: Vec<Document>,
    vim: VimController,
    active: usize,
    untitled_prefix: String,
}

impl EditorSession {
    /// Empty session; the host opens documents (or calls `ensure_document`) before dispatching.
    pub fn new(indicator: Box<dyn ModeIndicator>) -> Self {
        Self {
            documents: Vec::new(),
            vim: VimController::new(indicator),
            active: 0,
            untitled_prefix: DEFAULT_UNTITLED_PREFIX.to_string(),
        }
    }

    pub fn with_untitled_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.untitled_prefix = prefix.into();
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, index: usize) -> &Document {
        &self.documents[index]
    }

    pub fn document_mut(&mut self, index: usize) -> &mut Document {
        &mut self.documents[index]
    }

    pub fn active_document(&self) -> &Document {
        &self.documents[self.active]
    }

    pub fn active_document_mut(&mut self) -> &mut Document {
        &mut self.documents[self.active]
    }

    pub fn vim(&self) -> &VimController {
        &self.vim
    }

    /// Add `ch` to the pending command of the document at `index`.
    pub fn append_buffer(&mut self, ch: char, index: usize) {
        self.vim.append_buffer(ch, index);
    }

    pub fn reset_buffers(&mut self, index: usize) {
        self.vim.reset_buffers(index);
    }

    pub fn delete_char(&mut self, index: usize) {
        self.vim.delete_char(index);
    }

    pub fn switch_insert(&mut self, index: usize) {
        self.vim.switch_insert(index);
    }

    pub fn switch_normal(&mut self, index: usize) {
        self.vim.switch_normal(index);
    }

    pub fn update_display(&mut self, index: usize) {
        self.vim.update_display(index);
    }

    /// Append a document, create its vim state, and make it active. Returns its index.
    pub fn open(&mut self, document: Document) -> usize {
        info!(target: "session", name = %document.name, unsaved = document.is_unsaved(), "document_opened");
        self.documents.push(document);
        self.vim.new_buffer();
        self.check_lockstep();
        self.activate(self.documents.len() - 1);
        self.active
    }

    /// Open an empty document named `"<prefix> <n>"` with the lowest free `n`.
    pub fn open_untitled(&mut self) -> usize {
        let name = self.next_untitled_name();
        self.open(Document::untitled(name))
    }

    /// Read `path` into a new active document. On error the session is unchanged.
    pub fn open_path(&mut self, path: &Path) -> std::io::Result<usize> {
        let document = Document::load(path)?;
        Ok(self.open(document))
    }

    /// Open an untitled document if nothing is open.
    pub fn ensure_document(&mut self) {
        if self.documents.is_empty() {
            self.open_untitled();
        }
    }

    /// Close the document at `index` together with its vim state. Later documents shift down
    /// by one. Closing the last document opens a fresh untitled one.
    pub fn close(&mut self, index: usize) -> Document {
        assert!(
            index < self.documents.len(),
            "close index {index} out of range (len {})",
            self.documents.len()
        );
        let removed = self.documents.remove(index);
        self.vim.remove_buffer(index);
        self.check_lockstep();
        info!(target: "session", index, name = %removed.name, remaining = self.documents.len(), "document_closed");

        if self.documents.is_empty() {
            self.active = 0;
            self.open_untitled();
            return removed;
        }
        if index < self.active || self.active >= self.documents.len() {
            self.active -= 1;
        }
        self.activate(self.active);
        removed
    }

    /// Make `index` the active document and refresh the indicator for it.
    pub fn activate(&mut self, index: usize) {
        assert!(
            index < self.documents.len(),
            "activate index {index} out of range (len {})",
            self.documents.len()
        );
        self.active = index;
        self.vim.update_display(index);
        debug!(target: "session", index, "document_activated");
    }

    /// Cycle to the next document (wrapping).
    pub fn activate_next(&mut self) {
        if !self.documents.is_empty() {
            self.activate((self.active + 1) % self.documents.len());
        }
    }

    /// Cycle to the previous document (wrapping).
    pub fn activate_prev(&mut self) {
        if !self.documents.is_empty() {
            let len = self.documents.len();
            self.activate((self.active + len - 1) % len);
        }
    }

    /// Refresh the indicator for the active document.
    pub fn refresh_indicator(&mut self) {
        if !self.documents.is_empty() {
            self.vim.update_display(self.active);
        }
    }

    fn next_untitled_name(&self) -> String {
        let prefix = format!("{} ", self.untitled_prefix);
        let mut taken: Vec<u32> = self
            .documents
            .iter()
            .filter(|d| d.is_unsaved())
            .filter_map(|d| d.name.strip_prefix(&prefix)?.parse().ok())
            .collect();
        taken.sort_unstable();
        taken.dedup();
        let mut n = 1;
        for t in taken {
            if t != n {
                break;
            }
            n += 1;
        }
        format!("{prefix}{n}")
    }

    fn check_lockstep(&self) {
        debug_assert_eq!(
            self.documents.len(),
            self.vim.len(),
            "documents and vim states out of lockstep"
        );
    }
}

/// Compute the desired new first visible line to keep the cursor within the
/// vertical viewport subject to a top/bottom margin.
///
/// Returns Some(new_first) if a scroll is needed, else None when the cursor is
/// already within the permitted band.
pub fn compute_scroll_intent(
    first: usize,
    cursor_line: usize,
    text_height: usize,
    margin: usize,
) -> Option<usize> {
    if text_height == 0 {
        return None;
    }
    let m = margin.min(text_height / 2);
    let top = first;
    let bottom = first + text_height;
    if cursor_line < top + m {
        let new_first = cursor_line.saturating_sub(m);
        if new_first != first {
            return Some(new_first);
        }
    } else if cursor_line + m >= bottom {
        let new_first = cursor_line + m + 1 - text_height;
        if new_first != first {
            return Some(new_first);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{Mode, NullIndicator};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> EditorSession {
        EditorSession::new(Box::new(NullIndicator))
    }

    fn names(s: &EditorSession) -> Vec<String> {
        s.documents().iter().map(|d| d.name.clone()).collect()
    }

    #[test]
    fn untitled_names_fill_lowest_gap() {
        let mut s = session();
        s.open_untitled();
        s.open_untitled();
        s.open_untitled();
        assert_eq!(names(&s), vec!["New 1", "New 2", "New 3"]);
        s.close(1);
        s.open_untitled();
        assert_eq!(names(&s), vec!["New 1", "New 3", "New 2"]);
    }

    #[test]
    fn custom_prefix() {
        let mut s = session().with_untitled_prefix("Scratch");
        s.ensure_document();
        s.ensure_document();
        assert_eq!(names(&s), vec!["Scratch 1"]);
    }

    #[test]
    fn open_activates_newest() {
        let mut s = session();
        s.open_untitled();
        let idx = s.open(Document::with_text("b", "text"));
        assert_eq!(idx, 1);
        assert_eq!(s.active_index(), 1);
        assert_eq!(s.vim().len(), 2);
    }

    #[test]
    fn close_shifts_vim_states_with_documents() {
        let mut s = session();
        for _ in 0..3 {
            s.open_untitled();
        }
        s.switch_insert(2);
        s.close(1);
        assert_eq!(names(&s), vec!["New 1", "New 3"]);
        assert_eq!(s.vim().mode(1), Mode::Insert);
        assert_eq!(s.vim().mode(0), Mode::Normal);
    }

    #[test]
    fn command_mutators_touch_only_their_document() {
        let mut s = session();
        s.open_untitled();
        s.open_untitled();
        s.append_buffer('1', 0);
        s.append_buffer('2', 0);
        s.append_buffer('g', 1);
        s.delete_char(0);
        assert_eq!(s.vim().current_command(0), "1");
        assert_eq!(s.vim().current_command(1), "g");
        s.reset_buffers(1);
        assert_eq!(s.vim().current_command(1), "");
        s.switch_insert(0);
        assert_eq!(s.vim().current_command(0), "");
        s.switch_normal(0);
        assert_eq!(s.vim().mode(0), Mode::Normal);
        assert_eq!(s.vim().len(), s.len());
    }

    #[test]
    fn closing_last_document_opens_fresh_one() {
        let mut s = session();
        s.open(Document::with_text("only", "x"));
        let removed = s.close(0);
        assert_eq!(removed.name, "only");
        assert_eq!(names(&s), vec!["New 1"]);
        assert_eq!(s.vim().len(), 1);
        assert_eq!(s.active_index(), 0);
    }

    #[test]
    fn active_index_follows_close() {
        let mut s = session();
        for _ in 0..4 {
            s.open_untitled();
        }
        s.activate(2);
        s.close(0);
        assert_eq!(s.active_index(), 1, "active document keeps identity");
        assert_eq!(s.active_document().name, "New 3");
        s.close(2);
        assert_eq!(s.active_index(), 1);
        s.activate(1);
        s.close(1);
        assert_eq!(s.active_index(), 0);
    }

    #[test]
    fn cycling_wraps() {
        let mut s = session();
        for _ in 0..3 {
            s.open_untitled();
        }
        s.activate_next();
        assert_eq!(s.active_index(), 0);
        s.activate_prev();
        assert_eq!(s.active_index(), 2);
    }

    #[test]
    fn activation_refreshes_indicator_for_that_document() {
        #[derive(Clone, Default)]
        struct Last(Rc<RefCell<Option<(Mode, String)>>>);
        impl ModeIndicator for Last {
            fn update(&mut self, mode: Mode, pending: &str) {
                *self.0.borrow_mut() = Some((mode, pending.to_string()));
            }
        }
        let last = Last::default();
        let probe = last.0.clone();
        let mut s = EditorSession::new(Box::new(last));
        s.open_untitled();
        s.open_untitled();
        s.switch_insert(0);
        s.activate(0);
        assert_eq!(*probe.borrow(), Some((Mode::Insert, String::new())));
    }

    #[test]
    fn open_path_error_leaves_session_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        s.open_untitled();
        assert!(s.open_path(&dir.path().join("missing.txt")).is_err());
        assert_eq!(s.len(), 1);
        assert_eq!(s.vim().len(), 1);

        let path = dir.path().join("present.txt");
        std::fs::write(&path, "hello\n").unwrap();
        assert_eq!(s.open_path(&path).unwrap(), 1);
        assert_eq!(s.active_document().name, "present.txt");
        assert_eq!(s.vim().len(), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn close_out_of_range_panics() {
        let mut s = session();
        s.open_untitled();
        s.close(3);
    }

    #[test]
    fn scroll_intent_up_and_down() {
        assert_eq!(compute_scroll_intent(10, 5, 10, 0), Some(5));
        assert_eq!(compute_scroll_intent(0, 12, 10, 0), Some(3));
        assert_eq!(compute_scroll_intent(0, 4, 10, 0), None);
        assert_eq!(compute_scroll_intent(0, 4, 0, 0), None);
    }

    proptest! {
        #[test]
        fn lockstep_holds_for_any_open_close_sequence(
            ops in proptest::collection::vec(prop_oneof![Just(None), (0usize..6).prop_map(Some)], 1..60)
        ) {
            let mut s = session();
            s.ensure_document();
            for op in ops {
                match op {
                    None => { s.open_untitled(); }
                    Some(i) => { let i = i % s.len(); s.close(i); }
                }
                prop_assert_eq!(s.len(), s.vim().len());
                prop_assert!(s.len() >= 1);
                prop_assert!(s.active_index() < s.len());
            }
        }
    }
}
