//! Per-document vim state and the controller owning one state per open document.
//!
//! Invariants (must hold whenever control returns to the event loop):
//! * `VimController::len()` equals the number of open documents; the owner performs
//!   `new_buffer` / `remove_buffer` in the same call that opens / closes a document.
//! * A command buffer is non-empty only in Normal mode. Entering Insert always clears it.
//! * Index arguments are positions in the host's document ordering. An out-of-range index
//!   means the two orderings diverged and is treated as a programming fault (panic).

use crate::{Mode, ModeIndicator};
use tracing::{debug, trace};

/// Mode and in-progress command for a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VimState {
    mode: Mode,
    buffer: String,
}

impl VimState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Command typed so far (empty when nothing is pending).
    pub fn command(&self) -> &str {
        &self.buffer
    }

    fn push(&mut self, ch: char) {
        debug_assert!(
            matches!(self.mode, Mode::Normal),
            "command characters are only accumulated in Normal mode"
        );
        self.buffer.push(ch);
    }

    fn pop(&mut self) {
        self.buffer.pop();
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn enter_insert(&mut self) {
        self.mode = Mode::Insert;
        self.buffer.clear();
    }

    fn enter_normal(&mut self) {
        self.mode = Mode::Normal;
    }
}

/// Ordered collection of [`VimState`]s, index-aligned with the open documents, plus the
/// presentation handle used to show the active document's mode and pending command.
pub struct VimController {
    states: Vec<VimState>,
    indicator: Box<dyn ModeIndicator>,
}

impl std::fmt::Debug for VimController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VimController")
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}

impl VimController {
    pub fn new(indicator: Box<dyn ModeIndicator>) -> Self {
        Self {
            states: Vec::new(),
            indicator,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Borrow the state at `index`.
    pub fn state(&self, index: usize) -> &VimState {
        self.at(index)
    }

    /// Append a fresh state (Normal mode, empty command) for a newly opened document.
    pub fn new_buffer(&mut self) {
        self.states.push(VimState::new());
        debug!(target: "state.vim", count = self.states.len(), "vim_state_created");
    }

    /// Drop the state of a closed document; later states shift down by one.
    pub fn remove_buffer(&mut self, index: usize) {
        assert!(
            index < self.states.len(),
            "remove_buffer index {index} out of range (len {}); vim states desynchronized from documents",
            self.states.len()
        );
        self.states.remove(index);
        debug!(target: "state.vim", index, count = self.states.len(), "vim_state_removed");
    }

    pub fn append_buffer(&mut self, ch: char, index: usize) {
        let state = self.at_mut(index);
        state.push(ch);
        trace!(target: "state.vim", index, len = state.buffer.len(), "command_char_appended");
    }

    pub fn reset_buffers(&mut self, index: usize) {
        self.at_mut(index).clear();
    }

    pub fn switch_insert(&mut self, index: usize) {
        let state = self.at_mut(index);
        if !state.buffer.is_empty() {
            trace!(target: "state.vim", index, abandoned = state.buffer.len(), "pending_command_abandoned");
        }
        state.enter_insert();
        debug!(target: "state.vim", index, mode = %Mode::Insert, "mode_switch");
    }

    pub fn switch_normal(&mut self, index: usize) {
        self.at_mut(index).enter_normal();
        debug!(target: "state.vim", index, mode = %Mode::Normal, "mode_switch");
    }

    pub fn in_insert(&self, index: usize) -> bool {
        matches!(self.at(index).mode, Mode::Insert)
    }

    pub fn in_normal(&self, index: usize) -> bool {
        matches!(self.at(index).mode, Mode::Normal)
    }

    pub fn mode(&self, index: usize) -> Mode {
        self.at(index).mode
    }

    pub fn current_command(&self, index: usize) -> &str {
        &self.at(index).buffer
    }

    /// Remove the last command character (erase key in Normal mode). No-op on an empty command.
    pub fn delete_char(&mut self, index: usize) {
        self.at_mut(index).pop();
    }

    /// Push the mode and pending command of the document at `index` to the indicator.
    /// Callers pass the active document's index.
    pub fn update_display(&mut self, index: usize) {
        let state = &self.states[index];
        self.indicator.update(state.mode, &state.buffer);
    }

    fn at(&self, index: usize) -> &VimState {
        &self.states[index]
    }

    fn at_mut(&mut self, index: usize) -> &mut VimState {
        &mut self.states[index]
    }
}
