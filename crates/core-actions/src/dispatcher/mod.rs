//! The modal dispatch loop.
//!
//! [`handle_key`] is the single entry point for keystrokes aimed at the active document. It
//! decides per key whether the interpreter consumes it (Normal-mode command input, control
//! keys in Normal mode) or lets it through to the default text handling in [`crate::edit`].
//!
//! Sub-modules:
//! * `motion`  - cursor movement commands
//! * `mode`    - Normal <-> Insert transitions
//! * `command` - file commands (`:w`, `:q`, `:wq`, `:q!`), plus save-as and open for the host
//!
//! The loop is synchronous and single-threaded. Every call leaves `documents.len() ==
//! vim.len()` because open/close only ever happen through `EditorSession`.

use crate::files::FileActionProvider;
use core_events::{KeyCode, KeyEvent};
use core_keymap::{CommandAction, is_grammar_key, match_file_command, match_keystroke};
use core_model::EditorSession;
use tracing::{debug, trace};

mod command;
mod mode;
mod motion;

pub use command::{open_file, save_as};

/// Result of handling a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The interpreter handled the key; the host must not apply default handling.
    pub consumed: bool,
    /// Something visible changed (mode, pending command, cursor, document set).
    pub dirty: bool,
}

impl DispatchResult {
    pub fn consumed() -> Self {
        Self {
            consumed: true,
            dirty: true,
        }
    }
    pub fn swallowed() -> Self {
        Self {
            consumed: true,
            dirty: false,
        }
    }
    pub fn pass_through() -> Self {
        Self {
            consumed: false,
            dirty: false,
        }
    }
}

/// Handle one key for the active document.
pub fn handle_key(
    session: &mut EditorSession,
    key: &KeyEvent,
    files: &mut dyn FileActionProvider,
) -> DispatchResult {
    session.ensure_document();
    let result = match key.code {
        KeyCode::Enter => handle_confirm(session, files),
        KeyCode::Esc => handle_cancel(session),
        KeyCode::Backspace => handle_erase(session),
        _ => match key.printable() {
            Some(c) => handle_char(session, c, files),
            None => DispatchResult::pass_through(),
        },
    };
    trace!(target: "input.dispatch", key = %key, consumed = result.consumed, "key_handled");
    result
}

/// Execute a resolved command against the active document.
pub fn execute(
    action: CommandAction,
    session: &mut EditorSession,
    files: &mut dyn FileActionProvider,
) {
    debug!(target: "input.dispatch", ?action, index = session.active_index(), "execute");
    match action {
        CommandAction::Motion { direction, count } => {
            motion::counted(session.active_document_mut(), direction, count)
        }
        CommandAction::JumpLineStart
        | CommandAction::JumpLineEnd
        | CommandAction::JumpDocumentStart
        | CommandAction::JumpDocumentEnd => motion::jump(session.active_document_mut(), action),
        CommandAction::EnterInsert => mode::enter_insert(session, false),
        CommandAction::EnterInsertAtLineEnd => mode::enter_insert(session, true),
        CommandAction::FileSave => {
            command::save(session, files);
        }
        CommandAction::FileClose { forced } => command::close(session, files, forced),
        CommandAction::FileSaveAndClose => {
            command::save(session, files);
            command::close(session, files, false);
        }
    }
}

fn handle_char(
    session: &mut EditorSession,
    c: char,
    files: &mut dyn FileActionProvider,
) -> DispatchResult {
    let index = session.active_index();
    if session.vim().in_insert(index) {
        if is_grammar_key(c) {
            session.active_document_mut().modified = true;
        }
        return DispatchResult::pass_through();
    }
    if !is_grammar_key(c) {
        trace!(target: "input.dispatch", index, "non_grammar_key_swallowed");
        return DispatchResult::swallowed();
    }

    session.append_buffer(c, index);
    let matched = match_keystroke(session.vim().current_command(index));
    if let Some(action) = matched {
        execute(action, session, files);
        session.reset_buffers(index);
    }
    session.update_display(index);
    DispatchResult::consumed()
}

fn handle_confirm(session: &mut EditorSession, files: &mut dyn FileActionProvider) -> DispatchResult {
    let index = session.active_index();
    if session.vim().in_insert(index) {
        return DispatchResult::pass_through();
    }

    let pending = session.vim().current_command(index).to_string();
    if let Some(action) = match_file_command(&pending) {
        if matches!(
            action,
            CommandAction::FileSave | CommandAction::FileSaveAndClose
        ) {
            session.reset_buffers(index);
        }
        execute(action, session, files);
    } else if let Some(action) = match_keystroke(&pending) {
        execute(action, session, files);
        session.reset_buffers(index);
    } else {
        trace!(target: "input.dispatch", index, len = pending.len(), "confirm_no_match");
    }
    session.refresh_indicator();
    DispatchResult::consumed()
}

fn handle_cancel(session: &mut EditorSession) -> DispatchResult {
    let index = session.active_index();
    session.switch_normal(index);
    session.reset_buffers(index);
    session.update_display(index);
    DispatchResult::consumed()
}

fn handle_erase(session: &mut EditorSession) -> DispatchResult {
    let index = session.active_index();
    if session.vim().in_insert(index) {
        return DispatchResult::pass_through();
    }
    session.delete_char(index);
    session.update_display(index);
    DispatchResult::consumed()
}
