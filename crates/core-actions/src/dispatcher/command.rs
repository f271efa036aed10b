//! File commands: `:w`, `:q`, `:wq`, `:q!`, and the host's save-as / open.
//!
//! Storage and prompting are delegated to the [`FileActionProvider`]; this module only
//! sequences them. A close always goes through `EditorSession::close`, which drops the
//! document and its vim state together.

use crate::files::{CloseDecision, FileActionError, FileActionProvider, log_save_error};
use core_model::EditorSession;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Save the active document; on success it is no longer modified. Returns whether the save
/// succeeded.
pub(super) fn save(session: &mut EditorSession, files: &mut dyn FileActionProvider) -> bool {
    let document = session.active_document_mut();
    match files.save(document) {
        Ok(()) => {
            document.modified = false;
            info!(target: "input.dispatch", name = %document.name, "document_saved");
            true
        }
        Err(e) => {
            log_save_error(&document.name, &e);
            false
        }
    }
}

/// Close the active document. Unless `forced`, a document with something to lose is put to
/// the provider's prompt first.
pub(super) fn close(
    session: &mut EditorSession,
    files: &mut dyn FileActionProvider,
    forced: bool,
) {
    let index = session.active_index();
    if !forced && session.active_document().needs_close_prompt() {
        match files.confirm_close(session.active_document()) {
            CloseDecision::Save => {
                if !save(session, files) {
                    return;
                }
            }
            CloseDecision::Discard => {}
            CloseDecision::Cancel => {
                info!(target: "input.dispatch", index, "close_cancelled");
                return;
            }
        }
    }
    session.close(index);
}

/// Give the active document a new backing file and save it there. If the save fails the
/// document keeps its previous path and name.
pub fn save_as(
    session: &mut EditorSession,
    files: &mut dyn FileActionProvider,
    path: PathBuf,
) -> bool {
    let document = session.active_document_mut();
    let previous = (document.path.clone(), document.name.clone());
    document.set_path(path);
    if save(session, files) {
        return true;
    }
    let document = session.active_document_mut();
    (document.path, document.name) = previous;
    false
}

/// Open `path` as a new active document.
pub fn open_file(session: &mut EditorSession, path: &Path) -> Result<usize, FileActionError> {
    session.open_path(path).map_err(|source| {
        error!(target: "io", path = %path.display(), error = %source, "file_open_error");
        FileActionError::Read {
            path: path.to_path_buf(),
            source,
        }
    })
}
