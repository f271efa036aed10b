//! File Action Provider: how file commands reach storage and prompts.

use crate::io_ops::write_document;
use core_model::Document;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of asking the user whether to save before closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Save,
    Discard,
    Cancel,
}

#[derive(Debug, thiserror::Error)]
pub enum FileActionError {
    #[error("no file name")]
    NoFilename,
    #[error("read from {path} failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write to {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persistence and prompting supplied by the host. The interpreter calls these by category
/// and never touches storage itself.
pub trait FileActionProvider {
    /// Write the document to its backing file. Marking it unmodified is the caller's job.
    fn save(&mut self, document: &mut Document) -> Result<(), FileActionError>;

    /// Asked only for a non-forced close of a document that needs a prompt.
    fn confirm_close(&mut self, document: &Document) -> CloseDecision;
}

/// Filesystem provider used by the terminal host. There is no modal dialog, so a close that
/// would need a prompt is refused with a message instead (`:q!` and `:wq` resolve it). A write
/// without a file name asks the host to open its save-as prompt.
#[derive(Debug, Default)]
pub struct FsFileActions {
    message: Option<String>,
    save_as_requested: bool,
}

impl FsFileActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Latest user-facing message, cleared on read.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    /// Whether a write failed for lack of a file name since the last call.
    pub fn take_save_as_request(&mut self) -> bool {
        std::mem::take(&mut self.save_as_requested)
    }

    /// Messages produced by one command are joined so an earlier one is not lost.
    fn report(&mut self, text: String) {
        self.message = Some(match self.message.take() {
            Some(previous) => format!("{previous}; {text}"),
            None => text,
        });
    }
}

impl FileActionProvider for FsFileActions {
    fn save(&mut self, document: &mut Document) -> Result<(), FileActionError> {
        match write_document(document) {
            Ok(bytes) => {
                self.report(format!("\"{}\" {bytes}B written", document.name));
                Ok(())
            }
            Err(e) => {
                let text = match &e {
                    FileActionError::NoFilename => {
                        self.save_as_requested = true;
                        "No file name".to_string()
                    }
                    FileActionError::Read { .. } | FileActionError::Io { .. } => {
                        format!("Write failed: {e}")
                    }
                };
                self.report(text);
                Err(e)
            }
        }
    }

    fn confirm_close(&mut self, document: &Document) -> CloseDecision {
        info!(target: "io", name = %document.name, "close_refused_unsaved_changes");
        self.report(format!(
            "\"{}\" has unsaved changes (use :wq or :q!)",
            document.name
        ));
        CloseDecision::Cancel
    }
}

pub(crate) fn log_save_error(name: &str, err: &FileActionError) {
    warn!(target: "io", name, error = %err, "save_failed");
}
