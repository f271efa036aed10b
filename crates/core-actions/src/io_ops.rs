//! Write-back of documents to disk.
//!
//! Reading lives with [`Document::load`](core_model::Document::load); this side reconstructs
//! the on-disk form: LF line breaks are re-expanded to the style the file was read with and the
//! trailing newline is restored if the file had one.

use crate::files::FileActionError;
use core_model::{Document, TextSurface};
use tracing::{error, info};

/// Serialize `document` with its remembered line ending and trailing newline.
pub fn serialize(document: &Document) -> String {
    let ending = document.line_ending.as_str();
    let text = document.text();
    let mut content = if ending == "\n" {
        text
    } else {
        text.replace('\n', ending)
    };
    if document.had_trailing_newline {
        content.push_str(ending);
    }
    content
}

/// Write `document` to its path. Returns the number of bytes written.
pub fn write_document(document: &Document) -> Result<usize, FileActionError> {
    let Some(path) = document.path.as_ref() else {
        error!(target: "io", name = %document.name, "write_no_filename");
        return Err(FileActionError::NoFilename);
    };
    let content = serialize(document);
    match std::fs::write(path, content.as_bytes()) {
        Ok(()) => {
            info!(target: "io", path = %path.display(), bytes = content.len(), "file_written");
            Ok(content.len())
        }
        Err(source) => {
            error!(target: "io", path = %path.display(), error = %source, "file_write_error");
            Err(FileActionError::Io {
                path: path.clone(),
                source,
            })
        }
    }
}
