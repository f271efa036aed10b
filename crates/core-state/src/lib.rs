//! Editor state primitives: modes, per-document vim state, the vim controller, and
//! line-ending metadata shared by the document and IO layers.
//!
//! The controller never touches document text. It owns exactly one [`VimState`] per open
//! document and a [`ModeIndicator`] presentation handle; document ownership and the
//! open/close lockstep live one layer up in `core-model::EditorSession`.

use std::fmt;

pub mod vim;
pub use vim::{VimController, VimState};

/// Current editor mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are commands accumulated into the command buffer.
    #[default]
    Normal,
    /// Keys reach the document as literal text.
    Insert,
}

impl Mode {
    /// Label used by the status line.
    pub const fn display_name(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Presentation target for the active document's mode and in-progress command.
pub trait ModeIndicator {
    fn update(&mut self, mode: Mode, pending: &str);
}

/// Indicator that discards updates (headless sessions, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIndicator;

impl ModeIndicator for NullIndicator {
    fn update(&mut self, _mode: Mode, _pending: &str) {}
}

/// Line ending style detected from a source file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Result of normalizing line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,         // LF-only content
    pub original: LineEnding,       // majority style
    pub had_trailing_newline: bool, // original trailing newline presence
    pub mixed: bool,                // true if multiple styles encountered
}

/// Detect and normalize line endings of `input` to LF-only internal representation.
/// Picks the majority style (ties resolved by precedence CRLF > LF > CR).
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let bytes = input.as_bytes();
    let mut i = 0usize;
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                crlf += 1;
                i += 2;
            }
            b'\r' => {
                cr += 1;
                i += 1;
            }
            b'\n' => {
                lf += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    let had_trailing_newline = input.ends_with('\n') || input.ends_with('\r');
    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let mixed = [crlf, lf, cr].iter().filter(|c| **c > 0).count() > 1;
    if crlf == 0 && cr == 0 {
        return NormalizedText {
            normalized: input.to_string(),
            original,
            had_trailing_newline,
            mixed,
        };
    }
    // Only '\r' is rewritten, so multi-byte UTF-8 sequences pass through untouched.
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    debug_assert!(!normalized.contains('\r'));
    NormalizedText {
        normalized,
        original,
        had_trailing_newline,
        mixed,
    }
}
