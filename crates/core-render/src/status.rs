//! Status line composition.
//!
//! Format: `-- MODE -- <pending>  <name>[*]  Ln X, Col Y  <message>`
//! * `<pending>` is the in-progress command buffer, shown only when enabled and non-empty.
//! * `<name>` is the document's display name; `*` appears only when it is modified.
//! * `<message>` is the current host message (save results, refused closes), if any.
//!
//! Two stages: `compose_status` produces ordered `StatusSegment`s, `format_status` renders
//! them.

use core_state::Mode;
use std::fmt::Write as _;

/// What we need to render a status line.
pub struct StatusContext<'a> {
    pub mode: Mode,
    pub pending: &'a str,
    pub show_pending: bool,
    pub name: &'a str,
    pub modified: bool,
    pub line: usize, // 0-based current line index
    pub col: usize,  // 0-based visual column
    pub message: Option<&'a str>,
}

/// Discrete status line segments (order-sensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Mode(&'static str),
    Pending(&'a str),
    FileName { name: &'a str, modified: bool },
    /// 1-based cursor line & column for display.
    Position { line_1: usize, col_1: usize },
    Message(&'a str),
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(5);
    out.push(StatusSegment::Mode(ctx.mode.display_name()));
    if ctx.show_pending && !ctx.pending.is_empty() {
        out.push(StatusSegment::Pending(ctx.pending));
    }
    out.push(StatusSegment::FileName {
        name: ctx.name,
        modified: ctx.modified,
    });
    out.push(StatusSegment::Position {
        line_1: ctx.line + 1,
        col_1: ctx.col + 1,
    });
    if let Some(m) = ctx.message {
        out.push(StatusSegment::Message(m));
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(64);
    for seg in segments {
        match seg {
            StatusSegment::Mode(m) => {
                let _ = write!(s, "-- {m} --");
            }
            StatusSegment::Pending(p) => {
                s.push(' ');
                s.push_str(p);
            }
            StatusSegment::FileName { name, modified } => {
                s.push_str("  ");
                s.push_str(name);
                if *modified {
                    s.push('*');
                }
            }
            StatusSegment::Position { line_1, col_1 } => {
                let _ = write!(s, "  Ln {line_1}, Col {col_1}");
            }
            StatusSegment::Message(m) => {
                s.push_str("  ");
                s.push_str(m);
            }
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext) -> String {
    format_status(&compose_status(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx<'a>() -> StatusContext<'a> {
        StatusContext {
            mode: Mode::Normal,
            pending: "",
            show_pending: true,
            name: "New 1",
            modified: false,
            line: 0,
            col: 4,
            message: None,
        }
    }

    #[test]
    fn normal_without_pending() {
        assert_eq!(build_status(&ctx()), "-- NORMAL --  New 1  Ln 1, Col 5");
    }

    #[test]
    fn pending_and_modified_marker() {
        let c = StatusContext {
            pending: ":wq",
            modified: true,
            name: "notes.md",
            ..ctx()
        };
        assert_eq!(build_status(&c), "-- NORMAL -- :wq  notes.md*  Ln 1, Col 5");
    }

    #[test]
    fn pending_hidden_when_disabled() {
        let c = StatusContext {
            pending: "12",
            show_pending: false,
            ..ctx()
        };
        assert!(
            !compose_status(&c)
                .iter()
                .any(|s| matches!(s, StatusSegment::Pending(_)))
        );
    }

    #[test]
    fn insert_with_message() {
        let c = StatusContext {
            mode: Mode::Insert,
            line: 9,
            col: 0,
            message: Some("No file name"),
            ..ctx()
        };
        assert_eq!(
            build_status(&c),
            "-- INSERT --  New 1  Ln 10, Col 1  No file name"
        );
    }
}
