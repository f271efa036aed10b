//! Single-line path prompt shown in place of the status line.
//!
//! The host opens a [`PathPrompt`] for "save as" (also when a write finds no file name) and
//! for "open". Keys are routed here instead of the interpreter until the prompt is submitted
//! or cancelled.

use core_events::{KeyCode, KeyEvent};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    SaveAs,
    Open,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::SaveAs => "Save as: ",
            PromptKind::Open => "Open: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Still editing.
    Editing,
    Cancelled,
    Submitted(PathBuf),
}

#[derive(Debug, Clone)]
pub struct PathPrompt {
    kind: PromptKind,
    input: String,
}

impl PathPrompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    /// Prompt pre-filled with `input` (e.g. the document's current path).
    pub fn with_input(kind: PromptKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Label plus typed text, as drawn on the status row.
    pub fn line(&self) -> String {
        format!("{}{}", self.kind.label(), self.input)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Esc => {
                debug!(target: "input.prompt", kind = ?self.kind, "prompt_cancelled");
                PromptOutcome::Cancelled
            }
            KeyCode::Enter => {
                let trimmed = self.input.trim();
                if trimmed.is_empty() {
                    return PromptOutcome::Cancelled;
                }
                debug!(target: "input.prompt", kind = ?self.kind, len = trimmed.len(), "prompt_submitted");
                PromptOutcome::Submitted(PathBuf::from(trimmed))
            }
            KeyCode::Backspace => {
                self.input.pop();
                PromptOutcome::Editing
            }
            _ => {
                if let Some(c) = key.printable() {
                    self.input.push(c);
                }
                PromptOutcome::Editing
            }
        }
    }
}
