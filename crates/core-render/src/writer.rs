//! Terminal writer: batches primitive terminal operations and flushes once per frame.
//!
//! Invariants:
//! * Commands preserve ordering; no flushing mid-frame.
//! * All positions are absolute (0,0) origin; caller ensures bounds.
//! * The writer owns no global state; it is a short-lived object per frame.

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    Print(String),
    Reverse(bool),
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    /// Clear the row the cursor is on; callers precede it with `move_to(0, y)`.
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn reverse(&mut self, on: bool) {
        self.cmds.push(Command::Reverse(on));
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }
    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Reverse(true) => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::Reverse(false) => queue!(out, SetAttribute(Attribute::NoReverse))?,
            }
        }
        out.flush()?;
        Ok(())
    }
}
