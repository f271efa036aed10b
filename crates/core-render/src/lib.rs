//! Rendering primitives + full-frame assembly.
//!
//! Every handled event redraws the whole frame:
//! * row 0: tab bar, one tab per open document (`*` marks modified, active tab reversed),
//! * rows 1..h-1: the active document's text from its viewport origin,
//! * row h-1: the status line (see [`status`]).
//!
//! `Cell` stores the full grapheme cluster for leader cells along with its visual width;
//! continuation cells (width==0) occupy the remaining columns of a multi-column cluster and
//! never print text.
//!
//! Invariants:
//! - Leader: width >= 1, `cluster` non-empty.
//! - Continuation: width == 0, `cluster` empty.
//! - Continuations immediately follow their leader horizontally; no gaps.
//! - The cursor is a software cursor: the cell under it carries `REVERSE | CURSOR`.

use bitflags::bitflags;

pub mod compose;
pub mod indicator;
pub mod status;
pub mod writer;

pub use compose::{FrameInput, build_frame, render};
pub use indicator::{IndicatorState, StatusIndicator};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // reverse-video (software cursor, active tab, status)
        const CURSOR  = 0b0000_0010; // marks cell part of cursor span
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Full grapheme cluster string (leader cells only). Empty for continuation cells.
    pub cluster: String,
    /// Visual width in terminal columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    pub fn leader(cluster: &str, width: u16, flags: CellFlags) -> Self {
        Self {
            cluster: cluster.to_string(),
            width: width.clamp(1, u16::from(u8::MAX)) as u8,
            flags,
        }
    }
    #[inline]
    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            cluster: String::new(),
            width: 0,
            flags,
        }
    }
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
    #[inline]
    pub fn visual_width(&self) -> u16 {
        self.width as u16
    }
}

impl Default for Cell {
    fn default() -> Self {
        // Default is a single space leader cell for blank areas.
        Cell {
            cluster: " ".to_string(),
            width: 1,
            flags: CellFlags::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set a full cluster at (x,y) and populate continuation cells for its width.
    pub fn set_cluster(&mut self, x: u16, y: u16, cluster: &str, width: u16, flags: CellFlags) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = width.max(1).min(self.width - x);
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(cluster, w, flags);
        }
        for dx in 1..w {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(flags);
            }
        }
    }

    /// Apply additional flags over an existing span (leader + continuations).
    pub fn apply_flags_span(&mut self, x: u16, y: u16, span_width: u16, flags: CellFlags) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    /// Iterate leader cells of a row, yielding (&str, width, flags, start_x).
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (&str, u16, CellFlags, u16)> + '_ {
        let width = self.width;
        let start = y as usize * width as usize;
        let mut x = 0u16;
        std::iter::from_fn(move || {
            while x < width {
                let cell = &self.cells[start + x as usize];
                if cell.is_leader() {
                    let w = cell.visual_width();
                    let out = (&*cell.cluster, w, cell.flags, x);
                    x = x.saturating_add(w);
                    return Some(out);
                }
                x += 1;
            }
            None
        })
    }

    /// Row content as a string (testing / diagnostics only).
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        self.row_leaders(y).map(|(c, _, _, _)| c).collect()
    }

    /// Flags of the cell at (x,y).
    pub fn flags_at(&self, x: u16, y: u16) -> Option<CellFlags> {
        self.index(x, y).map(|i| self.cells[i].flags)
    }
}
