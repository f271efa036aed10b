//! Mode indicator sink shared between the vim controller and the renderer.
//!
//! The controller owns a boxed [`StatusIndicator`]; the host keeps a clone and reads the last
//! pushed state when composing the status line. Both live on the single event-loop thread.

use core_state::{Mode, ModeIndicator};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

/// Last state pushed for the active document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorState {
    pub mode: Mode,
    pub pending: String,
}

#[derive(Debug, Clone, Default)]
pub struct StatusIndicator {
    state: Rc<RefCell<IndicatorState>>,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> IndicatorState {
        self.state.borrow().clone()
    }
}

impl ModeIndicator for StatusIndicator {
    fn update(&mut self, mode: Mode, pending: &str) {
        let mut state = self.state.borrow_mut();
        state.mode = mode;
        state.pending.clear();
        state.pending.push_str(pending);
        trace!(target: "render", %mode, pending_len = pending.len(), "indicator_updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clones_share_state() {
        let reader = StatusIndicator::new();
        let mut writer = reader.clone();
        writer.update(Mode::Normal, "12");
        assert_eq!(
            reader.snapshot(),
            IndicatorState {
                mode: Mode::Normal,
                pending: "12".into()
            }
        );
        writer.update(Mode::Insert, "");
        assert_eq!(reader.snapshot().mode, Mode::Insert);
        assert_eq!(reader.snapshot().pending, "");
    }
}
