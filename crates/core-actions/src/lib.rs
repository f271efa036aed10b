//! core-actions: turns keystrokes into editor state changes.
//!
//! * [`dispatcher`] runs the modal interpreter: it accumulates Normal-mode keys into the active
//!   document's command buffer, resolves them against the grammar in `core-keymap`, and executes
//!   the resulting [`CommandAction`](core_keymap::CommandAction).
//! * [`edit`] is the default text-widget behavior for keys the interpreter does not consume.
//! * [`files`] is the seam to the host's persistence and prompting ([`FileActionProvider`]).
//! * [`prompt`] is the host's path prompt for "save as" and "open".

pub mod dispatcher;
pub mod edit;
pub mod files;
pub mod io_ops;
pub mod prompt;

pub use dispatcher::{DispatchResult, execute, handle_key, open_file, save_as};
pub use files::{CloseDecision, FileActionError, FileActionProvider, FsFileActions};
pub use prompt::{PathPrompt, PromptKind, PromptOutcome};
