//! Event loop: one event at a time, in arrival order, followed by a full redraw.

use crate::shortcuts::{HostShortcut, QuitGate};
use anyhow::Result;
use core_actions::{
    FsFileActions, PathPrompt, PromptKind, PromptOutcome, edit, execute, handle_key, open_file,
    save_as,
};
use core_config::Config;
use core_events::{Event, InputEvent, KeyEvent};
use core_input::AsyncInputShutdown;
use core_keymap::CommandAction;
use core_model::EditorSession;
use core_render::{FrameInput, StatusIndicator};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

pub struct RuntimeContext<'a> {
    pub session: EditorSession,
    pub indicator: StatusIndicator,
    pub config: Config,
    pub ephemeral: Ephemeral,
    pub size: (u16, u16),
    pub terminal_guard: core_terminal::TerminalGuard<'a>,
}

/// Short-lived host message shown on the status line.
#[derive(Debug)]
pub struct Ephemeral {
    lifetime: Duration,
    current: Option<(String, Instant)>,
}

impl Ephemeral {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            current: None,
        }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.set_at(text, Instant::now());
    }

    fn set_at(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some((text.into(), now + self.lifetime));
    }

    /// Message still visible at `now`.
    pub fn text_at(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((text, expires)) if now < *expires => Some(text),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|(_, expires)| *expires)
    }

    /// Drop the message if it has expired. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.deadline().is_some_and(|d| now >= d) {
            self.current = None;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    QuitShortcut,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::QuitShortcut => "quit_shortcut",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum LoopControl {
    Continue { redraw: bool },
    Break { reason: ShutdownReason },
}

pub struct EditorRuntime<'a> {
    session: EditorSession,
    indicator: StatusIndicator,
    config: Config,
    files: FsFileActions,
    ephemeral: Ephemeral,
    prompt: Option<PathPrompt>,
    quit_gate: QuitGate,
    size: (u16, u16),
    rx: mpsc::Receiver<Event>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<AsyncInputShutdown>,
    _terminal_guard: core_terminal::TerminalGuard<'a>,
}

impl<'a> EditorRuntime<'a> {
    pub fn new(
        context: RuntimeContext<'a>,
        rx: mpsc::Receiver<Event>,
        input_task: JoinHandle<()>,
        input_shutdown: AsyncInputShutdown,
    ) -> Self {
        let RuntimeContext {
            session,
            indicator,
            config,
            ephemeral,
            size,
            terminal_guard,
        } = context;
        Self {
            session,
            indicator,
            config,
            files: FsFileActions::new(),
            ephemeral,
            prompt: None,
            quit_gate: QuitGate::default(),
            size,
            rx,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.session.refresh_indicator();
        self.render()?;

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        loop {
            let next = match self.ephemeral.deadline() {
                Some(deadline) => {
                    tokio::select! {
                        event = self.rx.recv() => event,
                        _ = tokio::time::sleep_until(deadline.into()) => {
                            if self.ephemeral.expire(Instant::now()) {
                                self.render()?;
                            }
                            continue;
                        }
                    }
                }
                None => self.rx.recv().await,
            };
            let Some(event) = next else {
                break;
            };

            let control = match &event {
                Event::Input(input) => self.handle_input_event(input),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue { redraw } => {
                    if redraw {
                        self.render()?;
                    }
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    fn handle_input_event(&mut self, input: &InputEvent) -> LoopControl {
        match input {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Resize(w, h) => {
                self.size = (*w, *h);
                debug!(target: "runtime", w, h, "resize");
                LoopControl::Continue { redraw: true }
            }
            InputEvent::CtrlC => self.request_quit(ShutdownReason::CtrlC),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> LoopControl {
        let shortcut = HostShortcut::from_key(key);
        if shortcut != Some(HostShortcut::Quit) {
            self.quit_gate.disarm();
        }
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        if let Some(shortcut) = shortcut {
            return self.handle_shortcut(shortcut);
        }
        let result = handle_key(&mut self.session, key, &mut self.files);
        let mut redraw = result.dirty;
        if !result.consumed {
            redraw |= edit::apply_default(self.session.active_document_mut(), key);
        }
        redraw |= self.collect_file_message();
        trace!(target: "runtime", consumed = result.consumed, redraw, "key_cycle");
        LoopControl::Continue { redraw }
    }

    fn handle_prompt_key(&mut self, key: &KeyEvent) -> LoopControl {
        let Some(prompt) = self.prompt.as_mut() else {
            return LoopControl::Continue { redraw: false };
        };
        let kind = prompt.kind();
        match prompt.handle_key(key) {
            PromptOutcome::Editing => {}
            PromptOutcome::Cancelled => self.prompt = None,
            PromptOutcome::Submitted(path) => {
                self.prompt = None;
                match kind {
                    PromptKind::SaveAs => {
                        save_as(&mut self.session, &mut self.files, path);
                    }
                    PromptKind::Open => {
                        if let Err(e) = open_file(&mut self.session, &path) {
                            self.ephemeral.set(format!("Open failed: {e}"));
                        }
                    }
                }
                self.collect_file_message();
            }
        }
        LoopControl::Continue { redraw: true }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        let prefill = match kind {
            PromptKind::SaveAs => self
                .session
                .active_document()
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            PromptKind::Open => String::new(),
        };
        debug!(target: "runtime", ?kind, "prompt_opened");
        self.prompt = Some(PathPrompt::with_input(kind, prefill));
    }

    fn request_quit(&mut self, reason: ShutdownReason) -> LoopControl {
        match self.quit_gate.request(&self.session) {
            Ok(()) => LoopControl::Break { reason },
            Err(refusal) => {
                info!(target: "runtime", %reason, "quit_refused_unsaved_changes");
                self.ephemeral.set(refusal);
                LoopControl::Continue { redraw: true }
            }
        }
    }

    fn handle_shortcut(&mut self, shortcut: HostShortcut) -> LoopControl {
        debug!(target: "runtime", ?shortcut, "host_shortcut");
        match shortcut {
            HostShortcut::NewDocument => {
                self.session.open_untitled();
            }
            HostShortcut::Save => {
                execute(CommandAction::FileSave, &mut self.session, &mut self.files);
                self.collect_file_message();
            }
            HostShortcut::SaveAs => self.open_prompt(PromptKind::SaveAs),
            HostShortcut::Open => self.open_prompt(PromptKind::Open),
            HostShortcut::NextDocument => self.session.activate_next(),
            HostShortcut::PrevDocument => self.session.activate_prev(),
            HostShortcut::Quit => return self.request_quit(ShutdownReason::QuitShortcut),
        }
        LoopControl::Continue { redraw: true }
    }

    /// Move provider messages to the status line; a write that found no file name opens the
    /// save-as prompt.
    fn collect_file_message(&mut self) -> bool {
        let mut changed = false;
        if let Some(message) = self.files.take_message() {
            self.ephemeral.set(message);
            changed = true;
        }
        if self.files.take_save_as_request() {
            self.open_prompt(PromptKind::SaveAs);
            changed = true;
        }
        changed
    }

    fn render(&mut self) -> Result<()> {
        let indicator = self.indicator.snapshot();
        let now = Instant::now();
        let prompt_line = self.prompt.as_ref().map(PathPrompt::line);
        let input = FrameInput {
            width: self.size.0,
            height: self.size.1,
            indicator: &indicator,
            show_pending: self.config.show_pending(),
            message: self.ephemeral.text_at(now),
            prompt: prompt_line.as_deref(),
        };
        let mut out = std::io::stdout();
        core_render::render(&mut self.session, &input, &mut out)
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", %reason, "shutdown_begin");
        let unsaved = self
            .session
            .documents()
            .iter()
            .filter(|d| d.modified)
            .count();
        if unsaved > 0 {
            warn!(target: "runtime.shutdown", unsaved, "exiting_with_modified_documents");
        }
        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(())) => trace!(target: "runtime.shutdown", "input_task_stopped"),
                Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "input_task_error"),
                Err(_) => warn!(target: "runtime.shutdown", "input_task_timeout"),
            }
        }
        info!(target: "runtime.shutdown", %reason, "shutdown_complete");
    }
}
