//! acedit entrypoint.
use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_events::{EVENT_CHANNEL_CAP, Event};
use core_model::EditorSession;
use core_render::StatusIndicator;
use core_terminal::{CrosstermBackend, TerminalBackend};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;
mod shortcuts;

use runtime::{EditorRuntime, Ephemeral, RuntimeContext};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "acedit", version, about = "Modal text editor")]
struct Args {
    /// Files to open at startup, one document each. With none, an untitled document is created.
    pub paths: Vec<PathBuf>,
    /// Configuration file path (overrides discovery of `acedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run(&mut self, args: Args) -> Result<RuntimeContext<'_>> {
        self.configure_logging()?;
        Self::install_panic_hook();

        info!(target: "runtime", "startup");
        let config = load_from(args.config.clone())?;
        let indicator = StatusIndicator::new();
        let mut session = EditorSession::new(Box::new(indicator.clone()))
            .with_untitled_prefix(config.untitled_prefix());

        let mut failures = Vec::new();
        for path in &args.paths {
            if let Err(e) = session.open_path(path) {
                error!(target: "io", path = %path.display(), error = %e, "file_open_error");
                failures.push(path.display().to_string());
            }
        }
        session.ensure_document();
        if !args.paths.is_empty() {
            session.activate(0);
        }

        let mut ephemeral = Ephemeral::new(config.ephemeral_duration());
        if !failures.is_empty() {
            ephemeral.set(format!("Could not open: {}", failures.join(", ")));
        }

        info!(
            target: "runtime.startup",
            documents = session.len(),
            open_failures = failures.len(),
            config_source = config.source.as_ref().map(|p| p.display().to_string()).as_deref(),
            "bootstrap_complete"
        );

        self.backend.set_title("acedit")?;
        let size = self.backend.size().unwrap_or((80, 24));
        let guard = self.backend.enter_guard()?;
        Ok(RuntimeContext {
            session,
            indicator,
            config,
            ephemeral,
            size,
            terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("acedit.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "acedit.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                core_terminal::force_restore();
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let context = startup.run(args)?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx);

    let mut runtime = EditorRuntime::new(context, rx, input_task, input_shutdown);
    runtime.run().await
}
