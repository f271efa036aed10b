//! Configuration loading and parsing.
//!
//! Parses `acedit.toml` (or an override path provided by the binary). Every field has a
//! default; a missing file or a file that fails to parse yields the defaults. Unknown fields
//! are ignored (TOML deserialization tolerance) so older binaries accept newer files.
//!
//! ```toml
//! [session]
//! untitled_prefix = "New"
//!
//! [status]
//! show_pending = true
//! ephemeral_ms = 3000
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "acedit.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_untitled_prefix")]
    pub untitled_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            untitled_prefix: Self::default_untitled_prefix(),
        }
    }
}

impl SessionConfig {
    fn default_untitled_prefix() -> String {
        "New".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    /// Show the in-progress command buffer next to the mode.
    #[serde(default = "StatusConfig::default_show_pending")]
    pub show_pending: bool,
    /// Lifetime of host status messages in milliseconds.
    #[serde(default = "StatusConfig::default_ephemeral_ms")]
    pub ephemeral_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            show_pending: Self::default_show_pending(),
            ephemeral_ms: Self::default_ephemeral_ms(),
        }
    }
}

impl StatusConfig {
    const fn default_show_pending() -> bool {
        true
    }
    const fn default_ephemeral_ms() -> u64 {
        3000
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: Option<PathBuf>, // file the values came from, if any
    pub file: ConfigFile,        // parsed (or default) data
}

impl Config {
    pub fn untitled_prefix(&self) -> &str {
        &self.file.session.untitled_prefix
    }

    pub fn show_pending(&self) -> bool {
        self.file.status.show_pending
    }

    pub fn ephemeral_duration(&self) -> Duration {
        Duration::from_millis(self.file.status.ephemeral_ms)
    }
}

/// Best-effort config path: `acedit.toml` in the working directory, then the platform config
/// dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("acedit").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}
