//! TOML configuration for the listener.
//!
//! Every key is optional; a missing file section falls back to the
//! defaults below, which reproduce a loopback listener on port 3001
//! writing `screenshots/strategy_time_screenshot.png`.
//!
//! # Example
//!
//! ```toml
//! [server]
//! port = 3001
//!
//! [screenshot]
//! dir = "D:/streaming/screenshots"
//! command = "nircmd savescreenshotfull \"{path}\""
//!
//! [gsi]
//! auth_token = "hello1234"
//!
//! [overlay]
//! enabled = true
//! static_dir = "overlay"
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::screenshot::DEFAULT_CAPTURE_COMMAND;
use crate::snapshot::{GAME_IN_PROGRESS, STRATEGY_TIME};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub screenshot: ScreenshotConfig,
    pub gsi: GsiConfig,
    pub overlay: OverlayConfig,
}

/// `[server]`: where the GSI endpoint listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Larger request bodies are rejected with 413.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3001,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// `[screenshot]`: where captures go and how they are taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenshotConfig {
    /// Relative paths are resolved against the working directory.
    pub dir: PathBuf,
    pub file_name: String,
    /// File extensions deleted before each capture.
    pub extensions: Vec<String>,
    /// Shell command template; `{path}` becomes the destination file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Capture stderr containing any of these is not logged as a warning.
    pub benign_stderr: Vec<String>,
    /// Exit at startup when the directory cannot be created.
    pub require_dir: bool,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("screenshots"),
            file_name: "strategy_time_screenshot.png".to_string(),
            extensions: vec!["png".to_string()],
            command: None,
            benign_stderr: vec!["parameter is incorrect".to_string()],
            require_dir: true,
        }
    }
}

impl ScreenshotConfig {
    /// The configured command, or the platform default.
    pub fn capture_command(&self) -> &str {
        self.command.as_deref().unwrap_or(DEFAULT_CAPTURE_COMMAND)
    }
}

/// `[gsi]`: how incoming snapshots are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GsiConfig {
    /// `map.game_state` value whose entry triggers a screenshot.
    pub trigger_state: String,
    /// Required `auth.token`, matching the game's GSI config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for GsiConfig {
    fn default() -> Self {
        Self {
            trigger_state: STRATEGY_TIME.to_string(),
            auth_token: None,
        }
    }
}

/// `[overlay]`: live rebroadcast to browser overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    pub enabled: bool,
    /// Only snapshots in this state are published.
    pub broadcast_state: String,
    pub channel_capacity: usize,
    /// Served under `/overlay` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broadcast_state: GAME_IN_PROGRESS.to_string(),
            channel_capacity: 16,
            static_dir: None,
        }
    }
}

impl Config {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render as TOML, e.g. for `gsi-shot config`.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
