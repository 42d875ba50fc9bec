use std::path::PathBuf;

/// Errors raised while configuring the listener or running the screenshot action.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config file could not be read from disk.
    #[error("could not read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("could not parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The screenshot directory does not exist and could not be created.
    #[error("could not create screenshot directory '{path}': {source}")]
    ScreenshotDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The screenshot directory could not be listed during a purge.
    #[error("could not list screenshot directory '{path}': {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The capture command could not be started at all.
    #[error("could not start capture command: {0}")]
    CaptureSpawn(#[source] std::io::Error),

    /// The capture command ran but exited unsuccessfully.
    #[error("capture command exited with {status}")]
    CaptureExit { status: String, stderr: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
