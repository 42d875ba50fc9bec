//! The screenshot action: purge old images, capture, verify.
//!
//! Every failure in here is logged and swallowed. [`ScreenshotAction::run`]
//! returns a [`ScreenshotReport`] for logging and tests only; nothing in it
//! reaches the HTTP client that caused the trigger.

mod capture;
mod purge;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::ScreenshotConfig;
use crate::error::{Error, Result};

pub use capture::{
    CaptureOutput, ScreenCapture, ShellCapture, DEFAULT_CAPTURE_COMMAND, PATH_PLACEHOLDER,
};
pub use purge::{has_image_extension, purge_images, PurgeReport};

/// How the capture step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The command succeeded and the destination file exists.
    Saved,
    /// The command succeeded but the destination file is not there.
    Missing,
    /// The command could not be started or exited unsuccessfully.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotReport {
    pub destination: PathBuf,
    pub purge: PurgeReport,
    pub outcome: CaptureOutcome,
}

/// Clears the screenshot directory and captures a fresh image into a fixed
/// filename inside it.
pub struct ScreenshotAction {
    dir: PathBuf,
    file_name: String,
    extensions: Vec<String>,
    benign_stderr: Vec<String>,
    capture: Arc<dyn ScreenCapture>,
}

impl ScreenshotAction {
    pub fn new(
        dir: impl Into<PathBuf>,
        file_name: impl Into<String>,
        capture: Arc<dyn ScreenCapture>,
    ) -> Self {
        let defaults = ScreenshotConfig::default();
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            extensions: defaults.extensions,
            benign_stderr: defaults.benign_stderr,
            capture,
        }
    }

    /// Build from config, capturing through the configured shell command.
    ///
    /// `dir` is the resolved screenshot directory (see [`ensure_screenshot_dir`]).
    pub fn from_config(config: &ScreenshotConfig, dir: PathBuf) -> Self {
        let capture = Arc::new(ShellCapture::new(config.capture_command()));
        Self::new(dir, config.file_name.clone(), capture)
            .with_extensions(config.extensions.clone())
            .with_benign_stderr(config.benign_stderr.clone())
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Stderr fragments that are not worth a warning.
    pub fn with_benign_stderr(mut self, fragments: Vec<String>) -> Self {
        self.benign_stderr = fragments;
        self
    }

    /// The single path every capture writes to.
    pub fn destination(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub async fn run(&self) -> ScreenshotReport {
        info!(dir = %self.dir.display(), "deleting old screenshots");
        let purge = purge_images(&self.dir, &self.extensions).await;

        let destination = self.destination();
        info!(path = %destination.display(), "triggering screenshot");
        let outcome = match self.capture.capture(&destination).await {
            Ok(output) => {
                if self.is_noteworthy(&output.stderr) {
                    warn!(stderr = %output.stderr.trim(), "screenshot command wrote to stderr");
                }
                self.verify(&destination).await
            }
            Err(e) => {
                error!(error = %e, "screenshot execution error");
                if let Error::CaptureExit { stderr, .. } = &e {
                    if !stderr.trim().is_empty() {
                        error!(stderr = %stderr.trim(), "screenshot command stderr");
                    }
                }
                CaptureOutcome::Failed(e.to_string())
            }
        };

        ScreenshotReport {
            destination,
            purge,
            outcome,
        }
    }

    fn is_noteworthy(&self, stderr: &str) -> bool {
        let stderr = stderr.trim();
        !stderr.is_empty()
            && !self
                .benign_stderr
                .iter()
                .any(|fragment| stderr.contains(fragment.as_str()))
    }

    async fn verify(&self, destination: &Path) -> CaptureOutcome {
        match tokio::fs::try_exists(destination).await {
            Ok(true) => {
                info!(path = %destination.display(), "screenshot saved");
                CaptureOutcome::Saved
            }
            Ok(false) => {
                error!(path = %destination.display(), "screenshot command finished but file not found");
                CaptureOutcome::Missing
            }
            Err(e) => {
                error!(path = %destination.display(), error = %e, "could not check for screenshot file");
                CaptureOutcome::Missing
            }
        }
    }
}

impl std::fmt::Debug for ScreenshotAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenshotAction")
            .field("dir", &self.dir)
            .field("file_name", &self.file_name)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

/// Anchor a relative `dir` at the current working directory.
///
/// Capture commands receive the destination as an absolute path.
pub fn resolve_screenshot_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| Error::ScreenshotDir {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(dir))
}

/// Resolve `dir` to an absolute path and create it if missing.
pub fn ensure_screenshot_dir(dir: &Path) -> Result<PathBuf> {
    let absolute = resolve_screenshot_dir(dir)?;
    if !absolute.is_dir() {
        std::fs::create_dir_all(&absolute).map_err(|source| Error::ScreenshotDir {
            path: dir.to_path_buf(),
            source,
        })?;
        info!(dir = %absolute.display(), "created screenshot directory");
    }
    Ok(absolute)
}
