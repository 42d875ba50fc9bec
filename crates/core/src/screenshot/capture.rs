//! External screen capture invocation.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Placeholder replaced by the absolute destination path in a command template.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// PowerShell capture of the full virtual screen via `System.Drawing`.
#[cfg(windows)]
pub const DEFAULT_CAPTURE_COMMAND: &str = "powershell -Command \"Add-Type -AssemblyName System.Drawing; Add-Type -AssemblyName System.Windows.Forms; $ScreenBounds = [System.Windows.Forms.SystemInformation]::VirtualScreen; $Bitmap = New-Object System.Drawing.Bitmap $ScreenBounds.Width, $ScreenBounds.Height; $Graphics = [System.Drawing.Graphics]::FromImage($Bitmap); $Graphics.CopyFromScreen($ScreenBounds.Location, [System.Drawing.Point]::Empty, $ScreenBounds.Size); try { $Bitmap.Save('{path}', [System.Drawing.Imaging.ImageFormat]::Png) } finally { $Graphics.Dispose(); $Bitmap.Dispose() }\"";

#[cfg(target_os = "macos")]
pub const DEFAULT_CAPTURE_COMMAND: &str = "screencapture \"{path}\"";

#[cfg(all(unix, not(target_os = "macos")))]
pub const DEFAULT_CAPTURE_COMMAND: &str = "scrot -o \"{path}\"";

/// What a capture program left behind after a successful exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureOutput {
    /// Diagnostic output. May be non-empty even on success.
    pub stderr: String,
}

/// Writes a screenshot of the desktop to a destination path.
///
/// Implementations must return `Err` only when the capture program could
/// not run or exited unsuccessfully. Whether the destination file actually
/// appeared is checked by the caller.
#[async_trait]
pub trait ScreenCapture: Send + Sync + 'static {
    async fn capture(&self, destination: &Path) -> Result<CaptureOutput>;
}

/// Runs an OS capture utility through the platform shell.
#[derive(Debug, Clone)]
pub struct ShellCapture {
    template: String,
}

impl ShellCapture {
    /// `template` is a shell command line containing [`PATH_PLACEHOLDER`].
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The command line that will be run for `destination`.
    ///
    /// On Unix the path is escaped for use inside a double-quoted shell word,
    /// so templates must wrap the placeholder as `"{path}"`. On Windows the
    /// path is inserted as-is and must not contain `'` when the template
    /// quotes it for PowerShell.
    pub fn render(&self, destination: &Path) -> String {
        self.template.replace(
            PATH_PLACEHOLDER,
            &quote_path(&destination.display().to_string()),
        )
    }
}

impl Default for ShellCapture {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_COMMAND)
    }
}

#[async_trait]
impl ScreenCapture for ShellCapture {
    async fn capture(&self, destination: &Path) -> Result<CaptureOutput> {
        let command_line = self.render(destination);
        debug!(command = %command_line, "running capture command");

        let output = shell(&command_line)
            .output()
            .await
            .map_err(Error::CaptureSpawn)?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::CaptureExit {
                status: output.status.to_string(),
                stderr,
            });
        }
        Ok(CaptureOutput { stderr })
    }
}

/// Escape the characters that stay special inside `"..."` in `sh`.
#[cfg(not(windows))]
fn quote_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(c, '"' | '$' | '`' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(windows)]
fn quote_path(path: &str) -> String {
    path.to_string()
}

/// The argument handed to `cmd /s /c`: the whole line in one pair of quotes,
/// which `/s` strips before running the rest verbatim.
#[cfg_attr(not(windows), allow(dead_code))]
fn cmd_argument(command_line: &str) -> String {
    format!("\"{}\"", command_line)
}

#[cfg(windows)]
fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    // `arg` would re-quote embedded `"` as `\"`, which cmd passes through.
    cmd.arg("/d")
        .arg("/s")
        .arg("/c")
        .raw_arg(cmd_argument(command_line));
    cmd
}

#[cfg(not(windows))]
fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    cmd
}
