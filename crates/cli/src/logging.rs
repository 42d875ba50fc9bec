use tracing_subscriber::EnvFilter;

/// Set to `1`/`true`/`yes` to force debug logging regardless of `RUST_LOG`.
const DEBUG_ENV: &str = "GSI_SHOT_DEBUG";

/// Install the stderr `fmt` subscriber.
///
/// Logs go to stderr so `gsi-shot config` output on stdout stays clean.
pub(crate) fn init() {
    let debug_enabled = std::env::var(DEBUG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
