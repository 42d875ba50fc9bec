//! gsi-shot-core: strategy-time screenshots from Dota 2 game state integration.
//!
//! The game client pushes a JSON snapshot every tick. [`Ingestor`] parses
//! it and hands `map.game_state` to the [`TransitionDispatcher`], which
//! remembers the previous value in a [`TransitionTracker`] and spawns the
//! [`ScreenshotAction`] whenever the state enters strategy time. The
//! optional [`OverlayHub`] rebroadcasts in-game snapshots to live overlays.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ingest;
pub mod overlay;
pub mod screenshot;
pub mod snapshot;
pub mod tracker;

pub use config::Config;
pub use dispatcher::TransitionDispatcher;
pub use error::{Error, Result};
pub use ingest::{Accepted, Ingestor, Rejection};
pub use overlay::{OverlayHub, PassThrough, SnapshotProjection};
pub use screenshot::{
    ensure_screenshot_dir, resolve_screenshot_dir, CaptureOutcome, ScreenCapture,
    ScreenshotAction, ScreenshotReport, ShellCapture,
};
pub use snapshot::{extract_game_state, GAME_IN_PROGRESS, STRATEGY_TIME};
pub use tracker::TransitionTracker;
