//! Application state shared across request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use gsi_shot_core::{
    Config, Ingestor, OverlayHub, ScreenshotAction, TransitionDispatcher, TransitionTracker,
};

pub(crate) struct AppState {
    pub(crate) ingestor: Ingestor,
}

impl AppState {
    /// Wire the ingest pipeline from config. `screenshot_dir` is already resolved.
    pub(crate) fn from_config(config: &Config, screenshot_dir: PathBuf) -> Self {
        let action = ScreenshotAction::from_config(&config.screenshot, screenshot_dir);
        let dispatcher = TransitionDispatcher::new(
            TransitionTracker::new(config.gsi.trigger_state.clone()),
            Arc::new(action),
        );

        let mut ingestor = Ingestor::new(dispatcher);
        if let Some(token) = &config.gsi.auth_token {
            ingestor = ingestor.with_auth_token(token.clone());
        }
        if config.overlay.enabled {
            ingestor = ingestor.with_overlay(OverlayHub::new(
                config.overlay.broadcast_state.clone(),
                config.overlay.channel_capacity,
            ));
        }

        Self { ingestor }
    }
}
