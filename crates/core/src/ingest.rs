//! Request-independent handling of one pushed snapshot.
//!
//! The HTTP layer hands raw body bytes to [`Ingestor::ingest`] and maps the
//! result onto a status code.

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::dispatcher::TransitionDispatcher;
use crate::overlay::OverlayHub;
use crate::screenshot::ScreenshotReport;
use crate::snapshot::{auth_token, extract_game_state};

/// Why a snapshot was refused. The tracker is untouched in every case.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("Error parsing JSON")]
    MalformedJson(#[source] serde_json::Error),

    #[error("invalid auth token")]
    Unauthorized,
}

/// Result of an accepted snapshot.
#[derive(Debug)]
pub struct Accepted {
    pub game_state: Option<String>,
    /// Set when this snapshot entered the trigger state.
    pub screenshot: Option<JoinHandle<ScreenshotReport>>,
    /// Overlay listeners the snapshot was published to.
    pub overlay_listeners: usize,
}

#[derive(Debug)]
pub struct Ingestor {
    dispatcher: TransitionDispatcher,
    overlay: Option<OverlayHub>,
    auth_token: Option<String>,
}

impl Ingestor {
    pub fn new(dispatcher: TransitionDispatcher) -> Self {
        Self {
            dispatcher,
            overlay: None,
            auth_token: None,
        }
    }

    pub fn with_overlay(mut self, overlay: OverlayHub) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Require snapshots to carry `auth.token == token`.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn dispatcher(&self) -> &TransitionDispatcher {
        &self.dispatcher
    }

    pub fn overlay(&self) -> Option<&OverlayHub> {
        self.overlay.as_ref()
    }

    pub async fn ingest(&self, body: &[u8]) -> Result<Accepted, Rejection> {
        let snapshot: Value = serde_json::from_slice(body).map_err(|e| {
            warn!(error = %e, "error parsing GSI JSON");
            Rejection::MalformedJson(e)
        })?;

        if let Some(expected) = &self.auth_token {
            if auth_token(&snapshot) != Some(expected.as_str()) {
                warn!("rejected snapshot with missing or wrong auth token");
                return Err(Rejection::Unauthorized);
            }
        }

        let game_state = extract_game_state(&snapshot);
        let screenshot = self.dispatcher.dispatch(game_state).await;
        let overlay_listeners = self
            .overlay
            .as_ref()
            .map_or(0, |hub| hub.publish(&snapshot));

        Ok(Accepted {
            game_state: game_state.map(str::to_owned),
            screenshot,
            overlay_listeners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::screenshot::{CaptureOutput, ScreenCapture, ScreenshotAction};
    use crate::snapshot::{GAME_IN_PROGRESS, STRATEGY_TIME};
    use crate::tracker::TransitionTracker;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Arc;

    struct Touch;

    #[async_trait]
    impl ScreenCapture for Touch {
        async fn capture(&self, destination: &Path) -> Result<CaptureOutput> {
            tokio::fs::write(destination, b"png").await.unwrap();
            Ok(CaptureOutput::default())
        }
    }

    fn ingestor(dir: &Path) -> Ingestor {
        let action = ScreenshotAction::new(dir, "strategy_time_screenshot.png", Arc::new(Touch));
        Ingestor::new(TransitionDispatcher::new(
            TransitionTracker::new(STRATEGY_TIME),
            Arc::new(action),
        ))
    }

    fn body(state: &str) -> Vec<u8> {
        format!(r#"{{"map":{{"name":"start","game_state":"{state}"}}}}"#).into_bytes()
    }

    #[tokio::test]
    async fn malformed_body_leaves_state_alone() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = ingestor(dir.path());
        ingestor.ingest(&body("DOTA_GAMERULES_STATE_HERO_SELECTION")).await.unwrap();

        for bad in [&b"not json"[..], &b""[..], &b"{\"map\":"[..], &b"\xff\xfe"[..]] {
            let err = ingestor.ingest(bad).await.unwrap_err();
            assert!(matches!(err, Rejection::MalformedJson(_)));
            assert_eq!(err.to_string(), "Error parsing JSON");
        }
        assert_eq!(
            ingestor.dispatcher().previous_state().await.as_deref(),
            Some("DOTA_GAMERULES_STATE_HERO_SELECTION")
        );
    }

    #[tokio::test]
    async fn snapshot_without_map_is_absent_state() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = ingestor(dir.path());
        ingestor.ingest(&body(STRATEGY_TIME)).await.unwrap();

        let accepted = ingestor
            .ingest(br#"{"provider":{"name":"Dota 2","appid":570}}"#)
            .await
            .unwrap();
        assert_eq!(accepted.game_state, None);
        assert!(accepted.screenshot.is_none());
        assert_eq!(ingestor.dispatcher().previous_state().await, None);
    }

    #[tokio::test]
    async fn strategy_time_entry_returns_screenshot_handle() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = ingestor(dir.path());

        let first = ingestor.ingest(&body(STRATEGY_TIME)).await.unwrap();
        let report = first.screenshot.expect("rising edge").await.unwrap();
        assert!(report.destination.ends_with("strategy_time_screenshot.png"));

        let second = ingestor.ingest(&body(STRATEGY_TIME)).await.unwrap();
        assert!(second.screenshot.is_none());
    }

    #[tokio::test]
    async fn wrong_token_is_rejected_before_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = ingestor(dir.path()).with_auth_token("hello1234");

        let err = ingestor.ingest(&body(STRATEGY_TIME)).await.unwrap_err();
        assert!(matches!(err, Rejection::Unauthorized));
        let wrong = format!(
            r#"{{"auth":{{"token":"nope"}},"map":{{"game_state":"{STRATEGY_TIME}"}}}}"#
        );
        assert!(ingestor.ingest(wrong.as_bytes()).await.is_err());
        assert_eq!(ingestor.dispatcher().previous_state().await, None);

        let right = format!(
            r#"{{"auth":{{"token":"hello1234"}},"map":{{"game_state":"{STRATEGY_TIME}"}}}}"#
        );
        let accepted = ingestor.ingest(right.as_bytes()).await.unwrap();
        assert!(accepted.screenshot.is_some());
    }

    #[tokio::test]
    async fn in_progress_snapshots_reach_the_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = ingestor(dir.path()).with_overlay(OverlayHub::new(GAME_IN_PROGRESS, 8));
        let mut rx = ingestor.overlay().unwrap().subscribe();

        let accepted = ingestor.ingest(&body(STRATEGY_TIME)).await.unwrap();
        assert_eq!(accepted.overlay_listeners, 0);

        let accepted = ingestor.ingest(&body(GAME_IN_PROGRESS)).await.unwrap();
        assert_eq!(accepted.overlay_listeners, 1);
        let payload: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(extract_game_state(&payload), Some(GAME_IN_PROGRESS));
    }
}
