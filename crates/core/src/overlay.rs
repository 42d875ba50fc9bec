//! Rebroadcast of in-game snapshots to overlay listeners.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::snapshot::extract_game_state;

/// Derives the overlay payload from a full snapshot.
///
/// Returning `None` skips the snapshot.
pub trait SnapshotProjection: Send + Sync + 'static {
    fn project(&self, snapshot: &Value) -> Option<Value>;
}

/// Forwards the whole snapshot unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl SnapshotProjection for PassThrough {
    fn project(&self, snapshot: &Value) -> Option<Value> {
        Some(snapshot.clone())
    }
}

/// Fan-out point for overlay payloads.
pub struct OverlayHub {
    broadcast_state: String,
    projection: Arc<dyn SnapshotProjection>,
    tx: broadcast::Sender<String>,
}

impl OverlayHub {
    pub fn new(broadcast_state: impl Into<String>, capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            broadcast_state: broadcast_state.into(),
            projection: Arc::new(PassThrough),
            tx,
        }
    }

    pub fn with_projection(mut self, projection: Arc<dyn SnapshotProjection>) -> Self {
        self.projection = projection;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Publish `snapshot` if it is in the broadcast state.
    ///
    /// Returns the number of listeners the payload reached.
    pub fn publish(&self, snapshot: &Value) -> usize {
        if extract_game_state(snapshot) != Some(self.broadcast_state.as_str()) {
            return 0;
        }
        let Some(payload) = self.projection.project(snapshot) else {
            return 0;
        };
        let payload = match serde_json::to_string(&payload) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "could not serialize overlay payload");
                return 0;
            }
        };
        match self.tx.send(payload) {
            Ok(listeners) => listeners,
            Err(_) => {
                debug!("no overlay listeners connected");
                0
            }
        }
    }
}

impl std::fmt::Debug for OverlayHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayHub")
            .field("broadcast_state", &self.broadcast_state)
            .field("listeners", &self.tx.receiver_count())
            .finish_non_exhaustive()
    }
}
