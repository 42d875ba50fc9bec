//! Edge-triggered screenshot dispatch.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::screenshot::{ScreenshotAction, ScreenshotReport};
use crate::tracker::TransitionTracker;

/// Owns the transition tracker and launches the screenshot action on each
/// entry into the trigger state.
///
/// The tracker lock is held only for the compare-and-store step, so
/// concurrent producers are serialized without waiting on a capture.
#[derive(Debug)]
pub struct TransitionDispatcher {
    tracker: Mutex<TransitionTracker>,
    action: Arc<ScreenshotAction>,
}

impl TransitionDispatcher {
    pub fn new(tracker: TransitionTracker, action: Arc<ScreenshotAction>) -> Self {
        Self {
            tracker: Mutex::new(tracker),
            action,
        }
    }

    /// Last state recorded by [`dispatch`](Self::dispatch).
    pub async fn previous_state(&self) -> Option<String> {
        self.tracker.lock().await.previous().map(str::to_owned)
    }

    /// Record `current` and, on a rising edge, spawn the screenshot action.
    ///
    /// The returned handle may be dropped; the action keeps running
    /// detached and its outcome is only logged.
    pub async fn dispatch(&self, current: Option<&str>) -> Option<JoinHandle<ScreenshotReport>> {
        let (entered, trigger) = {
            let mut tracker = self.tracker.lock().await;
            if tracker.previous() != current {
                debug!(
                    from = tracker.previous().unwrap_or("<none>"),
                    to = current.unwrap_or("<none>"),
                    "game state changed"
                );
            }
            let entered = tracker.observe(current);
            (entered, tracker.trigger().to_owned())
        };

        if !entered {
            return None;
        }

        info!(state = %trigger, "state entered, scheduling screenshot");
        let action = Arc::clone(&self.action);
        Some(tokio::spawn(async move { action.run().await }))
    }
}
