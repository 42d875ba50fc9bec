//! One-step memory for edge detection on `map.game_state`.

/// Remembers the previous game state and reports rising edges into a
/// trigger state.
#[derive(Debug, Clone)]
pub struct TransitionTracker {
    trigger: String,
    previous: Option<String>,
}

impl TransitionTracker {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            previous: None,
        }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// The state recorded by the last call to [`observe`](Self::observe).
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Record `current` and return `true` when it enters the trigger state.
    ///
    /// The stored state is replaced on every call, including calls that do
    /// not fire and calls where `current` is absent.
    pub fn observe(&mut self, current: Option<&str>) -> bool {
        let trigger = self.trigger.as_str();
        let entered = current == Some(trigger) && self.previous.as_deref() != Some(trigger);
        self.previous = current.map(str::to_owned);
        entered
    }
}
