//! Field access on raw game state snapshots.
//!
//! Snapshots are kept as `serde_json::Value`: the game client owns the
//! schema and everything except the handful of fields read here is passed
//! through untouched.

use serde_json::Value;

/// `map.game_state` value for the pre-match planning phase.
pub const STRATEGY_TIME: &str = "DOTA_GAMERULES_STATE_STRATEGY_TIME";

/// `map.game_state` value while a match is being played.
pub const GAME_IN_PROGRESS: &str = "DOTA_GAMERULES_STATE_GAME_IN_PROGRESS";

/// Read `map.game_state`.
///
/// A missing `map`, a missing `game_state`, or a non-string value all read
/// as absent.
pub fn extract_game_state(snapshot: &Value) -> Option<&str> {
    snapshot.get("map")?.get("game_state")?.as_str()
}

/// Read the `auth.token` block the game client copies from its GSI config file.
pub fn auth_token(snapshot: &Value) -> Option<&str> {
    snapshot.get("auth")?.get("token")?.as_str()
}
