//! GSI ingest and fallback handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gsi_shot_core::Rejection;
use tracing::debug;

use super::state::AppState;

/// Fallback for unmatched methods and paths: 404 with an empty body.
pub(crate) async fn handle_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// POST /
///
/// Responds as soon as the snapshot is recorded. A screenshot triggered by
/// it keeps running after the response is sent.
pub(crate) async fn handle_gsi(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match state.ingestor.ingest(&body).await {
        Ok(accepted) => {
            if accepted.screenshot.is_some() {
                debug!("screenshot running in background");
            }
            (StatusCode::OK, "OK").into_response()
        }
        Err(rejection) => {
            let status = match &rejection {
                Rejection::MalformedJson(_) => StatusCode::BAD_REQUEST,
                Rejection::Unauthorized => StatusCode::UNAUTHORIZED,
            };
            (status, rejection.to_string()).into_response()
        }
    }
}
