use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_livekit_token, get_session, update_session, update_session_status};
use crate::app_state::AppState;

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/{id}", get(get_session).patch(update_session))
        .route("/sessions/{id}/status", post(update_session_status))
        .route("/sessions/{id}/livekit-token", post(get_livekit_token))
}
