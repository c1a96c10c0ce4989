use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{check_avatar_status, generate_avatar_greeting};
use crate::app_state::AppState;

pub fn avatar_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/{id}/avatar-greeting", post(generate_avatar_greeting))
        .route("/avatar-status/{job_id}", get(check_avatar_status))
}
