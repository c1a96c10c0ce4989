use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{delete_trainee, get_trainee, list_trainees, register_trainee, update_trainee};
use crate::app_state::AppState;

pub fn trainee_routes() -> Router<AppState> {
    Router::new()
        .route("/trainees/register", post(register_trainee))
        .route("/trainees", get(list_trainees))
        .route(
            "/trainees/{id}",
            get(get_trainee).patch(update_trainee).delete(delete_trainee),
        )
}
