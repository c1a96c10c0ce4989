use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    auto_generate_questions, generate_questions, get_questions, submit_answer, submit_exam,
};
use crate::app_state::AppState;

pub fn assessment_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/{id}/generate", post(generate_questions))
        .route("/sessions/{id}/auto-generate", post(auto_generate_questions))
        .route("/sessions/{id}/questions", get(get_questions))
        .route("/sessions/{id}/answer", post(submit_answer))
        .route("/sessions/{id}/submit", post(submit_exam))
}
