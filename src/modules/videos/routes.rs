use axum::{routing::get, Router};

use super::handlers::{create_video, delete_video, get_video, list_videos, update_video};
use crate::app_state::AppState;

pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(list_videos).post(create_video))
        .route(
            "/videos/{id}",
            get(get_video).patch(update_video).delete(delete_video),
        )
}
