use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{NewVideo, UpdateVideo, Video};
use crate::db::repositories::VideoRepository;
use crate::error::{AppError, AppResult};

pub async fn list_videos(State(state): State<AppState>) -> AppResult<Json<Vec<Video>>> {
    let videos = VideoRepository::list(&state.db).await?;
    Ok(Json(videos))
}

pub async fn create_video(
    State(state): State<AppState>,
    Json(payload): Json<NewVideo>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let video = VideoRepository::create(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
) -> AppResult<Json<Video>> {
    let video = VideoRepository::find_by_id(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;
    Ok(Json(video))
}

pub async fn update_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    Json(payload): Json<UpdateVideo>,
) -> AppResult<Json<Video>> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    VideoRepository::find_by_id(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    let video = VideoRepository::update(&state.db, video_id, &payload).await?;
    Ok(Json(video))
}

pub async fn delete_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = VideoRepository::delete(&state.db, video_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Video {} not found", video_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
