use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{SessionStatus, Trainee, TrainingSession, UpdateTrainingSession};
use crate::db::repositories::{SessionRepository, TraineeRepository};
use crate::error::{AppError, AppResult};
use crate::services::livekit;

pub(crate) async fn load_session(
    pool: &PgPool,
    session_id: Uuid,
) -> AppResult<TrainingSession> {
    SessionRepository::find_by_id(pool, session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))
}

pub(crate) async fn load_session_trainee(
    pool: &PgPool,
    session: &TrainingSession,
) -> AppResult<Trainee> {
    TraineeRepository::find_by_id(pool, session.trainee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trainee {} not found", session.trainee_id)))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: TrainingSession,
    pub trainee_name: String,
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let session = load_session(&state.db, session_id).await?;
    let trainee = load_session_trainee(&state.db, &session).await?;

    Ok(Json(SessionResponse {
        session,
        trainee_name: trainee.name,
    }))
}

pub async fn update_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<UpdateTrainingSession>,
) -> AppResult<Json<SessionResponse>> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    load_session(&state.db, session_id).await?;
    let session = SessionRepository::update(&state.db, session_id, &payload).await?;
    let trainee = load_session_trainee(&state.db, &session).await?;

    Ok(Json(SessionResponse {
        session,
        trainee_name: trainee.name,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Move the session to a later workflow stage. Backward or repeated
/// transitions are rejected.
pub async fn update_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let new_status: SessionStatus = payload.status.parse().map_err(AppError::Validation)?;

    let session = load_session(&state.db, session_id).await?;
    if !session.status.can_advance_to(new_status) {
        return Err(AppError::Validation(format!(
            "Cannot move session from {} to {}",
            session.status, new_status
        )));
    }

    let session = SessionRepository::update_status(&state.db, session_id, new_status).await?;

    Ok(Json(json!({
        "session_id": session.id,
        "status": session.status,
        "message": format!("Status updated to {}", new_status),
    })))
}

/// Mint a room token for the greeting room of this session.
pub async fn get_livekit_token(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let session = load_session(&state.db, session_id).await?;
    let trainee = load_session_trainee(&state.db, &session).await?;

    let room_name = format!("greeting-{}", session_id);
    let token = livekit::mint_room_token(&state.env.livekit, &room_name, &trainee.name)
        .map_err(|err| {
            AppError::InternalServerError(format!("Failed to generate token: {}", err))
        })?;

    Ok(Json(json!({
        "token": token,
        "room_name": room_name,
        "livekit_url": state.env.livekit.url,
        "trainee_name": trainee.name,
    })))
}
