use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{NewTrainee, Trainee, UpdateTrainee};
use crate::db::repositories::{SessionRepository, TraineeRepository};
use crate::error::{AppError, AppResult};

/// Register a new trainee and open their initial training session.
pub async fn register_trainee(
    State(state): State<AppState>,
    Json(payload): Json<NewTrainee>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let mut tx = state.db.begin().await?;
    let trainee = TraineeRepository::create(&mut tx, &payload).await?;
    let session = SessionRepository::create(&mut tx, trainee.id).await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "trainee_id": trainee.id,
            "session_id": session.id,
            "name": trainee.name,
            "job_title": trainee.job_title,
            "industry": trainee.industry,
            "message": "Registration successful",
        })),
    ))
}

pub async fn list_trainees(State(state): State<AppState>) -> AppResult<Json<Vec<Trainee>>> {
    let trainees = TraineeRepository::list(&state.db).await?;
    Ok(Json(trainees))
}

pub async fn get_trainee(
    State(state): State<AppState>,
    Path(trainee_id): Path<Uuid>,
) -> AppResult<Json<Trainee>> {
    let trainee = TraineeRepository::find_by_id(&state.db, trainee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trainee {} not found", trainee_id)))?;
    Ok(Json(trainee))
}

pub async fn update_trainee(
    State(state): State<AppState>,
    Path(trainee_id): Path<Uuid>,
    Json(payload): Json<UpdateTrainee>,
) -> AppResult<Json<Trainee>> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    TraineeRepository::find_by_id(&state.db, trainee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trainee {} not found", trainee_id)))?;

    let trainee = TraineeRepository::update(&state.db, trainee_id, &payload).await?;
    Ok(Json(trainee))
}

pub async fn delete_trainee(
    State(state): State<AppState>,
    Path(trainee_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = TraineeRepository::delete(&state.db, trainee_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Trainee {} not found", trainee_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
