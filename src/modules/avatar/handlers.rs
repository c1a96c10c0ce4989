use axum::{
    extract::{Path, State},
    Json,
};
use secrecy::ExposeSecret;
use serde_json::json;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::modules::sessions::handlers::{load_session, load_session_trainee};
use crate::services::livekit;

const AVATAR_STATUS_TIMEOUT: Duration = Duration::from_secs(10);

/// Mint room credentials for the avatar greeting. The avatar agent runs
/// separately and joins the room on its own.
pub async fn generate_avatar_greeting(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let session = load_session(&state.db, session_id).await?;
    let trainee = load_session_trainee(&state.db, &session).await?;

    let room_name = format!("training-session-{}", session_id);
    let token = livekit::mint_room_token(&state.env.livekit, &room_name, &trainee.name)
        .map_err(|err| {
            AppError::InternalServerError(format!("Failed to generate token: {}", err))
        })?;

    info!(room = %room_name, participant = %trainee.name, "Generated greeting room credentials");

    Ok(Json(json!({
        "success": true,
        "room_name": room_name,
        "livekit_url": state.env.livekit.url,
        "livekit_token": token,
        "participant_name": trainee.name,
        "message": "LiveKit credentials generated. Avatar agent will join automatically if running.",
    })))
}

/// Proxy a status lookup to the avatar-video provider.
pub async fn check_avatar_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let avatar = state
        .env
        .avatar
        .as_ref()
        .ok_or_else(|| AppError::ExternalService("Avatar provider is not configured".to_string()))?;

    let url = format!("{}/v1/avatars/status/{}", avatar.base_url, job_id);
    let response = state
        .http
        .get(&url)
        .bearer_auth(avatar.api_key.expose_secret())
        .timeout(AVATAR_STATUS_TIMEOUT)
        .send()
        .await
        .map_err(|err| {
            AppError::ExternalService(format!("Failed to check avatar status: {}", err))
        })?;

    if !response.status().is_success() {
        return Err(AppError::ExternalService(format!(
            "Avatar status endpoint returned {}",
            response.status()
        )));
    }

    let payload = response.json::<serde_json::Value>().await.map_err(|err| {
        AppError::ExternalService(format!("Invalid avatar status response: {}", err))
    })?;

    Ok(Json(payload))
}
