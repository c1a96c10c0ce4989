use axum::{middleware, routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::observability_middleware,
    modules::{
        assessments::routes::assessment_routes, avatar::routes::avatar_routes,
        sessions::routes::session_routes, trainees::routes::trainee_routes,
        videos::routes::video_routes,
    },
};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(trainee_routes())
        .merge(session_routes())
        .merge(assessment_routes())
        .merge(avatar_routes())
        .merge(video_routes());

    // The browser frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(observability_middleware))
        .layer(cors)
        .with_state(state)
}

async fn hello() -> &'static str {
    "Examiner Backend says hello!\n"
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status
        }
    }))
}
