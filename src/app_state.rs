use sqlx::PgPool;

use crate::config::Config;
use crate::services::GeminiClient;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: Config,
    pub http: reqwest::Client,
    pub ai: GeminiClient,
}

impl AppState {
    pub fn new(db: PgPool, env: Config, http: reqwest::Client) -> Self {
        let ai = GeminiClient::new(http.clone(), &env.gemini);
        Self { db, env, http, ai }
    }
}
