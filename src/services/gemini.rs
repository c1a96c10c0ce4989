use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::GeminiConfig;

const GENERATE_CONTENT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("AI reply contained no text")]
    EmptyReply,

    #[error("Failed to parse AI reply as JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Malformed AI reply: {0}")]
    Malformed(String),
}

/// Thin client for the Gemini `generateContent` endpoint. One prompt in,
/// the first candidate's text out.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Arc<SecretBox<String>>,
    model: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: &GeminiConfig) -> Self {
        Self {
            http,
            api_key: Arc::clone(&config.api_key),
            model: config.model.clone(),
        }
    }

    pub async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/{}:generateContent", GENERATE_CONTENT_BASE, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!(model = %self.model, "Calling generative AI endpoint");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret().as_str())
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiError::Status(response.status()));
        }

        let reply: GenerateContentResponse = response.json().await?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(AiError::EmptyReply)?;

        Ok(text.trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: String,
}
