use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Trainee {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub job_title: String,
    pub industry: String,
    pub company: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTrainee {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub job_title: String,
    #[validate(length(min = 1))]
    pub industry: String,
    pub company: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTrainee {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub job_title: Option<String>,
    #[validate(length(min = 1))]
    pub industry: Option<String>,
    pub company: Option<String>,
}
