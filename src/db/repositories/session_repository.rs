use sqlx::{Error, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{SessionStatus, TrainingSession, UpdateTrainingSession};

const SESSION_COLUMNS: &str = "id, trainee_id, status, video_url, video_completed, \
     mcq_score, mcq_total, started_at, completed_at";

pub struct SessionRepository;

impl SessionRepository {
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        trainee_id: Uuid,
    ) -> Result<TrainingSession, Error> {
        sqlx::query_as::<_, TrainingSession>(&format!(
            "INSERT INTO training_sessions (trainee_id) VALUES ($1) RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(trainee_id)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        session_id: Uuid,
    ) -> Result<Option<TrainingSession>, Error> {
        sqlx::query_as::<_, TrainingSession>(&format!(
            "SELECT {} FROM training_sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(session_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        session_id: Uuid,
        update: &UpdateTrainingSession,
    ) -> Result<TrainingSession, Error> {
        sqlx::query_as::<_, TrainingSession>(&format!(
            r#"
            UPDATE training_sessions
            SET
                video_url = COALESCE($1, video_url),
                video_completed = COALESCE($2, video_completed),
                completed_at = COALESCE($3, completed_at)
            WHERE id = $4
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(&update.video_url)
        .bind(update.video_completed)
        .bind(update.completed_at)
        .bind(session_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update_status(
        pool: &PgPool,
        session_id: Uuid,
        status: SessionStatus,
    ) -> Result<TrainingSession, Error> {
        sqlx::query_as::<_, TrainingSession>(&format!(
            "UPDATE training_sessions SET status = $1 WHERE id = $2 RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(status)
        .bind(session_id)
        .fetch_one(pool)
        .await
    }

    /// Marks the exam as sized once questions are assigned.
    pub async fn set_exam_size(
        tx: &mut Transaction<'_, Postgres>,
        session_id: Uuid,
        total: i32,
    ) -> Result<TrainingSession, Error> {
        sqlx::query_as::<_, TrainingSession>(&format!(
            "UPDATE training_sessions SET status = $1, mcq_total = $2 WHERE id = $3 RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(SessionStatus::Mcq)
        .bind(total)
        .bind(session_id)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn record_exam_result(
        pool: &PgPool,
        session_id: Uuid,
        score: i32,
        total: i32,
    ) -> Result<TrainingSession, Error> {
        sqlx::query_as::<_, TrainingSession>(&format!(
            r#"
            UPDATE training_sessions
            SET status = $1, mcq_score = $2, mcq_total = $3
            WHERE id = $4
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(SessionStatus::Feedback)
        .bind(score)
        .bind(total)
        .bind(session_id)
        .fetch_one(pool)
        .await
    }
}
