use sqlx::{Error, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{NewTrainee, Trainee, UpdateTrainee};

pub struct TraineeRepository;

impl TraineeRepository {
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        new_trainee: &NewTrainee,
    ) -> Result<Trainee, Error> {
        sqlx::query_as::<_, Trainee>(
            r#"
            INSERT INTO trainees (name, email, job_title, industry, company)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, job_title, industry, company, created_at, updated_at
            "#,
        )
        .bind(&new_trainee.name)
        .bind(&new_trainee.email)
        .bind(&new_trainee.job_title)
        .bind(&new_trainee.industry)
        .bind(&new_trainee.company)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, trainee_id: Uuid) -> Result<Option<Trainee>, Error> {
        sqlx::query_as::<_, Trainee>(
            r#"
            SELECT id, name, email, job_title, industry, company, created_at, updated_at
            FROM trainees
            WHERE id = $1
            "#,
        )
        .bind(trainee_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Trainee>, Error> {
        sqlx::query_as::<_, Trainee>(
            r#"
            SELECT id, name, email, job_title, industry, company, created_at, updated_at
            FROM trainees
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        trainee_id: Uuid,
        update: &UpdateTrainee,
    ) -> Result<Trainee, Error> {
        sqlx::query_as::<_, Trainee>(
            r#"
            UPDATE trainees
            SET
                name = COALESCE($1, name),
                email = COALESCE($2, email),
                job_title = COALESCE($3, job_title),
                industry = COALESCE($4, industry),
                company = COALESCE($5, company),
                updated_at = NOW()
            WHERE id = $6
            RETURNING id, name, email, job_title, industry, company, created_at, updated_at
            "#,
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.job_title)
        .bind(&update.industry)
        .bind(&update.company)
        .bind(trainee_id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, trainee_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM trainees WHERE id = $1")
            .bind(trainee_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
