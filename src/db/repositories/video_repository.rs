use sqlx::{Error, PgPool};
use uuid::Uuid;

use crate::db::models::{NewVideo, UpdateVideo, Video};

pub struct VideoRepository;

impl VideoRepository {
    pub async fn create(pool: &PgPool, new_video: &NewVideo) -> Result<Video, Error> {
        sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (title, description, url)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, url, created_at, updated_at
            "#,
        )
        .bind(&new_video.title)
        .bind(&new_video.description)
        .bind(&new_video.url)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>, Error> {
        sqlx::query_as::<_, Video>(
            r#"
            SELECT id, title, description, url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(video_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Video>, Error> {
        sqlx::query_as::<_, Video>(
            r#"
            SELECT id, title, description, url, created_at, updated_at
            FROM videos
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        video_id: Uuid,
        update: &UpdateVideo,
    ) -> Result<Video, Error> {
        sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                url = COALESCE($3, url),
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, title, description, url, created_at, updated_at
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.url)
        .bind(video_id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, video_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(video_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
