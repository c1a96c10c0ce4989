use rand::seq::SliceRandom;
use sqlx::PgPool;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::db::models::{GlobalQuestion, Trainee};
use crate::db::repositories::QuestionRepository;
use crate::error::AppResult;
use crate::services::gemini::GeminiClient;
use crate::services::{pdf, question_generator};

/// Questions generated when the pool is first bootstrapped.
pub const POOL_TARGET_SIZE: usize = 20;
/// Questions drawn per session.
pub const DEFAULT_ASSIGNMENT_SIZE: usize = 5;

/// Advisory lock key claimed while the pool is being generated, so only
/// one caller generates; concurrent callers block and then no-op.
const POOL_INIT_LOCK_KEY: i64 = 815_321;

#[derive(Debug, PartialEq, Eq)]
pub enum PoolInit {
    AlreadyInitialized { active: i64 },
    Generated { created: usize },
}

/// Make sure at least `target_count` active questions exist, generating
/// the pool from the stored training document on first use.
pub async fn ensure_initialized(
    pool: &PgPool,
    client: &GeminiClient,
    config: &Config,
    trainee: &Trainee,
    target_count: usize,
) -> AppResult<PoolInit> {
    let active = QuestionRepository::count_active(pool).await?;
    if active >= target_count as i64 {
        return Ok(PoolInit::AlreadyInitialized { active });
    }

    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(POOL_INIT_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    // Another caller may have generated while we waited on the lock.
    let active = QuestionRepository::count_active(&mut *tx).await?;
    if active >= target_count as i64 {
        tx.commit().await?;
        return Ok(PoolInit::AlreadyInitialized { active });
    }

    let document_path = Path::new(&config.app.training_material_path);
    let document_text = pdf::extract_text(document_path)?;

    let generated = question_generator::generate_questions(
        client,
        &trainee.job_title,
        &trainee.industry,
        &document_text,
        target_count,
    )
    .await?;

    let mut created = 0;
    for question in generated {
        QuestionRepository::insert_global(&mut tx, &question.into()).await?;
        created += 1;
    }
    tx.commit().await?;

    info!(created, "Global question pool initialized");
    Ok(PoolInit::Generated { created })
}

/// Add questions generated from an uploaded document to the pool.
pub async fn seed_from_bytes(
    pool: &PgPool,
    client: &GeminiClient,
    trainee: &Trainee,
    document: &[u8],
    num_questions: usize,
) -> AppResult<usize> {
    let document_text = pdf::extract_text_from_bytes(document)?;

    let generated = question_generator::generate_questions(
        client,
        &trainee.job_title,
        &trainee.industry,
        &document_text,
        num_questions,
    )
    .await?;

    let mut tx = pool.begin().await?;
    let mut created = 0;
    for question in generated {
        QuestionRepository::insert_global(&mut tx, &question.into()).await?;
        created += 1;
    }
    tx.commit().await?;

    info!(created, "Seeded question pool from uploaded document");
    Ok(created)
}

/// Uniform draw without replacement; draw order becomes display order.
pub fn draw_random_subset(questions: &[GlobalQuestion], count: usize) -> Vec<GlobalQuestion> {
    let mut rng = rand::thread_rng();
    questions
        .choose_multiple(&mut rng, count)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::AnswerOption;
    use std::collections::HashSet;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn bank(size: usize) -> Vec<GlobalQuestion> {
        (0..size)
            .map(|i| GlobalQuestion {
                id: Uuid::new_v4(),
                question_text: format!("question-{i}"),
                option_a: "a".to_string(),
                option_b: "b".to_string(),
                option_c: "c".to_string(),
                option_d: "d".to_string(),
                correct_answer: AnswerOption::A,
                explanation: None,
                is_active: true,
                created_at: OffsetDateTime::now_utc(),
            })
            .collect()
    }

    #[test]
    fn draws_requested_count_without_duplicates() {
        let questions = bank(20);
        for _ in 0..50 {
            let drawn = draw_random_subset(&questions, 5);
            assert_eq!(drawn.len(), 5);
            let ids: HashSet<_> = drawn.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), 5);
        }
    }

    #[test]
    fn drawn_questions_come_from_the_bank() {
        let questions = bank(8);
        let bank_ids: HashSet<_> = questions.iter().map(|q| q.id).collect();
        let drawn = draw_random_subset(&questions, 8);
        assert!(drawn.iter().all(|q| bank_ids.contains(&q.id)));
    }
}
