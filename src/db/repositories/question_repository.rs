use sqlx::{Error, PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{
    Answer, AnswerOption, GlobalQuestion, NewGlobalQuestion, SessionQuestion,
};

const QUESTION_COLUMNS: &str = "id, question_text, option_a, option_b, option_c, option_d, \
     correct_answer, explanation, is_active, created_at";

pub struct QuestionRepository;

impl QuestionRepository {
    pub async fn count_active<'e, E>(executor: E) -> Result<i64, Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM global_questions WHERE is_active")
            .fetch_one(executor)
            .await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<GlobalQuestion>, Error> {
        sqlx::query_as::<_, GlobalQuestion>(&format!(
            "SELECT {} FROM global_questions WHERE is_active ORDER BY created_at",
            QUESTION_COLUMNS
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        question_id: Uuid,
    ) -> Result<Option<GlobalQuestion>, Error> {
        sqlx::query_as::<_, GlobalQuestion>(&format!(
            "SELECT {} FROM global_questions WHERE id = $1",
            QUESTION_COLUMNS
        ))
        .bind(question_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert_global(
        tx: &mut Transaction<'_, Postgres>,
        question: &NewGlobalQuestion,
    ) -> Result<GlobalQuestion, Error> {
        sqlx::query_as::<_, GlobalQuestion>(&format!(
            r#"
            INSERT INTO global_questions
                (question_text, option_a, option_b, option_c, option_d, correct_answer, explanation)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(&question.question_text)
        .bind(&question.option_a)
        .bind(&question.option_b)
        .bind(&question.option_c)
        .bind(&question.option_d)
        .bind(question.correct_answer)
        .bind(&question.explanation)
        .fetch_one(&mut **tx)
        .await
    }

    /// Questions assigned to a session in their per-session display order.
    pub async fn list_assigned(
        pool: &PgPool,
        session_id: Uuid,
    ) -> Result<Vec<GlobalQuestion>, Error> {
        sqlx::query_as::<_, GlobalQuestion>(
            r#"
            SELECT q.id, q.question_text, q.option_a, q.option_b, q.option_c, q.option_d,
                   q.correct_answer, q.explanation, q.is_active, q.created_at
            FROM session_questions sq
            JOIN global_questions q ON q.id = sq.question_id
            WHERE sq.session_id = $1
            ORDER BY sq.display_order
            "#,
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }

    pub async fn insert_assignment(
        tx: &mut Transaction<'_, Postgres>,
        session_id: Uuid,
        question_id: Uuid,
        display_order: i32,
    ) -> Result<SessionQuestion, Error> {
        sqlx::query_as::<_, SessionQuestion>(
            r#"
            INSERT INTO session_questions (session_id, question_id, display_order)
            VALUES ($1, $2, $3)
            RETURNING id, session_id, question_id, display_order, created_at
            "#,
        )
        .bind(session_id)
        .bind(question_id)
        .bind(display_order)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_assignment(
        pool: &PgPool,
        session_id: Uuid,
        question_id: Uuid,
    ) -> Result<Option<SessionQuestion>, Error> {
        sqlx::query_as::<_, SessionQuestion>(
            r#"
            SELECT id, session_id, question_id, display_order, created_at
            FROM session_questions
            WHERE session_id = $1 AND question_id = $2
            "#,
        )
        .bind(session_id)
        .bind(question_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_answer(
        pool: &PgPool,
        session_id: Uuid,
        question_id: Uuid,
    ) -> Result<Option<Answer>, Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, session_id, question_id, selected_answer, is_correct, answered_at
            FROM answers
            WHERE session_id = $1 AND question_id = $2
            "#,
        )
        .bind(session_id)
        .bind(question_id)
        .fetch_optional(pool)
        .await
    }

    /// Resubmission overwrites; the (session, question) key keeps one row.
    pub async fn upsert_answer(
        pool: &PgPool,
        session_id: Uuid,
        question_id: Uuid,
        selected_answer: AnswerOption,
        is_correct: bool,
    ) -> Result<Answer, Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (session_id, question_id, selected_answer, is_correct)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (session_id, question_id) DO UPDATE
                SET selected_answer = EXCLUDED.selected_answer,
                    is_correct = EXCLUDED.is_correct,
                    answered_at = NOW()
            RETURNING id, session_id, question_id, selected_answer, is_correct, answered_at
            "#,
        )
        .bind(session_id)
        .bind(question_id)
        .bind(selected_answer)
        .bind(is_correct)
        .fetch_one(pool)
        .await
    }

    pub async fn list_answers(pool: &PgPool, session_id: Uuid) -> Result<Vec<Answer>, Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, session_id, question_id, selected_answer, is_correct, answered_at
            FROM answers
            WHERE session_id = $1
            ORDER BY answered_at
            "#,
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }
}
