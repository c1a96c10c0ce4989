use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{
    AnswerOption, GlobalQuestion, QuestionDetail, QuestionPublic, Trainee, TrainingSession,
};
use crate::db::repositories::{QuestionRepository, SessionRepository};
use crate::error::{AppError, AppResult};
use crate::modules::sessions::handlers::{load_session, load_session_trainee};
use crate::services::feedback::{self, MissedQuestion};
use crate::services::question_pool::{self, DEFAULT_ASSIGNMENT_SIZE, POOL_TARGET_SIZE};

/// Questions requested per uploaded document.
const DEFAULT_UPLOAD_QUESTION_COUNT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct AutoGenerateRequest {
    pub num_questions: Option<usize>,
}

/// Assign questions to a session, bootstrapping the shared pool on first
/// use. Replaying the call returns the original assignment unchanged.
pub async fn auto_generate_questions(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: Option<Json<AutoGenerateRequest>>,
) -> AppResult<impl IntoResponse> {
    let pool_size = payload
        .and_then(|Json(request)| request.num_questions)
        .unwrap_or(DEFAULT_ASSIGNMENT_SIZE);
    if pool_size == 0 || pool_size > POOL_TARGET_SIZE {
        return Err(AppError::Validation(format!(
            "num_questions must be between 1 and {}",
            POOL_TARGET_SIZE
        )));
    }

    let session = load_session(&state.db, session_id).await?;

    let existing = QuestionRepository::list_assigned(&state.db, session_id).await?;
    if !existing.is_empty() {
        return Ok((StatusCode::OK, question_set_response(session_id, &existing)));
    }

    let trainee = load_session_trainee(&state.db, &session).await?;
    let assigned = assign_questions(&state, &session, &trainee, pool_size).await?;

    Ok((StatusCode::CREATED, question_set_response(session_id, &assigned)))
}

/// Generate questions from an uploaded PDF. The questions land in the
/// shared pool; the session is then assigned from it as usual.
pub async fn generate_questions(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let session = load_session(&state.db, session_id).await?;
    let trainee = load_session_trainee(&state.db, &session).await?;

    let mut pdf_bytes = None;
    let mut num_questions = DEFAULT_UPLOAD_QUESTION_COUNT;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Validation(format!("Invalid multipart payload: {}", err)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf_file" => {
                let bytes = field.bytes().await.map_err(|err| {
                    AppError::Validation(format!("Failed to read uploaded file: {}", err))
                })?;
                pdf_bytes = Some(bytes);
            }
            "num_questions" => {
                let text = field.text().await.map_err(|err| {
                    AppError::Validation(format!("Failed to read num_questions: {}", err))
                })?;
                num_questions = text.trim().parse().map_err(|_| {
                    AppError::Validation(format!("Invalid num_questions: {}", text))
                })?;
                if num_questions == 0 {
                    return Err(AppError::Validation(
                        "num_questions must be at least 1".to_string(),
                    ));
                }
            }
            _ => {}
        }
    }

    let pdf_bytes =
        pdf_bytes.ok_or_else(|| AppError::Validation("PDF file is required".to_string()))?;

    question_pool::seed_from_bytes(&state.db, &state.ai, &trainee, &pdf_bytes, num_questions)
        .await?;

    let existing = QuestionRepository::list_assigned(&state.db, session_id).await?;
    if !existing.is_empty() {
        return Ok((StatusCode::OK, question_set_response(session_id, &existing)));
    }

    // The uploaded document just fed the pool; draw from it directly
    // instead of bootstrapping from the stored training material.
    let assigned = draw_and_assign(&state, &session, DEFAULT_ASSIGNMENT_SIZE).await?;
    Ok((StatusCode::CREATED, question_set_response(session_id, &assigned)))
}

pub async fn get_questions(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    load_session(&state.db, session_id).await?;
    let questions = QuestionRepository::list_assigned(&state.db, session_id).await?;
    Ok(question_set_response(session_id, &questions))
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: Uuid,
    pub selected_answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub question_text: String,
    pub selected_answer: AnswerOption,
    pub is_correct: bool,
    pub correct_answer: AnswerOption,
    #[serde(with = "time::serde::rfc3339")]
    pub answered_at: OffsetDateTime,
}

/// Record one answer. Correctness comes from the bank's answer key and
/// is returned immediately; resubmission overwrites the previous pick.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> AppResult<impl IntoResponse> {
    load_session(&state.db, session_id).await?;

    let selected: AnswerOption = payload.selected_answer.parse().map_err(AppError::Validation)?;

    let question = QuestionRepository::find_by_id(&state.db, payload.question_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Question {} not found", payload.question_id))
        })?;

    QuestionRepository::find_assignment(&state.db, session_id, question.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Question {} is not assigned to session {}",
                question.id, session_id
            ))
        })?;

    let previous = QuestionRepository::find_answer(&state.db, session_id, question.id).await?;

    let is_correct = selected == question.correct_answer;
    let answer =
        QuestionRepository::upsert_answer(&state.db, session_id, question.id, selected, is_correct)
            .await?;

    let status = if previous.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(AnswerResponse {
            id: answer.id,
            question_id: answer.question_id,
            question_text: question.question_text,
            selected_answer: answer.selected_answer,
            is_correct: answer.is_correct,
            correct_answer: question.correct_answer,
            answered_at: answer.answered_at,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct ExamResultResponse {
    pub score: i32,
    pub total: i32,
    pub percentage: f64,
    pub feedback: String,
    pub questions_review: Vec<QuestionDetail>,
}

/// Score the exam. Unanswered questions count toward the total but not
/// the score. The review list is the one place the full answer key goes
/// out in bulk.
pub async fn submit_exam(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<ExamResultResponse>> {
    let session = load_session(&state.db, session_id).await?;
    let trainee = load_session_trainee(&state.db, &session).await?;

    let assigned = QuestionRepository::list_assigned(&state.db, session_id).await?;
    let answers = QuestionRepository::list_answers(&state.db, session_id).await?;

    let answers_by_question: HashMap<Uuid, _> = answers
        .iter()
        .map(|answer| (answer.question_id, answer))
        .collect();

    let correct_count = answers.iter().filter(|answer| answer.is_correct).count() as i32;
    let total_count = assigned.len() as i32;

    SessionRepository::record_exam_result(&state.db, session_id, correct_count, total_count)
        .await?;

    let missed: Vec<MissedQuestion> = assigned
        .iter()
        .filter_map(|question| {
            answers_by_question.get(&question.id).and_then(|answer| {
                if answer.is_correct {
                    None
                } else {
                    Some(MissedQuestion {
                        question_text: question.question_text.clone(),
                        correct_answer: question.correct_answer,
                        selected_answer: answer.selected_answer,
                    })
                }
            })
        })
        .collect();

    let feedback_text =
        feedback::generate_feedback(&state.ai, &trainee, correct_count, total_count, &missed)
            .await;

    Ok(Json(ExamResultResponse {
        score: correct_count,
        total: total_count,
        percentage: feedback::percentage(correct_count, total_count),
        feedback: feedback_text,
        questions_review: assigned.iter().map(GlobalQuestion::detail_view).collect(),
    }))
}

/// Bootstrap the pool if needed, then draw a fresh assignment.
async fn assign_questions(
    state: &AppState,
    session: &TrainingSession,
    trainee: &Trainee,
    pool_size: usize,
) -> AppResult<Vec<GlobalQuestion>> {
    question_pool::ensure_initialized(&state.db, &state.ai, &state.env, trainee, POOL_TARGET_SIZE)
        .await?;

    draw_and_assign(state, session, pool_size).await
}

/// Draw `pool_size` questions for the session and mark its exam as sized.
async fn draw_and_assign(
    state: &AppState,
    session: &TrainingSession,
    pool_size: usize,
) -> AppResult<Vec<GlobalQuestion>> {
    let active = QuestionRepository::list_active(&state.db).await?;
    if active.len() < pool_size {
        return Err(AppError::InsufficientData(format!(
            "Question pool has {} active questions, {} required",
            active.len(),
            pool_size
        )));
    }

    let drawn = question_pool::draw_random_subset(&active, pool_size);

    let mut tx = state.db.begin().await?;
    for (index, question) in drawn.iter().enumerate() {
        QuestionRepository::insert_assignment(&mut tx, session.id, question.id, (index + 1) as i32)
            .await?;
    }
    SessionRepository::set_exam_size(&mut tx, session.id, pool_size as i32).await?;
    tx.commit().await?;

    Ok(drawn)
}

fn question_set_response(
    session_id: Uuid,
    questions: &[GlobalQuestion],
) -> Json<serde_json::Value> {
    let views: Vec<QuestionPublic> = questions.iter().map(GlobalQuestion::public_view).collect();
    let total = views.len();
    Json(json!({
        "session_id": session_id,
        "questions": views,
        "total_questions": total,
    }))
}
