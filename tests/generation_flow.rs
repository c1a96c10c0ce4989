//! Exercises the generation-to-scoring pipeline on in-memory data:
//! parse a model reply, draw an assignment, grade it, build feedback.

use std::collections::HashSet;

use time::OffsetDateTime;
use uuid::Uuid;

use examiner_backend::db::models::{AnswerOption, GlobalQuestion, NewGlobalQuestion};
use examiner_backend::services::feedback::{self, MissedQuestion};
use examiner_backend::services::question_generator::parse_questions;
use examiner_backend::services::question_pool::{draw_random_subset, POOL_TARGET_SIZE};

fn model_reply(count: usize) -> String {
    let labels = ["A", "B", "C", "D"];
    let items: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"question_text": "Question {i}?",
                     "option_a": "First",
                     "option_b": "Second",
                     "option_c": "Third",
                     "option_d": "Fourth",
                     "correct_answer": "{}",
                     "explanation": "Because."}}"#,
                labels[i % labels.len()]
            )
        })
        .collect();
    format!("```json\n[{}]\n```", items.join(","))
}

fn bank_from_reply(reply: &str) -> Vec<GlobalQuestion> {
    parse_questions(reply)
        .unwrap()
        .into_iter()
        .map(|generated| {
            let question: NewGlobalQuestion = generated.into();
            GlobalQuestion {
                id: Uuid::new_v4(),
                question_text: question.question_text,
                option_a: question.option_a,
                option_b: question.option_b,
                option_c: question.option_c,
                option_d: question.option_d,
                correct_answer: question.correct_answer,
                explanation: question.explanation,
                is_active: true,
                created_at: OffsetDateTime::now_utc(),
            }
        })
        .collect()
}

#[test]
fn reply_parses_into_a_full_bank() {
    let bank = bank_from_reply(&model_reply(POOL_TARGET_SIZE));
    assert_eq!(bank.len(), POOL_TARGET_SIZE);
    assert!(bank.iter().all(|q| q.is_active));
}

#[test]
fn assignment_draw_is_distinct_within_a_session() {
    let bank = bank_from_reply(&model_reply(POOL_TARGET_SIZE));

    let drawn = draw_random_subset(&bank, 5);
    assert_eq!(drawn.len(), 5);

    let ids: HashSet<Uuid> = drawn.iter().map(|q| q.id).collect();
    assert_eq!(ids.len(), 5, "a question must not be drawn twice");
}

#[test]
fn scoring_counts_unanswered_as_wrong() {
    let bank = bank_from_reply(&model_reply(POOL_TARGET_SIZE));
    let assigned = draw_random_subset(&bank, 5);

    // Three correct answers, two questions left unanswered.
    let recorded: Vec<(Uuid, AnswerOption)> = assigned
        .iter()
        .take(3)
        .map(|q| (q.id, q.correct_answer))
        .collect();

    let correct_count = recorded
        .iter()
        .filter(|(question_id, selected)| {
            assigned
                .iter()
                .find(|q| q.id == *question_id)
                .is_some_and(|q| q.correct_answer == *selected)
        })
        .count() as i32;
    let total_count = assigned.len() as i32;

    assert_eq!(correct_count, 3);
    assert_eq!(total_count, 5);
    assert!(correct_count <= total_count);
    assert_eq!(feedback::percentage(correct_count, total_count), 60.0);
}

#[test]
fn feedback_prompt_covers_missed_questions() {
    let bank = bank_from_reply(&model_reply(POOL_TARGET_SIZE));
    let assigned = draw_random_subset(&bank, 5);

    let missed: Vec<MissedQuestion> = assigned
        .iter()
        .skip(3)
        .map(|question| MissedQuestion {
            question_text: question.question_text.clone(),
            correct_answer: question.correct_answer,
            selected_answer: if question.correct_answer == AnswerOption::A {
                AnswerOption::B
            } else {
                AnswerOption::A
            },
        })
        .collect();

    let text = feedback::fallback_feedback("Alice", "Nurse", "Healthcare", 3, 5);
    assert!(text.contains("3 out of 5"));
    assert!(text.contains("60.0%"));
    assert!(text.contains("Nurse"));
    assert_eq!(missed.len(), 2);
}
