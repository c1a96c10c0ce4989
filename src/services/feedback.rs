use tracing::warn;

use crate::db::models::{AnswerOption, Trainee};
use crate::services::gemini::GeminiClient;

/// At most this many missed questions are summarized for the model.
pub const MAX_FEEDBACK_QUESTIONS: usize = 5;
const MAX_QUESTION_SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct MissedQuestion {
    pub question_text: String,
    pub correct_answer: AnswerOption,
    pub selected_answer: AnswerOption,
}

pub fn percentage(score: i32, total: i32) -> f64 {
    if total == 0 {
        0.0
    } else {
        (score as f64 / total as f64) * 100.0
    }
}

/// Generate coaching feedback for a scored exam. Never fails: any
/// generation problem falls back to the canned template.
pub async fn generate_feedback(
    client: &GeminiClient,
    trainee: &Trainee,
    score: i32,
    total: i32,
    missed: &[MissedQuestion],
) -> String {
    let prompt = build_feedback_prompt(trainee, score, total, missed);

    match client.generate_text(&prompt).await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            warn!("Feedback generation returned an empty reply, using fallback");
            fallback_feedback(&trainee.name, &trainee.job_title, &trainee.industry, score, total)
        }
        Err(err) => {
            warn!(error = %err, "Feedback generation failed, using fallback");
            fallback_feedback(&trainee.name, &trainee.job_title, &trainee.industry, score, total)
        }
    }
}

pub fn build_feedback_prompt(
    trainee: &Trainee,
    score: i32,
    total: i32,
    missed: &[MissedQuestion],
) -> String {
    let missed_summary = missed
        .iter()
        .take(MAX_FEEDBACK_QUESTIONS)
        .map(|question| {
            let snippet: String = question
                .question_text
                .chars()
                .take(MAX_QUESTION_SNIPPET_CHARS)
                .collect();
            format!("- {}... (Correct: {})", snippet, question.correct_answer)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a supportive corporate training coach. Provide personalized feedback for a trainee.

**Trainee Profile:**
- Name: {name}
- Job Title: {job_title}
- Industry: {industry}

**Assessment Results:**
- Score: {score}/{total} ({pct:.1}%)
- Incorrect Questions:
{missed_summary}

**Task:**
Write encouraging, constructive feedback (200-300 words) that:
1. Congratulates them on their performance
2. Highlights areas of strength
3. Provides specific improvement recommendations relevant to their role
4. Encourages continued learning
5. Maintains a positive, professional tone

Generate the feedback now:
"#,
        name = trainee.name,
        job_title = trainee.job_title,
        industry = trainee.industry,
        pct = percentage(score, total),
    )
}

pub fn fallback_feedback(
    name: &str,
    job_title: &str,
    industry: &str,
    score: i32,
    total: i32,
) -> String {
    let pct = percentage(score, total);
    let verdict = if pct >= 80.0 {
        "Excellent work! You demonstrated strong understanding of the material."
    } else {
        "Good effort! There's room for improvement in some areas."
    };

    format!(
        r#"Dear {name},

Thank you for completing the training assessment. You scored {score} out of {total} ({pct:.1}%).

{verdict}

As a {job_title} in the {industry} industry, it's important to continue developing your skills.
We recommend reviewing the training material and focusing on the areas where you missed questions.

Keep up the great work!"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn trainee() -> Trainee {
        Trainee {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: None,
            job_title: "Nurse".to_string(),
            industry: "Healthcare".to_string(),
            company: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 5), 60.0);
    }

    #[test]
    fn fallback_switches_message_at_eighty_percent() {
        let high = fallback_feedback("Alice", "Nurse", "Healthcare", 4, 5);
        assert!(high.contains("Excellent work!"));
        assert!(high.contains("80.0%"));

        let low = fallback_feedback("Alice", "Nurse", "Healthcare", 3, 5);
        assert!(low.contains("Good effort!"));
        assert!(low.contains("60.0%"));
    }

    #[test]
    fn prompt_caps_missed_questions_at_five() {
        let missed: Vec<MissedQuestion> = (0..8)
            .map(|i| MissedQuestion {
                question_text: format!("question-{i}"),
                correct_answer: AnswerOption::B,
                selected_answer: AnswerOption::C,
            })
            .collect();

        let prompt = build_feedback_prompt(&trainee(), 2, 10, &missed);
        assert!(prompt.contains("question-4"));
        assert!(!prompt.contains("question-5"));
    }

    #[test]
    fn prompt_truncates_long_question_text() {
        let missed = vec![MissedQuestion {
            question_text: "x".repeat(500),
            correct_answer: AnswerOption::A,
            selected_answer: AnswerOption::D,
        }];

        let prompt = build_feedback_prompt(&trainee(), 0, 1, &missed);
        assert!(prompt.contains(&format!("- {}...", "x".repeat(100))));
        assert!(!prompt.contains(&"x".repeat(101)));
    }
}
