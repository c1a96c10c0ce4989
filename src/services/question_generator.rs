use serde::Deserialize;

use crate::db::models::{AnswerOption, NewGlobalQuestion};
use crate::services::gemini::{AiError, GeminiClient};

/// The model sees at most this much of the training document.
const MAX_DOCUMENT_CHARS: usize = 8000;

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl From<GeneratedQuestion> for NewGlobalQuestion {
    fn from(generated: GeneratedQuestion) -> Self {
        NewGlobalQuestion {
            question_text: generated.question_text,
            option_a: generated.option_a,
            option_b: generated.option_b,
            option_c: generated.option_c,
            option_d: generated.option_d,
            correct_answer: generated.correct_answer,
            explanation: generated.explanation,
        }
    }
}

pub async fn generate_questions(
    client: &GeminiClient,
    job_title: &str,
    industry: &str,
    document_text: &str,
    num_questions: usize,
) -> Result<Vec<GeneratedQuestion>, AiError> {
    let prompt = build_question_prompt(job_title, industry, document_text, num_questions);
    let reply = client.generate_text(&prompt).await?;
    parse_questions(&reply)
}

pub fn build_question_prompt(
    job_title: &str,
    industry: &str,
    document_text: &str,
    num_questions: usize,
) -> String {
    let excerpt: String = document_text.chars().take(MAX_DOCUMENT_CHARS).collect();

    format!(
        r#"You are an expert corporate training assessment designer. Generate {num_questions} multiple-choice questions (MCQs) for a training assessment.

**Trainee Context:**
- Job Title: {job_title}
- Industry: {industry}

**Training Material:**
{excerpt}

**Requirements:**
1. Generate exactly {num_questions} questions that are relevant to both the trainee's role and the training material
2. Questions should test practical knowledge applicable to their job
3. Each question must have 4 options (A, B, C, D)
4. Only ONE option should be correct
5. Include a brief explanation for the correct answer
6. Make questions progressively challenging (easy -> medium -> hard)

**Output Format (JSON):**
Return ONLY a valid JSON array with this exact structure:
[
  {{
    "question_text": "Question text here?",
    "option_a": "First option",
    "option_b": "Second option",
    "option_c": "Third option",
    "option_d": "Fourth option",
    "correct_answer": "A",
    "explanation": "Brief explanation of why this is correct"
  }}
]

Generate the questions now:
"#
    )
}

/// Models tend to wrap JSON in markdown fences; accept both fenced and bare replies.
pub fn parse_questions(reply: &str) -> Result<Vec<GeneratedQuestion>, AiError> {
    let payload = strip_code_fences(reply);
    let questions: Vec<GeneratedQuestion> = serde_json::from_str(payload)?;

    if questions.is_empty() {
        return Err(AiError::Malformed("reply contained no questions".to_string()));
    }

    Ok(questions)
}

fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    if let Some((_, rest)) = trimmed.split_once("```json") {
        rest.split("```").next().unwrap_or(rest).trim()
    } else if let Some((_, rest)) = trimmed.split_once("```") {
        rest.split("```").next().unwrap_or(rest).trim()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_REPLY: &str = r#"[
        {
            "question_text": "Which action comes first when reporting an incident?",
            "option_a": "Notify a supervisor",
            "option_b": "Fill in the annual review",
            "option_c": "Wait until the end of the shift",
            "option_d": "Email human resources",
            "correct_answer": "A",
            "explanation": "Supervisors must be informed immediately."
        }
    ]"#;

    #[test]
    fn parses_bare_json_array() {
        let questions = parse_questions(VALID_REPLY).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, AnswerOption::A);
    }

    #[test]
    fn parses_fenced_json_array() {
        let fenced = format!("```json\n{}\n```", VALID_REPLY);
        let questions = parse_questions(&fenced).unwrap();
        assert_eq!(questions.len(), 1);

        let plain_fence = format!("```\n{}\n```", VALID_REPLY);
        assert_eq!(parse_questions(&plain_fence).unwrap().len(), 1);
    }

    #[test]
    fn rejects_missing_required_field() {
        let reply = r#"[{"question_text": "Incomplete?", "option_a": "Yes"}]"#;
        assert!(matches!(parse_questions(reply), Err(AiError::InvalidJson(_))));
    }

    #[test]
    fn rejects_label_outside_a_to_d() {
        let reply = VALID_REPLY.replace("\"correct_answer\": \"A\"", "\"correct_answer\": \"E\"");
        assert!(matches!(parse_questions(&reply), Err(AiError::InvalidJson(_))));
    }

    #[test]
    fn rejects_empty_array() {
        assert!(matches!(parse_questions("[]"), Err(AiError::Malformed(_))));
    }

    #[test]
    fn prompt_includes_context_and_count() {
        let prompt = build_question_prompt("Nurse", "Healthcare", "document body", 5);
        assert!(prompt.contains("Generate 5 multiple-choice questions"));
        assert!(prompt.contains("Job Title: Nurse"));
        assert!(prompt.contains("Industry: Healthcare"));
        assert!(prompt.contains("document body"));
    }

    #[test]
    fn prompt_caps_document_length_on_char_boundaries() {
        let document = "安".repeat(20_000);
        let prompt = build_question_prompt("Nurse", "Healthcare", &document, 5);
        let embedded = prompt.matches('安').count();
        assert_eq!(embedded, 8000);
    }
}
