use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// One of the four option labels of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "answer_option")]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl FromStr for AnswerOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AnswerOption::A),
            "B" => Ok(AnswerOption::B),
            "C" => Ok(AnswerOption::C),
            "D" => Ok(AnswerOption::D),
            _ => Err(format!("Invalid answer option: {}", s)),
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnswerOption::A => "A",
            AnswerOption::B => "B",
            AnswerOption::C => "C",
            AnswerOption::D => "D",
        };
        write!(f, "{}", s)
    }
}

/// A question in the shared bank. Generated once from the training
/// document and reused across all sessions; deactivation is the only
/// mutation after creation.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct GlobalQuestion {
    pub id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub explanation: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl GlobalQuestion {
    /// View served while the exam is open. Never carries the answer key.
    pub fn public_view(&self) -> QuestionPublic {
        QuestionPublic {
            id: self.id,
            question_text: self.question_text.clone(),
            option_a: self.option_a.clone(),
            option_b: self.option_b.clone(),
            option_c: self.option_c.clone(),
            option_d: self.option_d.clone(),
            explanation: self.explanation.clone(),
        }
    }

    /// Review view, answer key included. Only for grading/feedback output.
    pub fn detail_view(&self) -> QuestionDetail {
        QuestionDetail {
            id: self.id,
            question_text: self.question_text.clone(),
            option_a: self.option_a.clone(),
            option_b: self.option_b.clone(),
            option_c: self.option_c.clone(),
            option_d: self.option_d.clone(),
            correct_answer: self.correct_answer,
            explanation: self.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionPublic {
    pub id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    pub id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewGlobalQuestion {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub explanation: Option<String>,
}

/// Join row binding a session to one bank question with a per-session
/// display order. Unique per (session, question).
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct SessionQuestion {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub display_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A trainee's recorded selection for one (session, question) pair.
/// Correctness is recomputed from the bank on every write.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub selected_answer: AnswerOption,
    pub is_correct: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub answered_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_option_round_trips() {
        for label in ["A", "B", "C", "D"] {
            let option: AnswerOption = label.parse().unwrap();
            assert_eq!(option.to_string(), label);
        }
    }

    #[test]
    fn answer_option_rejects_lowercase_and_garbage() {
        assert!("a".parse::<AnswerOption>().is_err());
        assert!("E".parse::<AnswerOption>().is_err());
        assert!("AB".parse::<AnswerOption>().is_err());
    }
}
