use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use validator::Validate;

/// Workflow stage of a training session. Stages only move forward;
/// `can_advance_to` is checked by the status-update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "session_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Registration,
    Greeting,
    Video,
    Mcq,
    Feedback,
    Qa,
    Completed,
}

impl SessionStatus {
    fn rank(&self) -> u8 {
        match self {
            SessionStatus::Registration => 0,
            SessionStatus::Greeting => 1,
            SessionStatus::Video => 2,
            SessionStatus::Mcq => 3,
            SessionStatus::Feedback => 4,
            SessionStatus::Qa => 5,
            SessionStatus::Completed => 6,
        }
    }

    pub fn can_advance_to(&self, next: SessionStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(SessionStatus::Registration),
            "greeting" => Ok(SessionStatus::Greeting),
            "video" => Ok(SessionStatus::Video),
            "mcq" => Ok(SessionStatus::Mcq),
            "feedback" => Ok(SessionStatus::Feedback),
            "qa" => Ok(SessionStatus::Qa),
            "completed" => Ok(SessionStatus::Completed),
            _ => Err(format!("Unknown session status: {}", s)),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Registration => "registration",
            SessionStatus::Greeting => "greeting",
            SessionStatus::Video => "video",
            SessionStatus::Mcq => "mcq",
            SessionStatus::Feedback => "feedback",
            SessionStatus::Qa => "qa",
            SessionStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: Uuid,
    pub trainee_id: Uuid,
    pub status: SessionStatus,
    pub video_url: Option<String>,
    pub video_completed: bool,
    pub mcq_score: Option<i32>,
    pub mcq_total: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

/// Partial update payload for `PATCH /sessions/{id}`. Status changes go
/// through the dedicated status endpoint so transition rules apply.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTrainingSession {
    #[validate(url)]
    pub video_url: Option<String>,
    pub video_completed: Option<bool>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_status() {
        for s in ["registration", "greeting", "video", "mcq", "feedback", "qa", "completed"] {
            let status: SessionStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert!("paused".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn advances_only_forward() {
        assert!(SessionStatus::Registration.can_advance_to(SessionStatus::Greeting));
        assert!(SessionStatus::Video.can_advance_to(SessionStatus::Mcq));
        // forward jumps over intermediate stages are allowed
        assert!(SessionStatus::Registration.can_advance_to(SessionStatus::Completed));
    }

    #[test]
    fn rejects_backward_and_repeat_transitions() {
        assert!(!SessionStatus::Mcq.can_advance_to(SessionStatus::Video));
        assert!(!SessionStatus::Feedback.can_advance_to(SessionStatus::Feedback));
        assert!(!SessionStatus::Completed.can_advance_to(SessionStatus::Registration));
    }
}
