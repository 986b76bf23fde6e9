// src/models/quiz_attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::models::quiz_session::{QuizLevel, QuizScope};

/// An answer after shape normalization.
/// `selected_index` is `None` when the client sent nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAnswer {
    pub question_id: i64,
    pub selected_index: Option<i64>,
}

/// Represents the 'quiz_attempts' table in the database.
/// Append-only: rows are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: i64,
    pub owner_id: i64,
    pub session_id: i64,
    pub course_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub level: QuizLevel,
    pub score: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub answers: Json<Vec<NormalizedAnswer>>,
    pub attempted_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload for an attempt. Scope is copied verbatim from the session.
#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub owner_id: i64,
    pub session_id: i64,
    pub scope: QuizScope,
    pub level: QuizLevel,
    pub score: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub answers: Vec<NormalizedAnswer>,
}

/// DTO for submitting a quiz.
///
/// Both fields stay raw JSON: `quizId` may be a number or a numeric string,
/// and `answers` comes in two shapes resolved by the scoring engine.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub quiz_id: Option<serde_json::Value>,
    pub answers: Option<serde_json::Value>,
}

/// Payload returned after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub quiz_id: i64,
    pub attempt_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
}
