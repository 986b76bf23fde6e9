// src/repositories/quiz_attempt.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use crate::{
    error::QuizResult,
    models::quiz_attempt::{NewQuizAttempt, QuizAttempt},
};

/// Append-only log of scored submissions.
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: NewQuizAttempt) -> QuizResult<QuizAttempt>;
}

pub struct PgQuizAttemptRepository {
    pool: PgPool,
}

impl PgQuizAttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizAttemptRepository for PgQuizAttemptRepository {
    async fn create(&self, attempt: NewQuizAttempt) -> QuizResult<QuizAttempt> {
        let created = sqlx::query_as::<_, QuizAttempt>(
            r#"
            INSERT INTO quiz_attempts (
                owner_id, session_id, course_id, subject_id, chapter_id, level,
                score, correct_answers, total_questions, answers
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING
                id, owner_id, session_id, course_id, subject_id, chapter_id, level,
                score, correct_answers, total_questions, answers, attempted_at
            "#,
        )
        .bind(attempt.owner_id)
        .bind(attempt.session_id)
        .bind(attempt.scope.course_id)
        .bind(attempt.scope.subject_id)
        .bind(attempt.scope.chapter_id)
        .bind(attempt.level)
        .bind(attempt.score)
        .bind(attempt.correct_answers)
        .bind(attempt.total_questions)
        .bind(Json(&attempt.answers))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to record attempt for quiz session {}: {:?}",
                attempt.session_id,
                e
            );
            e
        })?;

        Ok(created)
    }
}
