// src/services/attempt.rs

use std::sync::Arc;

use crate::{
    error::QuizResult,
    models::{
        quiz_attempt::{NewQuizAttempt, NormalizedAnswer, QuizAttempt},
        quiz_session::QuizSession,
    },
    repositories::QuizAttemptRepository,
    services::scoring::ScoreCard,
};

/// Appends scored submissions to the attempt log.
pub struct AttemptRecorder {
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl AttemptRecorder {
    pub fn new(attempts: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { attempts }
    }

    /// Scope and level are copied from the session as stored, not re-derived.
    pub async fn record(
        &self,
        session: &QuizSession,
        card: &ScoreCard,
        answers: Vec<NormalizedAnswer>,
    ) -> QuizResult<QuizAttempt> {
        self.attempts
            .create(NewQuizAttempt {
                owner_id: session.owner_id,
                session_id: session.id,
                scope: session.scope(),
                level: session.level,
                score: card.score,
                correct_answers: card.correct_answers,
                total_questions: card.total_questions,
                answers,
            })
            .await
    }
}
