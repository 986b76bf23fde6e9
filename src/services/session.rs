// src/services/session.rs

use std::sync::Arc;

use crate::{
    error::{QuizError, QuizResult},
    models::quiz_session::{NewQuizSession, QuizScope, QuizSession, QuizSessionOverview},
    repositories::QuizSessionRepository,
};

/// Owns the session lifecycle: creation, owner-checked reads and the
/// one-way `CREATED -> SUBMITTED` transition.
pub struct SessionManager {
    sessions: Arc<dyn QuizSessionRepository>,
}

impl SessionManager {
    pub fn new(sessions: Arc<dyn QuizSessionRepository>) -> Self {
        Self { sessions }
    }

    /// Persists a new session in `CREATED` state.
    /// Fails instead of creating a session without questions.
    pub async fn create(
        &self,
        owner_id: i64,
        scope: QuizScope,
        question_ids: Vec<i64>,
    ) -> QuizResult<QuizSession> {
        let level = scope.level().ok_or_else(|| {
            QuizError::InvalidScope("Provide courseId or subjectId or chapterId".to_string())
        })?;

        if question_ids.is_empty() {
            return Err(QuizError::EmptyPool);
        }

        self.sessions
            .create(NewQuizSession {
                owner_id,
                scope,
                level,
                question_ids,
            })
            .await
    }

    /// Loads a session on behalf of `owner_id`.
    pub async fn get(&self, session_id: i64, owner_id: i64) -> QuizResult<QuizSession> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| QuizError::NotFound("Quiz not found".to_string()))?;

        if session.owner_id != owner_id {
            tracing::warn!(
                "User {} tried to access quiz {} owned by {}",
                owner_id,
                session_id,
                session.owner_id
            );
            return Err(QuizError::Forbidden);
        }

        Ok(session)
    }

    pub async fn list(&self, owner_id: i64) -> QuizResult<Vec<QuizSessionOverview>> {
        self.sessions.list_by_owner(owner_id).await
    }

    /// Closes the session for further submissions.
    ///
    /// Backed by a single conditional update, so among concurrent callers at
    /// most one succeeds; the rest get `AlreadySubmitted`.
    pub async fn close(&self, session: &QuizSession) -> QuizResult<chrono::DateTime<chrono::Utc>> {
        let submitted_at = chrono::Utc::now();

        if !self.sessions.mark_submitted(session.id, submitted_at).await? {
            tracing::warn!("Duplicate submission rejected for quiz {}", session.id);
            return Err(QuizError::AlreadySubmitted);
        }

        Ok(submitted_at)
    }
}
