// src/services/quiz.rs

use std::{collections::HashMap, sync::Arc};

use serde_json::Value;

use crate::{
    error::{QuizError, QuizResult},
    models::{
        question::{PublicQuestion, Question},
        quiz_attempt::SubmissionReceipt,
        quiz_session::{GeneratedQuiz, QuizQuestionSet, QuizScope, QuizSessionOverview, QuizStatus},
    },
    repositories::{ContentStore, QuizAttemptRepository, QuizSessionRepository},
    services::{
        attempt::AttemptRecorder,
        sampler::QuestionSampler,
        scoring::{self, SubmittedAnswers},
        session::SessionManager,
    },
};

/// Entry point for the quiz endpoints.
/// Wires the sampler, session manager, scoring engine and attempt recorder.
pub struct QuizService {
    content: Arc<dyn ContentStore>,
    sampler: QuestionSampler,
    sessions: SessionManager,
    recorder: AttemptRecorder,
}

/// Reorders `fetched` to follow `question_ids`.
/// Ids that no longer resolve are skipped.
fn in_canonical_order(question_ids: &[i64], fetched: Vec<Question>) -> Vec<PublicQuestion> {
    let mut by_id: HashMap<i64, Question> = fetched.into_iter().map(|q| (q.id, q)).collect();
    question_ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(PublicQuestion::from)
        .collect()
}

impl QuizService {
    pub fn new(
        content: Arc<dyn ContentStore>,
        sessions: Arc<dyn QuizSessionRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            sampler: QuestionSampler::new(content.clone()),
            content,
            sessions: SessionManager::new(sessions),
            recorder: AttemptRecorder::new(attempts),
        }
    }

    pub async fn list(&self, owner_id: i64) -> QuizResult<Vec<QuizSessionOverview>> {
        self.sessions.list(owner_id).await
    }

    /// Samples questions for `scope` and opens a session for `owner_id`.
    pub async fn generate(
        &self,
        owner_id: i64,
        scope: QuizScope,
        limit: i64,
    ) -> QuizResult<GeneratedQuiz> {
        let question_ids = self.sampler.sample(&scope, limit).await?;
        let session = self.sessions.create(owner_id, scope, question_ids).await?;

        let fetched = self.content.find_questions_by_ids(&session.question_ids).await?;
        let questions = in_canonical_order(&session.question_ids, fetched);

        tracing::info!(
            "Quiz {} generated for user {} ({:?}, {} questions)",
            session.id,
            owner_id,
            session.level,
            session.question_ids.len()
        );

        Ok(GeneratedQuiz {
            quiz_id: session.id,
            level: session.level,
            course_id: session.course_id,
            subject_id: session.subject_id,
            chapter_id: session.chapter_id,
            total_questions: session.question_ids.len(),
            questions,
        })
    }

    /// Questions of an owned session, in the order fixed at creation.
    pub async fn questions(&self, owner_id: i64, quiz_id: i64) -> QuizResult<QuizQuestionSet> {
        let session = self.sessions.get(quiz_id, owner_id).await?;

        let fetched = self.content.find_questions_by_ids(&session.question_ids).await?;
        let questions = in_canonical_order(&session.question_ids, fetched);
        let refs = self.content.find_scope_refs(&session.scope()).await?;

        Ok(QuizQuestionSet {
            quiz_id: session.id,
            level: session.level,
            course: refs.course,
            subject: refs.subject,
            chapter: refs.chapter,
            total_questions: questions.len(),
            questions,
        })
    }

    /// Scores `raw_answers` once and records the attempt.
    ///
    /// The session is closed before the attempt is written. If recording
    /// fails afterwards the session stays `SUBMITTED` and the error is
    /// returned; only the recording step needs reconciling.
    pub async fn submit(
        &self,
        owner_id: i64,
        quiz_id: i64,
        raw_answers: Option<Value>,
    ) -> QuizResult<SubmissionReceipt> {
        let session = self.sessions.get(quiz_id, owner_id).await?;

        if session.status == QuizStatus::Submitted {
            tracing::warn!("Quiz {} was already submitted", quiz_id);
            return Err(QuizError::AlreadySubmitted);
        }

        let answers = SubmittedAnswers::from_value(raw_answers)?;

        let questions = self.content.find_questions_by_ids(&session.question_ids).await?;
        let (card, normalized) = scoring::grade(&session, &questions, answers);

        self.sessions.close(&session).await?;

        let attempt = self
            .recorder
            .record(&session, &card, normalized)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Quiz {} is closed but its attempt was not recorded: {}",
                    session.id,
                    e
                );
                e
            })?;

        tracing::info!(
            "Quiz {} submitted by user {}: {}/{} correct, score {}",
            session.id,
            owner_id,
            card.correct_answers,
            card.total_questions,
            card.score
        );

        Ok(SubmissionReceipt {
            quiz_id: session.id,
            attempt_id: attempt.id,
            score: card.score,
            total_questions: card.total_questions,
            correct_answers: card.correct_answers,
        })
    }
}
