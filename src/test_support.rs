// src/test_support.rs

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use sqlx::types::Json;

use crate::{
    config::Config,
    error::{QuizError, QuizResult},
    models::{
        question::{CatalogRef, Difficulty, Question, ScopeRefs},
        quiz_attempt::{NewQuizAttempt, QuizAttempt},
        quiz_session::{
            NewQuizSession, QuizLevel, QuizScope, QuizSession, QuizSessionOverview, QuizStatus,
        },
    },
    repositories::{ContentStore, QuizAttemptRepository, QuizSessionRepository},
    services::QuizService,
    state::AppState,
};

pub(crate) const TEST_JWT_SECRET: &str = "test_secret_for_quiz_tests";

/// Question with four options in the given `(course, subject, chapter)`.
pub(crate) fn question(id: i64, scope: (i64, i64, i64), correct_index: i32) -> Question {
    Question {
        id,
        course_id: scope.0,
        subject_id: scope.1,
        chapter_id: scope.2,
        question: format!("Question {}", id),
        options: Json(vec!["A".into(), "B".into(), "C".into(), "D".into()]),
        correct_index,
        explanation: String::new(),
        difficulty: Difficulty::Medium,
        is_active: true,
        created_at: None,
    }
}

/// Unsubmitted course-level session, not stored anywhere.
pub(crate) fn session(id: i64, owner_id: i64, question_ids: Vec<i64>) -> QuizSession {
    QuizSession {
        id,
        owner_id,
        course_id: Some(1),
        subject_id: None,
        chapter_id: None,
        level: QuizLevel::Course,
        question_ids,
        status: QuizStatus::Created,
        submitted_at: None,
        created_at: chrono::Utc::now(),
    }
}

pub(crate) fn quiz_service(store: &Arc<InMemoryStore>) -> QuizService {
    QuizService::new(store.clone(), store.clone(), store.clone())
}

pub(crate) fn test_state(store: &Arc<InMemoryStore>) -> AppState {
    AppState {
        quiz: Arc::new(quiz_service(store)),
        config: Config {
            database_url: "postgres://unused".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiration: 600,
            rust_log: "error".to_string(),
            port: 0,
        },
    }
}

#[derive(Default)]
struct Tables {
    questions: Vec<Question>,
    sessions: Vec<QuizSession>,
    attempts: Vec<QuizAttempt>,
}

/// In-memory stand-in for the three repositories.
///
/// Bulk question fetches come back in reverse id order so callers that rely
/// on storage order get caught.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_session_updates: AtomicBool,
    fail_attempt_inserts: AtomicBool,
}

fn unavailable() -> QuizError {
    QuizError::Storage("storage unavailable".to_string())
}

fn title_ref(kind: &str, id: Option<i64>) -> Option<CatalogRef> {
    id.map(|id| CatalogRef {
        id,
        title: format!("{} {}", kind, id),
    })
}

impl InMemoryStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn add_question(&self, question: Question) {
        self.tables.lock().unwrap().questions.push(question);
    }

    pub(crate) fn correct_index(&self, id: i64) -> i32 {
        self.tables
            .lock()
            .unwrap()
            .questions
            .iter()
            .find(|q| q.id == id)
            .map(|q| q.correct_index)
            .expect("unknown question")
    }

    pub(crate) fn session(&self, id: i64) -> Option<QuizSession> {
        self.tables
            .lock()
            .unwrap()
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub(crate) fn session_count(&self) -> usize {
        self.tables.lock().unwrap().sessions.len()
    }

    pub(crate) fn attempts(&self) -> Vec<QuizAttempt> {
        self.tables.lock().unwrap().attempts.clone()
    }

    pub(crate) fn fail_session_updates(&self, fail: bool) {
        self.fail_session_updates.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_attempt_inserts(&self, fail: bool) {
        self.fail_attempt_inserts.store(fail, Ordering::SeqCst);
    }
}

fn matches_scope(q: &Question, scope: &QuizScope) -> bool {
    scope.course_id.is_none_or(|id| id == q.course_id)
        && scope.subject_id.is_none_or(|id| id == q.subject_id)
        && scope.chapter_id.is_none_or(|id| id == q.chapter_id)
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn find_active_question_ids(&self, scope: &QuizScope) -> QuizResult<Vec<i64>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.is_active && matches_scope(q, scope))
            .map(|q| q.id)
            .collect())
    }

    async fn find_questions_by_ids(&self, ids: &[i64]) -> QuizResult<Vec<Question>> {
        let tables = self.tables.lock().unwrap();
        let mut found: Vec<Question> = tables
            .questions
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(found)
    }

    async fn find_scope_refs(&self, scope: &QuizScope) -> QuizResult<ScopeRefs> {
        Ok(ScopeRefs {
            course: title_ref("Course", scope.course_id),
            subject: title_ref("Subject", scope.subject_id),
            chapter: title_ref("Chapter", scope.chapter_id),
        })
    }
}

#[async_trait]
impl QuizSessionRepository for InMemoryStore {
    async fn create(&self, new: NewQuizSession) -> QuizResult<QuizSession> {
        let mut tables = self.tables.lock().unwrap();
        let session = QuizSession {
            id: tables.sessions.len() as i64 + 1,
            owner_id: new.owner_id,
            course_id: new.scope.course_id,
            subject_id: new.scope.subject_id,
            chapter_id: new.scope.chapter_id,
            level: new.level,
            question_ids: new.question_ids,
            status: QuizStatus::Created,
            submitted_at: None,
            created_at: chrono::Utc::now(),
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: i64) -> QuizResult<Option<QuizSession>> {
        Ok(self.session(id))
    }

    async fn list_by_owner(&self, owner_id: i64) -> QuizResult<Vec<QuizSessionOverview>> {
        let tables = self.tables.lock().unwrap();
        let mut owned: Vec<&QuizSession> = tables
            .sessions
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(owned
            .into_iter()
            .map(|s| QuizSessionOverview {
                id: s.id,
                level: s.level,
                course: title_ref("Course", s.course_id),
                subject: title_ref("Subject", s.subject_id),
                chapter: title_ref("Chapter", s.chapter_id),
                status: s.status,
                total_questions: s.question_ids.len() as i64,
                created_at: s.created_at,
                submitted_at: s.submitted_at,
            })
            .collect())
    }

    async fn mark_submitted(
        &self,
        id: i64,
        submitted_at: chrono::DateTime<chrono::Utc>,
    ) -> QuizResult<bool> {
        if self.fail_session_updates.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut tables = self.tables.lock().unwrap();
        match tables
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.status == QuizStatus::Created)
        {
            Some(session) => {
                session.status = QuizStatus::Submitted;
                session.submitted_at = Some(submitted_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryStore {
    async fn create(&self, new: NewQuizAttempt) -> QuizResult<QuizAttempt> {
        if self.fail_attempt_inserts.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut tables = self.tables.lock().unwrap();
        if tables.attempts.iter().any(|a| a.session_id == new.session_id) {
            return Err(QuizError::Storage("duplicate attempt for session".to_string()));
        }

        let attempt = QuizAttempt {
            id: tables.attempts.len() as i64 + 1,
            owner_id: new.owner_id,
            session_id: new.session_id,
            course_id: new.scope.course_id,
            subject_id: new.scope.subject_id,
            chapter_id: new.scope.chapter_id,
            level: new.level,
            score: new.score,
            correct_answers: new.correct_answers,
            total_questions: new.total_questions,
            answers: Json(new.answers),
            attempted_at: chrono::Utc::now(),
        };
        tables.attempts.push(attempt.clone());
        Ok(attempt)
    }
}
