// src/repositories/quiz_session.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::{
    error::QuizResult,
    models::{
        question::CatalogRef,
        quiz_session::{NewQuizSession, QuizLevel, QuizSession, QuizSessionOverview, QuizStatus},
    },
};

const COLUMNS: &str = "\
    id, owner_id, course_id, subject_id, chapter_id, level, \
    question_ids, status, submitted_at, created_at";

#[async_trait]
pub trait QuizSessionRepository: Send + Sync {
    async fn create(&self, session: NewQuizSession) -> QuizResult<QuizSession>;
    async fn find_by_id(&self, id: i64) -> QuizResult<Option<QuizSession>>;

    /// Sessions of one owner, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> QuizResult<Vec<QuizSessionOverview>>;

    /// Flips `CREATED -> SUBMITTED` in one conditional update.
    /// Returns `false` when the session was not in `CREATED` (nothing changed).
    async fn mark_submitted(
        &self,
        id: i64,
        submitted_at: chrono::DateTime<chrono::Utc>,
    ) -> QuizResult<bool>;
}

pub struct PgQuizSessionRepository {
    pool: PgPool,
}

impl PgQuizSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OverviewRow {
    id: i64,
    level: QuizLevel,
    status: QuizStatus,
    total_questions: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    course_id: Option<i64>,
    course_title: Option<String>,
    subject_id: Option<i64>,
    subject_title: Option<String>,
    chapter_id: Option<i64>,
    chapter_title: Option<String>,
}

fn catalog_ref(id: Option<i64>, title: Option<String>) -> Option<CatalogRef> {
    Some(CatalogRef { id: id?, title: title? })
}

impl From<OverviewRow> for QuizSessionOverview {
    fn from(row: OverviewRow) -> Self {
        Self {
            id: row.id,
            level: row.level,
            course: catalog_ref(row.course_id, row.course_title),
            subject: catalog_ref(row.subject_id, row.subject_title),
            chapter: catalog_ref(row.chapter_id, row.chapter_title),
            status: row.status,
            total_questions: row.total_questions,
            created_at: row.created_at,
            submitted_at: row.submitted_at,
        }
    }
}

#[async_trait]
impl QuizSessionRepository for PgQuizSessionRepository {
    async fn create(&self, session: NewQuizSession) -> QuizResult<QuizSession> {
        let created = sqlx::query_as::<_, QuizSession>(&format!(
            "INSERT INTO quiz_sessions
                (owner_id, course_id, subject_id, chapter_id, level, question_ids, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        ))
        .bind(session.owner_id)
        .bind(session.scope.course_id)
        .bind(session.scope.subject_id)
        .bind(session.scope.chapter_id)
        .bind(session.level)
        .bind(&session.question_ids)
        .bind(QuizStatus::Created)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz session: {:?}", e);
            e
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> QuizResult<Option<QuizSession>> {
        let session = sqlx::query_as::<_, QuizSession>(&format!(
            "SELECT {COLUMNS} FROM quiz_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn list_by_owner(&self, owner_id: i64) -> QuizResult<Vec<QuizSessionOverview>> {
        let rows = sqlx::query_as::<_, OverviewRow>(
            r#"
            SELECT
                s.id,
                s.level,
                s.status,
                cardinality(s.question_ids)::BIGINT AS total_questions,
                s.created_at,
                s.submitted_at,
                s.course_id,
                c.title AS course_title,
                s.subject_id,
                sj.title AS subject_title,
                s.chapter_id,
                ch.title AS chapter_title
            FROM quiz_sessions s
            LEFT JOIN courses c ON c.id = s.course_id
            LEFT JOIN subjects sj ON sj.id = s.subject_id
            LEFT JOIN chapters ch ON ch.id = s.chapter_id
            WHERE s.owner_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quiz sessions: {:?}", e);
            e
        })?;

        Ok(rows.into_iter().map(QuizSessionOverview::from).collect())
    }

    async fn mark_submitted(
        &self,
        id: i64,
        submitted_at: chrono::DateTime<chrono::Utc>,
    ) -> QuizResult<bool> {
        let result = sqlx::query(
            "UPDATE quiz_sessions
             SET status = $1, submitted_at = $2
             WHERE id = $3 AND status = $4",
        )
        .bind(QuizStatus::Submitted)
        .bind(submitted_at)
        .bind(id)
        .bind(QuizStatus::Created)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark quiz session {} submitted: {:?}", id, e);
            e
        })?;

        Ok(result.rows_affected() > 0)
    }
}
