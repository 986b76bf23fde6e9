// src/repositories/content.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::QuizResult,
    models::{
        question::{CatalogRef, Question, ScopeRefs},
        quiz_session::QuizScope,
    },
};

/// Read-only view of the course/subject/chapter/question catalog.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Ids of every active question matching all ids present in `scope`.
    async fn find_active_question_ids(&self, scope: &QuizScope) -> QuizResult<Vec<i64>>;

    /// Questions with the given ids. The result order is unspecified.
    async fn find_questions_by_ids(&self, ids: &[i64]) -> QuizResult<Vec<Question>>;

    async fn find_scope_refs(&self, scope: &QuizScope) -> QuizResult<ScopeRefs>;
}

pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_ref(&self, table: &str, id: Option<i64>) -> QuizResult<Option<CatalogRef>> {
        let Some(id) = id else {
            return Ok(None);
        };

        let found = sqlx::query_as::<_, CatalogRef>(&format!(
            "SELECT id, title FROM {table} WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn find_active_question_ids(&self, scope: &QuizScope) -> QuizResult<Vec<i64>> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT id FROM questions WHERE is_active = TRUE");

        if let Some(course_id) = scope.course_id {
            builder.push(" AND course_id = ");
            builder.push_bind(course_id);
        }
        if let Some(subject_id) = scope.subject_id {
            builder.push(" AND subject_id = ");
            builder.push_bind(subject_id);
        }
        if let Some(chapter_id) = scope.chapter_id {
            builder.push(" AND chapter_id = ");
            builder.push_bind(chapter_id);
        }

        let ids = builder
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch eligible question ids: {:?}", e);
                e
            })?;

        Ok(ids)
    }

    async fn find_questions_by_ids(&self, ids: &[i64]) -> QuizResult<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT
                id,
                course_id,
                subject_id,
                chapter_id,
                question,
                options,
                correct_index,
                explanation,
                difficulty,
                is_active,
                created_at
            FROM questions
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questions by id: {:?}", e);
            e
        })?;

        Ok(questions)
    }

    async fn find_scope_refs(&self, scope: &QuizScope) -> QuizResult<ScopeRefs> {
        Ok(ScopeRefs {
            course: self.find_ref("courses", scope.course_id).await?,
            subject: self.find_ref("subjects", scope.subject_id).await?,
            chapter: self.find_ref("chapters", scope.chapter_id).await?,
        })
    }
}
