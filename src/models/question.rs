// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "question_difficulty", rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Represents the 'questions' table in the database.
/// Owned by the content catalog; the quiz core only reads it.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,
    pub course_id: i64,
    pub subject_id: i64,
    pub chapter_id: i64,

    /// The text content of the question.
    pub question: String,

    /// Ordered option texts, stored as a JSON array.
    pub options: Json<Vec<String>>,

    /// Index into `options` of the right answer.
    pub correct_index: i32,

    pub explanation: String,
    pub difficulty: Difficulty,

    /// Inactive questions are never sampled.
    pub is_active: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending question to client (excludes correct index and explanation).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub course_id: i64,
    pub subject_id: i64,
    pub chapter_id: i64,
    pub difficulty: Difficulty,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options.0,
            course_id: q.course_id,
            subject_id: q.subject_id,
            chapter_id: q.chapter_id,
            difficulty: q.difficulty,
        }
    }
}

/// `{id, title}` reference to a catalog node (course, subject or chapter).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CatalogRef {
    pub id: i64,
    pub title: String,
}

/// Catalog references for each id of a scope that still resolves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeRefs {
    pub course: Option<CatalogRef>,
    pub subject: Option<CatalogRef>,
    pub chapter: Option<CatalogRef>,
}
