// src/models/quiz_session.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    error::{QuizError, QuizResult},
    models::question::{CatalogRef, PublicQuestion},
};

/// Hierarchy level a quiz was generated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "quiz_level", rename_all = "UPPERCASE")]
pub enum QuizLevel {
    Course,
    Subject,
    Chapter,
}

/// Lifecycle of a session. Only ever moves `Created -> Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "quiz_status", rename_all = "UPPERCASE")]
pub enum QuizStatus {
    Created,
    Submitted,
}

/// Course/subject/chapter filter. At least one id is present once parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScope {
    pub course_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub chapter_id: Option<i64>,
}

impl QuizScope {
    /// Builds a scope from raw query values.
    ///
    /// Empty values count as absent; whitespace-only values do not and are
    /// rejected. Every supplied value must be a positive integer id, and at
    /// least one must be supplied.
    pub fn parse(
        course_id: Option<&str>,
        subject_id: Option<&str>,
        chapter_id: Option<&str>,
    ) -> QuizResult<Self> {
        let scope = Self {
            course_id: parse_scope_id("courseId", course_id)?,
            subject_id: parse_scope_id("subjectId", subject_id)?,
            chapter_id: parse_scope_id("chapterId", chapter_id)?,
        };

        if scope.is_empty() {
            return Err(QuizError::InvalidScope(
                "Provide courseId or subjectId or chapterId".to_string(),
            ));
        }

        Ok(scope)
    }

    pub fn is_empty(&self) -> bool {
        self.course_id.is_none() && self.subject_id.is_none() && self.chapter_id.is_none()
    }

    /// Level of the narrowest id present.
    ///
    /// Precedence is Chapter > Subject > Course: a chapter id wins even when
    /// broader ids are supplied alongside it. Stored sessions and attempts are
    /// categorized with this rule, so it must not change.
    pub fn level(&self) -> Option<QuizLevel> {
        if self.chapter_id.is_some() {
            Some(QuizLevel::Chapter)
        } else if self.subject_id.is_some() {
            Some(QuizLevel::Subject)
        } else if self.course_id.is_some() {
            Some(QuizLevel::Course)
        } else {
            None
        }
    }
}

fn parse_scope_id(name: &str, raw: Option<&str>) -> QuizResult<Option<i64>> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => match value.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Some(id)),
            _ => Err(QuizError::InvalidScope(format!("Invalid {}", name))),
        },
    }
}

/// Represents the 'quiz_sessions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub id: i64,
    pub owner_id: i64,
    pub course_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub level: QuizLevel,

    /// Canonical question order, fixed at creation.
    pub question_ids: Vec<i64>,

    pub status: QuizStatus,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl QuizSession {
    pub fn scope(&self) -> QuizScope {
        QuizScope {
            course_id: self.course_id,
            subject_id: self.subject_id,
            chapter_id: self.chapter_id,
        }
    }
}

/// Insert payload for a new session.
#[derive(Debug, Clone)]
pub struct NewQuizSession {
    pub owner_id: i64,
    pub scope: QuizScope,
    pub level: QuizLevel,
    pub question_ids: Vec<i64>,
}

/// One row of the "my quizzes" listing, with catalog titles resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSessionOverview {
    pub id: i64,
    pub level: QuizLevel,
    pub course: Option<CatalogRef>,
    pub subject: Option<CatalogRef>,
    pub chapter: Option<CatalogRef>,
    pub status: QuizStatus,
    pub total_questions: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO returned when a quiz is generated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuiz {
    pub quiz_id: i64,
    pub level: QuizLevel,
    pub course_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub total_questions: usize,
    pub questions: Vec<PublicQuestion>,
}

/// DTO for re-reading the questions of an existing quiz.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionSet {
    pub quiz_id: i64,
    pub level: QuizLevel,
    pub course: Option<CatalogRef>,
    pub subject: Option<CatalogRef>,
    pub chapter: Option<CatalogRef>,
    pub questions: Vec<PublicQuestion>,
    pub total_questions: usize,
}
