// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::{quiz_attempt::SubmitQuizRequest, quiz_session::QuizScope},
    services::{QuizService, sampler::parse_limit},
    utils::jwt::Claims,
};

/// Raw query of `GET /quizzes/generate`. Parsed by `QuizScope::parse`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizQuery {
    pub course_id: Option<String>,
    pub subject_id: Option<String>,
    pub chapter_id: Option<String>,
    pub limit: Option<String>,
}

fn parse_quiz_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest("Invalid quizId".to_string())),
    }
}

/// `quizId` from a JSON body: a positive integer or a numeric string.
fn quiz_id_from_json(raw: Option<&Value>) -> Result<i64, AppError> {
    match raw {
        None | Some(Value::Null) => Err(AppError::BadRequest("quizId is required".to_string())),
        Some(Value::String(s)) => parse_quiz_id(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::BadRequest("Invalid quizId".to_string())),
        Some(_) => Err(AppError::BadRequest("Invalid quizId".to_string())),
    }
}

/// Lists the caller's quiz sessions, newest first.
pub async fn list_quizzes(
    State(quiz): State<Arc<QuizService>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = claims.owner_id()?;
    let sessions = quiz.list(owner_id).await?;

    Ok(Json(json!({
        "message": "Quizzes retrieved successfully",
        "count": sessions.len(),
        "data": sessions
    })))
}

/// Generates a quiz session for a course, subject or chapter.
///
/// * Validates the scope ids and clamps `limit`.
/// * Samples active questions and stores the session.
/// * Returns the questions without their correct indexes.
pub async fn generate_quiz(
    State(quiz): State<Arc<QuizService>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<GenerateQuizQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = claims.owner_id()?;
    let Query(query) = query?;
    let scope = QuizScope::parse(
        query.course_id.as_deref(),
        query.subject_id.as_deref(),
        query.chapter_id.as_deref(),
    )?;
    let limit = parse_limit(query.limit.as_deref());

    let generated = quiz.generate(owner_id, scope, limit).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Quiz generated successfully",
            "data": generated
        })),
    ))
}

/// Returns the questions of one of the caller's quizzes in the order they were generated.
pub async fn get_quiz_questions(
    State(quiz): State<Arc<QuizService>>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = claims.owner_id()?;
    let quiz_id = parse_quiz_id(&quiz_id)?;

    let set = quiz.questions(owner_id, quiz_id).await?;

    Ok(Json(json!({
        "message": "Quiz questions retrieved successfully",
        "data": set
    })))
}

/// Submits answers for a quiz and returns the score.
///
/// A request without a JSON content type is read as an empty body, so it
/// fails on the missing `quizId` like any other empty submission.
pub async fn submit_quiz(
    State(quiz): State<Arc<QuizService>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<SubmitQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = claims.owner_id()?;
    let req = match payload {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => SubmitQuizRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let quiz_id = quiz_id_from_json(req.quiz_id.as_ref())?;

    let receipt = quiz.submit(owner_id, quiz_id, req.answers).await?;

    Ok(Json(json!({
        "message": "Quiz submitted successfully",
        "data": receipt
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_id_from_json() {
        assert_eq!(quiz_id_from_json(Some(&json!(12))).unwrap(), 12);
        assert_eq!(quiz_id_from_json(Some(&json!("12"))).unwrap(), 12);
        assert!(matches!(quiz_id_from_json(None), Err(AppError::BadRequest(_))));
        assert!(matches!(quiz_id_from_json(Some(&Value::Null)), Err(AppError::BadRequest(_))));
        assert!(matches!(quiz_id_from_json(Some(&json!(-1))), Err(AppError::BadRequest(_))));
        assert!(matches!(quiz_id_from_json(Some(&json!(1.5))), Err(AppError::BadRequest(_))));
        assert!(matches!(quiz_id_from_json(Some(&json!("x1"))), Err(AppError::BadRequest(_))));
        assert!(matches!(quiz_id_from_json(Some(&json!([1]))), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_parse_quiz_id_path() {
        assert_eq!(parse_quiz_id("5").unwrap(), 5);
        assert!(parse_quiz_id("0").is_err());
        assert!(parse_quiz_id("64b1f0c2e4a1").is_err());
    }
}
