// src/services/sampler.rs

use std::sync::Arc;

use rand::{Rng, seq::SliceRandom};

use crate::{
    config::{DEFAULT_QUIZ_LIMIT, MAX_QUIZ_LIMIT, MIN_QUIZ_LIMIT},
    error::{QuizError, QuizResult},
    models::quiz_session::QuizScope,
    repositories::ContentStore,
};

/// Parses the `limit` query value.
///
/// Reads an optional sign followed by leading digits and ignores the rest.
/// Missing, non-numeric or zero values fall back to the default, and the
/// result is clamped to `[MIN_QUIZ_LIMIT, MAX_QUIZ_LIMIT]`.
pub fn parse_limit(raw: Option<&str>) -> i64 {
    let parsed = raw.and_then(leading_integer).filter(|n| *n != 0);
    parsed
        .unwrap_or(DEFAULT_QUIZ_LIMIT)
        .clamp(MIN_QUIZ_LIMIT, MAX_QUIZ_LIMIT)
}

fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Anything longer than i64 saturates; it gets clamped anyway.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Uniform sample of `count` ids without replacement, in random order.
pub fn draw<R: Rng + ?Sized>(mut pool: Vec<i64>, count: usize, rng: &mut R) -> Vec<i64> {
    let amount = count.min(pool.len());
    let (chosen, _) = pool.partial_shuffle(rng, amount);
    chosen.to_vec()
}

/// Draws random question sets from the active pool of a scope.
pub struct QuestionSampler {
    content: Arc<dyn ContentStore>,
}

impl QuestionSampler {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    /// Returns `min(count, pool size)` distinct active question ids.
    pub async fn sample(&self, scope: &QuizScope, count: i64) -> QuizResult<Vec<i64>> {
        if scope.is_empty() {
            return Err(QuizError::InvalidScope(
                "Provide courseId or subjectId or chapterId".to_string(),
            ));
        }

        let pool = self.content.find_active_question_ids(scope).await?;
        if pool.is_empty() {
            return Err(QuizError::EmptyPool);
        }

        let count = count.clamp(MIN_QUIZ_LIMIT, MAX_QUIZ_LIMIT) as usize;
        let pool_size = pool.len();
        let sampled = draw(pool, count, &mut rand::thread_rng());

        tracing::debug!(
            "Sampled {} of {} eligible questions for {:?}",
            sampled.len(),
            pool_size,
            scope
        );

        Ok(sampled)
    }
}
