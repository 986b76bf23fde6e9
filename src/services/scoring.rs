// src/services/scoring.rs

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::{
    error::{QuizError, QuizResult},
    models::{question::Question, quiz_attempt::NormalizedAnswer, quiz_session::QuizSession},
};

/// Field names that may carry the chosen option in a keyed answer, in
/// priority order. The first one holding a non-null value is used; the last
/// two are legacy client spellings.
pub const SELECTED_INDEX_FIELDS: [&str; 3] = ["selectedIndex", "answerIndex", "correctIndex"];

/// One `{questionId, selectedIndex}` element after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyedAnswer {
    pub question_id: i64,
    pub selected_index: Option<i64>,
}

impl KeyedAnswer {
    /// `None` when the element carries no usable `questionId`.
    fn from_item(item: &Value) -> Option<Self> {
        let fields = item.as_object()?;
        let question_id = fields.get("questionId").and_then(coerce_id)?;
        let selected_index = SELECTED_INDEX_FIELDS
            .iter()
            .find_map(|name| fields.get(*name).filter(|v| !v.is_null()))
            .and_then(coerce_index);

        Some(Self {
            question_id,
            selected_index,
        })
    }
}

/// The two accepted wire shapes of `answers`, resolved once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedAnswers {
    /// `[{questionId, selectedIndex}, ...]`
    Keyed(Vec<KeyedAnswer>),
    /// `[2, 0, 1, ...]`, element `i` answers the session's `i`-th question.
    Positional(Vec<Option<i64>>),
}

impl SubmittedAnswers {
    /// Resolves the raw `answers` value.
    ///
    /// The keyed shape is chosen when the first element is a non-null object;
    /// any other array (including an empty one) is read positionally.
    pub fn from_value(raw: Option<Value>) -> QuizResult<Self> {
        let items = match raw {
            None | Some(Value::Null) => {
                return Err(QuizError::InvalidAnswers("answers are required".to_string()));
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(QuizError::InvalidAnswers("answers must be an array".to_string()));
            }
        };

        let shape = match items.first() {
            Some(Value::Object(_)) => {
                Self::Keyed(items.iter().filter_map(KeyedAnswer::from_item).collect())
            }
            _ => Self::Positional(items.iter().map(coerce_index).collect()),
        };

        Ok(shape)
    }

    /// Flattens either shape into `(questionId, selectedIndex)` pairs.
    pub fn normalize(self, question_ids: &[i64]) -> Vec<NormalizedAnswer> {
        match self {
            Self::Keyed(answers) => answers
                .into_iter()
                .map(|a| NormalizedAnswer {
                    question_id: a.question_id,
                    selected_index: a.selected_index,
                })
                .collect(),
            Self::Positional(indexes) => question_ids
                .iter()
                .enumerate()
                .map(|(position, &question_id)| NormalizedAnswer {
                    question_id,
                    selected_index: indexes.get(position).copied().flatten(),
                })
                .collect(),
        }
    }
}

/// Positive integer id from a JSON number or numeric string.
fn coerce_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

/// Numeric coercion of a selected index.
///
/// Integers, integral floats and numeric strings yield a value. Anything that
/// cannot equal an integer option index (null, bools, objects, fractions,
/// blank strings) yields `None`.
fn coerce_index(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCard {
    /// Rounded percentage, 0..=100.
    pub score: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
}

/// Counts correct answers against `correct_by_id`.
///
/// Answers to questions outside the lookup are ignored, and only the first
/// answer per question counts. The denominator is always `total_questions`.
pub fn compute_score(
    total_questions: usize,
    correct_by_id: &HashMap<i64, i32>,
    answers: &[NormalizedAnswer],
) -> ScoreCard {
    let mut scored = HashSet::new();
    let mut correct_answers: i32 = 0;

    for answer in answers {
        let Some(&correct_index) = correct_by_id.get(&answer.question_id) else {
            continue;
        };
        if !scored.insert(answer.question_id) {
            continue;
        }
        if answer.selected_index == Some(i64::from(correct_index)) {
            correct_answers += 1;
        }
    }

    let score = if total_questions == 0 {
        0
    } else {
        ((correct_answers as f64 / total_questions as f64) * 100.0).round() as i32
    };

    ScoreCard {
        score,
        correct_answers,
        total_questions: total_questions as i32,
    }
}

/// Scores a submission for `session`.
///
/// `questions` may come back from storage in any order and may include
/// extras; only the session's own question set is used as the answer key.
pub fn grade(
    session: &QuizSession,
    questions: &[Question],
    answers: SubmittedAnswers,
) -> (ScoreCard, Vec<NormalizedAnswer>) {
    let in_session: HashSet<i64> = session.question_ids.iter().copied().collect();
    let correct_by_id: HashMap<i64, i32> = questions
        .iter()
        .filter(|q| in_session.contains(&q.id))
        .map(|q| (q.id, q.correct_index))
        .collect();

    let normalized = answers.normalize(&session.question_ids);
    let card = compute_score(session.question_ids.len(), &correct_by_id, &normalized);

    (card, normalized)
}
