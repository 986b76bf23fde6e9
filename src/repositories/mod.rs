// src/repositories/mod.rs

pub mod content;
pub mod quiz_attempt;
pub mod quiz_session;

pub use content::{ContentStore, PgContentStore};
pub use quiz_attempt::{PgQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_session::{PgQuizSessionRepository, QuizSessionRepository};
