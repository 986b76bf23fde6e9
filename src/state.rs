use std::sync::Arc;

use crate::{
    config::Config,
    repositories::{PgContentStore, PgQuizAttemptRepository, PgQuizSessionRepository},
    services::QuizService,
};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub quiz: Arc<QuizService>,
    pub config: Config,
}

impl AppState {
    /// Wires the Postgres-backed repositories into the quiz service.
    pub fn new(pool: PgPool, config: Config) -> Self {
        let quiz = QuizService::new(
            Arc::new(PgContentStore::new(pool.clone())),
            Arc::new(PgQuizSessionRepository::new(pool.clone())),
            Arc::new(PgQuizAttemptRepository::new(pool)),
        );

        Self {
            quiz: Arc::new(quiz),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<QuizService> {
    fn from_ref(state: &AppState) -> Self {
        state.quiz.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
