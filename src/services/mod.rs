// src/services/mod.rs

pub mod attempt;
pub mod quiz;
pub mod sampler;
pub mod scoring;
pub mod session;

pub use quiz::QuizService;
