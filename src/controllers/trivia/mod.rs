//! JSON API of the Trivia question bank.

pub mod categories;
pub mod questions;
pub mod quizzes;

use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::cors_layer;
use crate::TriviaState;

pub fn router(state: Arc<TriviaState>) -> Router {
    Router::new()
        .merge(categories::routes())
        .merge(questions::routes())
        .merge(quizzes::routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// An id the frontend may send either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(i64),
    Text(String),
}

impl LooseId {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            LooseId::Number(n) => i32::try_from(*n).ok(),
            LooseId::Text(s) => s.trim().parse().ok(),
        }
    }
}
