use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::controllers::{ApiPath, ApiQuery};
use crate::error::{AppError, AppResult};
use crate::pagination::{paginate, PageParams};
use crate::TriviaState;

pub fn routes() -> Router<Arc<TriviaState>> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}/questions", get(questions_by_category))
}

pub async fn list_categories(
    State(state): State<Arc<TriviaState>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<Value>> {
    let categories = paginate(state.store.categories().await?, params.requested());
    if categories.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({
        "success": true,
        "categories": categories,
    })))
}

pub async fn questions_by_category(
    State(state): State<Arc<TriviaState>>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<Value>> {
    if state.store.category(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let questions = state.store.questions_in_category(id).await?;
    let total_questions = questions.len();
    let page = paginate(questions, params.requested());
    if page.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({
        "success": true,
        "questions": page,
        "total_questions": total_questions,
        "current_category": id,
    })))
}
