use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use super::LooseId;
use crate::controllers::{ApiJson, ApiPath, ApiQuery};
use crate::error::{AppError, AppResult};
use crate::models::{NewQuestion, Question};
use crate::pagination::{paginate, PageParams};
use crate::TriviaState;

pub fn routes() -> Router<Arc<TriviaState>> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
}

/// A question annotated with the label of its category.
#[derive(Debug, Serialize)]
pub struct ListedQuestion {
    #[serde(flatten)]
    pub question: Question,
    pub current_category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct QuestionBody {
    #[validate(required, length(min = 1))]
    pub question: Option<String>,
    #[validate(required, length(min = 1))]
    pub answer: Option<String>,
    pub category: Option<LooseId>,
    pub difficulty: Option<LooseId>,
}

impl QuestionBody {
    pub fn into_new_question(self) -> AppResult<NewQuestion> {
        self.validate()
            .map_err(|e| AppError::Unprocessable(e.to_string()))?;

        let text = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let category = self.category.as_ref().and_then(LooseId::as_i32);
        let difficulty = self
            .difficulty
            .as_ref()
            .and_then(LooseId::as_i32)
            .filter(|d| (1..=5).contains(d));

        match (text(self.question), text(self.answer), category, difficulty) {
            (Some(question), Some(answer), Some(category), Some(difficulty)) => Ok(NewQuestion {
                question,
                answer,
                category,
                difficulty,
            }),
            _ => Err(AppError::Unprocessable(
                "question, answer, category and difficulty (1-5) are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    #[serde(rename = "searchTerm", alias = "search", default)]
    pub search_term: Option<String>,
}

pub async fn list_questions(
    State(state): State<Arc<TriviaState>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<Value>> {
    let questions = state.store.questions().await?;
    let categories = state.store.categories().await?;
    let total_questions = questions.len();

    let page = paginate(questions, params.requested());
    if page.is_empty() {
        return Err(AppError::NotFound);
    }

    let labels: HashMap<i32, &str> = categories
        .iter()
        .map(|c| (c.id, c.kind.as_str()))
        .collect();
    let listed: Vec<ListedQuestion> = page
        .into_iter()
        .map(|question| ListedQuestion {
            current_category: labels.get(&question.category).map(|l| l.to_string()),
            question,
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "questions": listed,
        "total_questions": total_questions,
        "categories": categories,
        "current_category": null,
    })))
}

pub async fn delete_question(
    State(state): State<Arc<TriviaState>>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<Value>> {
    // 1. The question has to exist
    if state.store.question(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    // 2. Delete it
    if let Err(e) = state.store.delete_question(id).await {
        tracing::error!("Failed to delete question {}: {:?}", id, e);
        return Err(AppError::from_mutation(e));
    }

    // 3. Return the refreshed listing
    let questions = state.store.questions().await?;
    let total_questions = questions.len();

    Ok(Json(json!({
        "success": true,
        "deleted_question_id": id,
        "questions": paginate(questions, params.requested()),
        "total_questions": total_questions,
    })))
}

pub async fn create_question(
    State(state): State<Arc<TriviaState>>,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiJson(body): ApiJson<QuestionBody>,
) -> AppResult<Json<Value>> {
    let new_question = body.into_new_question()?;

    let created = match state.store.insert_question(&new_question).await {
        Ok(question) => question,
        Err(e) => {
            tracing::error!("Failed to create question: {:?}", e);
            return Err(AppError::from_mutation(e));
        }
    };
    tracing::info!(question_id = created.id, category = created.category, "question created");

    let questions = state.store.questions().await?;
    let total_questions = questions.len();

    Ok(Json(json!({
        "success": true,
        "new_question_id": created.id,
        "category": created.category,
        "questions": paginate(questions, params.requested()),
        "total_questions": total_questions,
    })))
}

pub async fn search_questions(
    State(state): State<Arc<TriviaState>>,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiJson(body): ApiJson<SearchBody>,
) -> AppResult<Json<Value>> {
    let term = body.search_term.unwrap_or_default();
    tracing::debug!(term = %term, "searching questions");

    let matches = state.store.search_questions(&term).await?;
    let total_questions = matches.len();
    let page = paginate(matches, params.requested());
    if page.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({
        "success": true,
        "questions": page,
        "total_questions": total_questions,
        "current_category": null,
    })))
}
