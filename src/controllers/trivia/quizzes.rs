use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::LooseId;
use crate::controllers::ApiJson;
use crate::error::{AppError, AppResult};
use crate::quiz::pick_question;
use crate::TriviaState;

pub fn routes() -> Router<Arc<TriviaState>> {
    Router::new().route("/quizzes", post(next_question))
}

#[derive(Debug, Deserialize)]
pub struct QuizBody {
    pub previous_questions: Vec<i32>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<LooseId>,
}

impl QuizBody {
    /// The category to draw from, `None` meaning every category. The frontend
    /// sends `{type: "click", id: 0}` for "All".
    pub fn category_filter(&self) -> AppResult<Option<i32>> {
        let Some(category) = &self.quiz_category else {
            return Ok(None);
        };
        if category.kind.as_deref() == Some("click") {
            return Ok(None);
        }
        match &category.id {
            None => Ok(None),
            Some(raw) => match raw.as_i32() {
                Some(0) => Ok(None),
                Some(id) => Ok(Some(id)),
                None => Err(AppError::Unprocessable(format!(
                    "quiz_category id is not a number: {:?}",
                    raw
                ))),
            },
        }
    }
}

pub async fn next_question(
    State(state): State<Arc<TriviaState>>,
    ApiJson(body): ApiJson<QuizBody>,
) -> AppResult<Json<Value>> {
    let candidates = match body.category_filter()? {
        None => state.store.questions().await?,
        Some(id) => {
            if state.store.category(id).await?.is_none() {
                tracing::debug!(category = id, "quiz asked for an unknown category");
                Vec::new()
            } else {
                state.store.questions_in_category(id).await?
            }
        }
    };

    let question = pick_question(candidates, &body.previous_questions, &mut rand::rng());

    Ok(Json(json!({
        "success": true,
        "question": question,
    })))
}
