use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::{faker::lorem::en::Sentence, Fake};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use fyyur_trivia::{controllers::trivia, store::MemoryTriviaStore, TriviaState};

fn app() -> Router {
    trivia::router(TriviaState::new(Arc::new(MemoryTriviaStore::seeded())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn get_paginated_questions() {
    let app = app();
    let (status, body) = send(&app, get("/questions?page=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["questions"].as_array().unwrap().len(), 10);
    assert_eq!(body["total_questions"], 15);
    assert_eq!(body["categories"].as_array().unwrap().len(), 6);
    assert!(body["current_category"].is_null());
    assert_eq!(body["questions"][0]["current_category"], "History");

    let (_, second) = send(&app, get("/questions?page=2")).await;
    assert_eq!(second["questions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn questions_without_page_lists_everything() {
    let (status, body) = send(&app(), get("/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn non_numeric_page_means_first_page() {
    let (status, body) = send(&app(), get("/questions?page=abc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"][0]["id"], 1);
    assert_eq!(body["questions"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn page_past_the_end_is_not_found() {
    let (status, body) = send(&app(), get("/questions?page=1000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"success": false, "error": 404, "message": "Resource Not Found"})
    );
}

#[tokio::test]
async fn get_categories() {
    let (status, body) = send(&app(), get("/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 6);
    assert_eq!(body["categories"][0], json!({"id": 1, "type": "Science"}));
}

#[tokio::test]
async fn categories_empty_store_is_not_found() {
    let app = trivia::router(TriviaState::new(Arc::new(MemoryTriviaStore::new())));
    let (status, _) = send(&app, get("/categories")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn questions_by_category() {
    let app = app();
    let (status, body) = send(&app, get("/categories/6/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_category"], 6);
    assert_eq!(body["total_questions"], 2);
    assert!(body["questions"]
        .as_array()
        .unwrap()
        .iter()
        .all(|q| q["category"] == 6));

    let (status, _) = send(&app, get("/categories/100/questions")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/categories/sports/questions")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn category_without_questions_is_not_found() {
    let app = trivia::router(TriviaState::new(Arc::new(MemoryTriviaStore::with_categories([
        "Science",
    ]))));
    let (status, _) = send(&app, get("/categories/1/questions")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_question() {
    let app = app();
    let (status, body) = send(&app, delete("/questions/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_question_id"], 1);
    assert_eq!(body["total_questions"], 14);
    assert!(body["questions"]
        .as_array()
        .unwrap()
        .iter()
        .all(|q| q["id"] != 1));

    let (status, body) = send(&app, delete("/questions/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Resource Not Found");
}

#[tokio::test]
async fn create_question() {
    let app = app();
    let text: String = Sentence(3..8).fake();
    let (status, body) = send(
        &app,
        post_json(
            "/questions",
            json!({"question": text, "answer": "Yes", "category": "1", "difficulty": 2}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_question_id"], 16);
    assert_eq!(body["category"], 1);
    assert_eq!(body["total_questions"], 16);

    let (_, science) = send(&app, get("/categories/1/questions")).await;
    assert!(science["questions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|q| q["question"] == text.as_str()));
}

#[tokio::test]
async fn create_question_with_missing_field_inserts_nothing() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json(
            "/questions",
            json!({"question": "Who painted the Mona Lisa?", "category": 2, "difficulty": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Unprocessable Entity");

    let (_, all) = send(&app, get("/questions")).await;
    assert_eq!(all["total_questions"], 15);
}

#[tokio::test]
async fn create_question_in_unknown_category_is_unprocessable() {
    let (status, _) = send(
        &app(),
        post_json(
            "/questions",
            json!({"question": "q", "answer": "a", "category": 99, "difficulty": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/questions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], 400);
}

#[tokio::test]
async fn search_questions() {
    let app = app();
    let (status, body) = send(&app, post_json("/questions/search", json!({"searchTerm": "TITLE"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 1);
    assert!(body["current_category"].is_null());
    assert_eq!(body["questions"][0]["answer"], "Maya Angelou");

    let (status, body) = send(&app, post_json("/questions/search", json!({"search": "soccer"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 2);
}

#[tokio::test]
async fn search_without_matches_is_not_found() {
    let (status, body) = send(
        &app(),
        post_json("/questions/search", json!({"searchTerm": "xyzzy"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let (status, _) = send(
        &app(),
        post_json("/questions/search", json!({"searchTerm": "%"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quiz_draws_from_the_requested_category() {
    let (status, body) = send(
        &app(),
        post_json(
            "/quizzes",
            json!({"previous_questions": [5], "quiz_category": {"type": "Sports", "id": "6"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], 6);
    assert_eq!(body["question"]["category"], 6);
}

#[tokio::test]
async fn quiz_returns_null_when_the_category_is_exhausted() {
    let (status, body) = send(
        &app(),
        post_json(
            "/quizzes",
            json!({"previous_questions": [5, 6], "quiz_category": {"type": "Sports", "id": 6}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["question"].is_null());
}

#[tokio::test]
async fn quiz_all_categories() {
    let previous: Vec<i32> = (1..=14).collect();
    let (status, body) = send(
        &app(),
        post_json(
            "/quizzes",
            json!({"previous_questions": previous, "quiz_category": {"type": "click", "id": 0}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], 15);
}

#[tokio::test]
async fn quiz_unknown_category_has_no_question() {
    let (status, body) = send(
        &app(),
        post_json(
            "/quizzes",
            json!({"previous_questions": [], "quiz_category": {"type": "Cooking", "id": 42}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["question"].is_null());
}

#[tokio::test]
async fn quiz_without_previous_questions_is_unprocessable() {
    let (status, body) = send(
        &app(),
        post_json("/quizzes", json!({"quiz_category": {"type": "Art", "id": 2}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], 422);
}

#[tokio::test]
async fn wrong_method_and_unknown_route() {
    let app = app();
    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/categories")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "Method not allowed");

    let (status, body) = send(&app, get("/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], 404);
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let request = Request::builder()
        .uri("/categories")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn whitespace_search_term_is_not_trimmed() {
    let (status, body) = send(
        &app(),
        post_json("/questions/search", json!({"searchTerm": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn oversized_page_number_is_past_the_end() {
    let (status, body) = send(&app(), get("/questions?page=99999999999999999999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], 404);
}
