//! HTTP routes exercised through the router without binding a socket

mod common;

use std::fs;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{index_over, FakeSearch, LetterEmbedder, ScriptedModel};
use edubot::config::ModelConfig;
use edubot::errors::EduBotError;
use edubot::models::GroqClient;
use edubot::rag::RetrievalIndex;
use edubot::server::{build_router, AppState};
use edubot::tutor::{Tutor, TutorSettings};

fn router(index: Option<Arc<RetrievalIndex>>, model: Arc<ScriptedModel>) -> Router {
    let tutor = Tutor::new(index, model, FakeSearch::with_results(2), TutorSettings::default());
    build_router(AppState::new(Arc::new(tutor)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = router(None, ScriptedModel::replying(&[]));
    let request = Request::get("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_reindex_without_rag_is_not_implemented() {
    let app = router(None, ScriptedModel::replying(&[]));
    let request = Request::post("/index").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert!(body["detail"].as_str().unwrap().contains("RAG not available"));
}

#[tokio::test]
async fn test_reindex_picks_up_new_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "algebra basics").unwrap();
    let index = Arc::new(index_over(dir.path(), 100, 10, LetterEmbedder::new()));
    index.rebuild().unwrap();
    assert_eq!(index.len(), 1);

    fs::write(dir.path().join("b.txt"), "geometry basics").unwrap();
    let app = router(Some(index.clone()), ScriptedModel::replying(&[]));
    let request = Request::post("/index").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "indexed", "chunks": 2 }));
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_reindex_failure_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");
    let index = Arc::new(index_over(&missing, 100, 10, LetterEmbedder::new()));
    let app = router(Some(index), ScriptedModel::replying(&[]));
    let request = Request::post("/index").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_ask_returns_answer_and_sources() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cells.txt"), "Cells are the basic unit of life.").unwrap();
    let index = Arc::new(index_over(dir.path(), 100, 10, LetterEmbedder::new()));
    index.rebuild().unwrap();

    let app = router(Some(index), ScriptedModel::replying(&["A cell is a unit of life."]));
    let (status, body) = send(app, post_json("/ask", json!({ "question": "What is a cell?" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "A cell is a unit of life.");
    assert_eq!(body["rag_sources"], json!(["cells.txt"]));
    assert_eq!(body["web_sources"], json!([]));
    assert_eq!(body["used_web"], false);
}

#[tokio::test]
async fn test_ask_with_web_lists_sources() {
    let app = router(None, ScriptedModel::replying(&["NEEDS_WEB", "Fresh answer"]));
    let (status, body) = send(
        app,
        post_json("/ask", json!({ "question": "Latest exam dates?", "use_rag": false })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Fresh answer");
    assert_eq!(body["used_web"], true);
    assert_eq!(
        body["web_sources"][0],
        json!({ "title": "Result 0", "link": "https://example.org/0" })
    );
}

#[tokio::test]
async fn test_ask_blank_question_is_bad_request() {
    let app = router(None, ScriptedModel::replying(&[]));
    let (status, body) = send(app, post_json("/ask", json!({ "question": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_ask_model_failure_is_server_error() {
    let model = ScriptedModel::new(vec![Err(EduBotError::ModelApi("HTTP 503".into()))]);
    let app = router(None, model);
    let (status, body) = send(app, post_json("/ask", json!({ "question": "Why is the sky blue?" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Model error:"));
}

#[tokio::test]
async fn test_ask_bad_image_is_model_error() {
    let config = ModelConfig {
        api_key: Some("gsk_test".to_string()),
        ..ModelConfig::default()
    };
    let model = Arc::new(GroqClient::new(&config).unwrap());
    let tutor = Tutor::new(None, model, FakeSearch::with_results(0), TutorSettings::default());
    let app = build_router(AppState::new(Arc::new(tutor)));

    let (status, body) = send(
        app,
        post_json("/ask", json!({ "question": "q", "image": "data:nocomma" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Model error: Invalid image"));
}
