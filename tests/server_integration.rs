//! HTTP-level integration tests for the editor API
//!
//! The router is driven in-process with `oneshot`; the language model is a
//! scripted oracle.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use vrm_studio::core::config::PipelineConfig;
use vrm_studio::llm::scripted::ScriptedOracle;
use vrm_studio::params::schema::ParameterSchema;
use vrm_studio::pipeline::command::CommandPipeline;
use vrm_studio::pipeline::stage::PipelineMode;
use vrm_studio::server::{router, AppState};
use vrm_studio::session::Session;

fn app_with(oracle: Option<ScriptedOracle>) -> Router {
    let schema = Arc::new(ParameterSchema::vrm_default());
    let config = PipelineConfig {
        mode: PipelineMode::SingleShot,
        ..PipelineConfig::default()
    };
    let pipeline =
        oracle.map(|o| CommandPipeline::with_config(Arc::new(o), schema.clone(), &config));
    router(AppState::new(Arc::new(Session::new(schema, pipeline))))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_command_success() {
    let app = app_with(Some(ScriptedOracle::replying([
        r#"Here you go: [{"category":"face","name":"happy","value":1.0}]"#,
    ])));

    let response = app
        .oneshot(json_request("POST", "/api/command", json!({"command": "smile"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["parameters"],
        json!([{"category": "face", "name": "happy", "value": 1.0}])
    );
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn test_missing_command_is_bad_request() {
    let app = app_with(Some(ScriptedOracle::replying(["[]"])));

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/command", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Command is required");

    let blank = app
        .oneshot(json_request("POST", "/api/command", json!({"command": "  "})))
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_json_body_is_bad_request() {
    let app = app_with(Some(ScriptedOracle::replying(["[]"])));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/command")
                .header("content-type", "application/json")
                .body(Body::from("smile"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pipeline_failure_is_server_error() {
    let app = app_with(Some(ScriptedOracle::replying(["no idea, sorry"])));

    let response = app
        .oneshot(json_request("POST", "/api/command", json!({"command": "smile"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_disabled_natural_language() {
    let app = app_with(None);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/command", json!({"command": "smile"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let body = body_json(health).await;
    assert_eq!(body["natural_language"], false);
}

#[tokio::test]
async fn test_manual_edit_and_reset() {
    let app = app_with(None);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/parameters",
            json!({"category": "pose", "name": "leftArmRotationZ", "value": 0.5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let out_of_range = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/parameters",
            json!({"category": "face", "name": "happy", "value": 2.0}),
        ))
        .await
        .unwrap();
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    let unknown = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/parameters",
            json!({"category": "face", "name": "smirk", "value": 0.5}),
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let current = body_json(app.clone().oneshot(get("/api/parameters")).await.unwrap()).await;
    assert_eq!(
        current["parameters"],
        json!([{"category": "pose", "name": "leftArmRotationZ", "value": 0.5}])
    );

    let reset = app
        .clone()
        .oneshot(json_request("POST", "/api/parameters/reset", json!({})))
        .await
        .unwrap();
    assert_eq!(reset.status(), StatusCode::OK);
    assert_eq!(body_json(reset).await["parameters"], json!([]));

    let chat = body_json(app.oneshot(get("/api/chat")).await.unwrap()).await;
    let last = chat["messages"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["role"], "system");
    assert_eq!(last["text"], "All parameters have been reset.");
}

#[tokio::test]
async fn test_schema_endpoint() {
    let app = app_with(None);

    let response = app.oneshot(get("/api/schema")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.to_string().contains("headRotationX"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app_with(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
