//! API endpoint integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

mod common;
use common::{body_json, body_text, build_test_router, setup_static_dir};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_scenarios_endpoint() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(get("/api/scenarios")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let scenarios = json["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 3);
    assert_eq!(scenarios[0]["id"], "frustrated_sarah");
    assert_eq!(scenarios[0]["difficulty"], "hard");
    assert_eq!(scenarios[2]["emotion"], "anxious");
}

#[tokio::test]
async fn test_voice_test_echoes_text() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app
        .oneshot(post_json("/api/voice/test", r#"{"text":"Hello *sighs* there"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Voice test completed (server-side simulation)");
    assert_eq!(json["text"], "Hello *sighs* there");
    assert_eq!(json["clip"]["kind"], "console");
}

#[tokio::test]
async fn test_voice_test_rejects_invalid_json() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app
        .oneshot(post_json("/api/voice/test", "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid JSON");
}

#[tokio::test]
async fn test_analyze_scores_message() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app
        .oneshot(post_json(
            "/api/analyze",
            r#"{"message":"I'm so sorry, I understand and I will help you."}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let analysis = &json["analysis"];
    let empathy = analysis["empathyScore"].as_f64().unwrap();
    assert!((7.0..=10.0).contains(&empathy));
    let response_time = analysis["responseTime"].as_f64().unwrap();
    assert!((2.5..=4.5).contains(&response_time));
    assert_eq!(analysis["jargonScore"], 0.0);
}

#[tokio::test]
async fn test_analyze_rejects_invalid_json() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(post_json("/api/analyze", "nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid JSON");
}

#[tokio::test]
async fn test_cadence_plan_endpoint() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app
        .oneshot(post_json(
            "/api/cadence",
            r#"{"text":"Hello there. How are you?","pace":"slow","emotion":"worried"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["pace"], "slow");
    assert_eq!(json["emotion"], "worried");
    assert_eq!(json["thinking_ms"], 3000);
    assert_eq!(json["chunks"].as_array().unwrap().len(), 2);
    assert_eq!(json["chunks"][1]["pause_after_ms"], 2000);
    assert!(!json["segments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cadence_rejects_unknown_pace() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app
        .oneshot(post_json("/api/cadence", r#"{"text":"Hi.","pace":"ludicrous"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("ludicrous"));
}

#[tokio::test]
async fn test_unknown_api_endpoint() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(get("/api/nothing-here")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "API endpoint not found");
}

#[tokio::test]
async fn test_root_serves_training_gui() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("training"));
}

#[tokio::test]
async fn test_static_file_content_type() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(get("/css/app.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
}

#[tokio::test]
async fn test_extensionless_path_falls_back_to_html() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(get("/about")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h1>about</h1>");
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(get("/missing.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "<h1>404 Not Found</h1>");
}

#[tokio::test]
async fn test_path_traversal_is_forbidden() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app.oneshot(get("/../secret.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(response).await, "<h1>403 Forbidden</h1>");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let dir = setup_static_dir();
    let app = build_test_router(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/scenarios")
                .header(header::ORIGIN, "http://localhost:8080")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
