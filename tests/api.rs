use std::sync::Arc;

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::{
    app,
    config::Config,
    repositories::memory::MemoryTodoStore,
    state::AppState,
};

const SECRET: &[u8] = b"integration-secret";

fn test_state(require_auth: bool) -> AppState {
    let mut config = Config::with_secret(SECRET);
    config.require_auth = require_auth;
    AppState::with_store(&config, Arc::new(MemoryTodoStore::new()))
}

fn test_app() -> Router {
    app(test_state(false))
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create(app: &Router, body: Value) -> Value {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/todos/", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

async fn list(app: &Router) -> Vec<Value> {
    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/todos/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await.as_array().unwrap().clone()
}

// --- health ---

#[tokio::test]
async fn root_reports_running() {
    let resp = test_app().oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "Todo API is running");
}

// --- list ---

#[tokio::test]
async fn list_empty_store_returns_empty_array() {
    let app = test_app();
    assert!(list(&app).await.is_empty());

    let resp = app.oneshot(empty_request("GET", "/api/todos")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = test_app();
    for title in ["first", "second", "third"] {
        create(&app, json!({ "title": title })).await;
    }

    let titles: Vec<String> = list(&app)
        .await
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

// --- create ---

#[tokio::test]
async fn create_returns_201_with_defaults() {
    let app = test_app();
    let before = Utc::now() - Duration::seconds(1);

    let todo = create(&app, json!({ "title": "Buy milk", "description": "From store" })).await;

    assert_eq!(todo["title"], "Buy milk");
    assert_eq!(todo["description"], "From store");
    assert_eq!(todo["is_completed"], false);
    assert!(todo["id"].as_i64().unwrap() > 0);

    let created_at: chrono::DateTime<Utc> = todo["created_at"].as_str().unwrap().parse().unwrap();
    assert!(created_at >= before);
}

#[tokio::test]
async fn create_without_description_stores_null() {
    let app = test_app();
    let todo = create(&app, json!({ "title": "Only a title" })).await;
    assert!(todo["description"].is_null());
}

#[tokio::test]
async fn create_with_blank_title_is_422() {
    let resp = test_app()
        .oneshot(json_request("POST", "/api/todos/", json!({ "title": "  " })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(resp).await["detail"].is_string());
}

#[tokio::test]
async fn create_with_overlong_title_is_422() {
    let resp = test_app()
        .oneshot(json_request(
            "POST",
            "/api/todos/",
            json!({ "title": "x".repeat(201) }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_without_title_is_422() {
    let app = test_app();
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/todos/", json!({ "description": "x" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(list(&app).await.is_empty());
}

// --- get ---

#[tokio::test]
async fn get_existing_todo() {
    let app = test_app();
    let created = create(&app, json!({ "title": "Find me" })).await;
    let id = created["id"].as_i64().unwrap();

    let resp = app
        .oneshot(empty_request("GET", &format!("/api/todos/{}", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, created);
}

#[tokio::test]
async fn get_missing_todo_is_404_with_detail() {
    let resp = test_app()
        .oneshot(empty_request("GET", "/api/todos/999"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({ "detail": "Todo not found" }));
}

async fn assert_json_422(resp: Response) {
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert!(body_json(resp).await["detail"].is_string());
}

#[tokio::test]
async fn non_numeric_id_is_422_with_detail() {
    let app = test_app();
    for (method, uri) in [
        ("GET", "/api/todos/abc"),
        ("DELETE", "/api/todos/abc"),
        ("GET", "/api/todos/99999999999999999999"),
    ] {
        let resp = app.clone().oneshot(empty_request(method, uri)).await.unwrap();
        assert_json_422(resp).await;
    }

    let resp = app
        .oneshot(json_request("PUT", "/api/todos/abc", json!({ "is_completed": true })))
        .await
        .unwrap();
    assert_json_422(resp).await;
}

#[tokio::test]
async fn unparsable_json_body_is_422_with_detail() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/todos/")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let resp = app.clone().oneshot(request).await.unwrap();
    assert_json_422(resp).await;
    assert!(list(&app).await.is_empty());
}

// --- update ---

#[tokio::test]
async fn update_completion_leaves_other_fields() {
    let app = test_app();
    let created = create(&app, json!({ "title": "Buy milk", "description": "From store" })).await;
    let id = created["id"].as_i64().unwrap();

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", id),
            json!({ "is_completed": true }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let updated = body_json(resp).await;
    assert_eq!(updated["is_completed"], true);
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["description"], created["description"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_eq!(updated["id"], created["id"]);
}

#[tokio::test]
async fn update_title_and_description() {
    let app = test_app();
    let created = create(&app, json!({ "title": "Old" })).await;
    let id = created["id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", id),
            json!({ "title": "New", "description": "Added later" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let fetched = body_json(
        app.oneshot(empty_request("GET", &format!("/api/todos/{}", id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(fetched["title"], "New");
    assert_eq!(fetched["description"], "Added later");
    assert_eq!(fetched["is_completed"], false);
}

#[tokio::test]
async fn update_missing_todo_is_404_and_changes_nothing() {
    let app = test_app();
    create(&app, json!({ "title": "Untouched" })).await;
    let before = list(&app).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/todos/999",
            json!({ "title": "Nope", "is_completed": true }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(list(&app).await, before);
}

#[tokio::test]
async fn update_with_blank_title_is_rejected_without_side_effects() {
    let app = test_app();
    let created = create(&app, json!({ "title": "Keep me" })).await;
    let id = created["id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", id),
            json!({ "title": "", "is_completed": true }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(list(&app).await, vec![created]);
}

// --- delete ---

#[tokio::test]
async fn delete_returns_snapshot_then_404() {
    let app = test_app();
    let created = create(&app, json!({ "title": "Temporary" })).await;
    let uri = format!("/api/todos/{}", created["id"].as_i64().unwrap());

    let resp = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, created);

    let resp = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth ---

async fn login(app: &Router, username: &str, password: &str) -> Response {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap()
}

fn bearer(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn login_with_matching_credentials_returns_bearer_token() {
    let app = test_app();
    let resp = login(&app, "bob", "bob").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap();

    let resp = app.oneshot(bearer("GET", "/api/auth/me", token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["username"], "bob");
}

#[tokio::test]
async fn login_with_mismatched_credentials_is_401() {
    let resp = login(&test_app(), "bob", "carol").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({ "detail": "Invalid credentials" }));
}

#[tokio::test]
async fn login_with_empty_credentials_is_401() {
    let resp = login(&test_app(), "", "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_without_header_is_401() {
    let resp = test_app()
        .oneshot(empty_request("GET", "/api/auth/me"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        json!({ "detail": "Missing or invalid Authorization header" })
    );
}

#[tokio::test]
async fn me_with_expired_token_is_401() {
    let state = test_state(false);
    let token = state
        .tokens
        .issue_with_ttl("alice", Duration::minutes(-1))
        .unwrap();

    let resp = app(state)
        .oneshot(bearer("GET", "/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({ "detail": "Token expired" }));
}

#[tokio::test]
async fn me_with_garbage_token_is_401() {
    let resp = test_app()
        .oneshot(bearer("GET", "/api/auth/me", "garbage"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({ "detail": "Invalid token" }));
}

#[tokio::test]
async fn me_with_empty_bearer_token_is_invalid_token() {
    let resp = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(http::header::AUTHORIZATION, "Bearer ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({ "detail": "Invalid token" }));
}

#[tokio::test]
async fn todo_routes_are_open_by_default() {
    let resp = test_app()
        .oneshot(empty_request("GET", "/api/todos/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn guarded_todo_routes_require_token() {
    let app = app(test_state(true));

    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/todos/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(login(&app, "alice", "alice").await).await;
    let token = body["access_token"].as_str().unwrap();

    let resp = app
        .oneshot(bearer("GET", "/api/todos/", token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
