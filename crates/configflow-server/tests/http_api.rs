//! HTTP surface tests against an in-process router.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use configflow_core::{AdminService, AuthConfig, Store};
use configflow_server::{create_router, AppState};
use serde_json::{json, Value};

fn server() -> TestServer {
    server_with(AuthConfig::new("http-test-signing-key"))
}

fn server_with(auth: AuthConfig) -> TestServer {
    TestServer::new(create_router(state(&auth))).unwrap()
}

fn state(auth: &AuthConfig) -> AppState {
    let store = Arc::new(Store::temporary().unwrap());
    AdminService::new(store.clone())
        .bootstrap("root", "pw123")
        .unwrap();

    AppState::new(store, auth)
}

fn bearer(credential: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", credential)).unwrap()
}

async fn login(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/admins/login")
        .json(&json!({"username": "root", "password": "pw123"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["token_type"], "Bearer");
    body["token"].as_str().unwrap().to_string()
}

fn assert_unauthorized(response: TestResponse) {
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({
        "error": true,
        "code": "UNAUTHORIZED",
        "message": "unauthorized"
    }));
}

#[tokio::test]
async fn health_is_public() {
    let server = server();
    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], true);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let server = server();

    let wrong = server
        .post("/api/v1/admins/login")
        .json(&json!({"username": "root", "password": "nope"}))
        .await;
    assert_unauthorized(wrong);

    let unknown = server
        .post("/api/v1/admins/login")
        .json(&json!({"username": "ghost", "password": "pw123"}))
        .await;
    assert_unauthorized(unknown);
}

#[tokio::test]
async fn protected_routes_require_credentials() {
    let server = server();

    assert_unauthorized(server.get("/api/v1/environments").await);
    assert_unauthorized(
        server
            .get("/api/v1/environments")
            .add_header(AUTHORIZATION, HeaderValue::from_static("Basic cm9vdDpwdzEyMw=="))
            .await,
    );
    assert_unauthorized(
        server
            .get("/api/v1/environments")
            .add_header(AUTHORIZATION, bearer("a.b.c"))
            .await,
    );
    assert_unauthorized(
        server
            .get("/api/v1/environments")
            .add_header(AUTHORIZATION, bearer("cfk_unknown"))
            .await,
    );
}

#[tokio::test]
async fn environment_lifecycle_with_session_token() {
    let server = server();
    let token = login(&server).await;

    let created = server
        .post("/api/v1/environments")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"name": "prod"}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let env: Value = created.json();
    assert_eq!(env["name"], "prod");
    assert_eq!(env["creator_type"], "admin");
    let id = env["id"].as_str().unwrap().to_string();

    let duplicate = server
        .post("/api/v1/environments")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"name": "prod"}))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
    let body: Value = duplicate.json();
    assert_eq!(body["code"], "CONFLICT");

    let renamed = server
        .put(&format!("/api/v1/environments/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"name": "prod"}))
        .await;
    renamed.assert_status_ok();

    let listed = server
        .get("/api/v1/environments?page=0&size=10")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    let envs: Vec<Value> = listed.json();
    assert_eq!(envs.len(), 1);

    server
        .delete(&format!("/api/v1/environments/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    server
        .get(&format!("/api/v1/environments/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let server = server();
    let token = login(&server).await;

    server
        .get("/api/v1/environments/not-hex")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_key_authenticates_until_revoked() {
    let server = server();
    let token = login(&server).await;

    let created = server
        .post("/api/v1/api-keys")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"name": "ci"}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let key: Value = created.json();
    let key_id = key["id"].as_str().unwrap().to_string();
    let secret = key["secret"].as_str().unwrap().to_string();

    // The secret is only ever returned on create.
    let fetched: Value = server
        .get(&format!("/api/v1/api-keys/{}", key_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert!(fetched.get("secret").is_none());

    let env: Value = server
        .post("/api/v1/environments")
        .add_header(AUTHORIZATION, bearer(&secret))
        .json(&json!({"name": "staging"}))
        .await
        .json();
    assert_eq!(env["creator_type"], "api_key");
    assert_eq!(env["creator_id"], key_id.as_str());

    server
        .delete(&format!("/api/v1/api-keys/{}", key_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    assert_unauthorized(
        server
            .get("/api/v1/environments")
            .add_header(AUTHORIZATION, bearer(&secret))
            .await,
    );
}

#[tokio::test]
async fn admins_never_expose_secret_hash() {
    let server = server();
    let token = login(&server).await;

    let created = server
        .post("/api/v1/admins")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"username": "alice", "password": "s3cret"}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let admin: Value = created.json();
    assert_eq!(admin["username"], "alice");
    assert!(admin.get("secret_hash").is_none());

    let admins: Vec<Value> = server
        .get("/api/v1/admins")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(admins.len(), 2);
    assert!(admins.iter().all(|a| a.get("secret_hash").is_none()));

    // The new administrator can log in.
    server
        .post("/api/v1/admins/login")
        .json(&json!({"username": "alice", "password": "s3cret"}))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn tokens_from_another_key_are_rejected() {
    let server = server();
    let other = server_with(AuthConfig::new("a-different-signing-key"));
    let foreign = login(&other).await;

    assert_unauthorized(
        server
            .get("/api/v1/environments")
            .add_header(AUTHORIZATION, bearer(&foreign))
            .await,
    );
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let server = server();
    let token = login(&server).await;

    server
        .post("/api/v1/environments")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"title": "prod"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn slow_requests_hit_the_deadline() {
    let auth = AuthConfig::new("http-test-signing-key");
    let state = state(&auth).with_request_timeout(Duration::from_millis(1));
    let server = TestServer::new(create_router(state)).unwrap();

    // Password verification takes far longer than a millisecond.
    server
        .post("/api/v1/admins/login")
        .json(&json!({"username": "root", "password": "pw123"}))
        .await
        .assert_status(StatusCode::REQUEST_TIMEOUT);

    // Cheap routes still answer under a normal deadline.
    let server = server_with(auth);
    server.get("/health").await.assert_status_ok();
}
