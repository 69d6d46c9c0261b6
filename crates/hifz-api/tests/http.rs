/// End-to-end tests: drive the full router against an in-memory database.
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use hifz_api::token::TokenAuthority;
use hifz_api::{AppState, AppStateInner, router};
use hifz_db::Database;

const SECRET: &str = "integration-test-secret";

fn app() -> Router {
    app_with_state().0
}

fn app_with_state() -> (Router, AppState) {
    let db = Database::open_in_memory().unwrap();
    let tokens = TokenAuthority::new(SECRET, Duration::hours(1));
    let state: AppState = Arc::new(AppStateInner::new(db, tokens));
    (router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn register(app: &Router, username: &str) -> StatusCode {
    let body = json!({
        "username": username,
        "password": "password",
        "fullname": "Aditira Jamhuri",
        "desc": "Nama saya Aditira",
        "profile_pic": "https://google.com",
    });
    send(app, Method::POST, "/users", None, Some(body)).await.0
}

async fn sign_in(app: &Router, username: &str) -> String {
    let body = json!({ "username": username, "password": "password" });
    let (status, value) = send(app, Method::POST, "/signin", None, Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{value}");
    value["token"].as_str().unwrap().to_string()
}

async fn user_with_token(app: &Router, username: &str) -> String {
    assert_eq!(register(app, username).await, StatusCode::CREATED);
    sign_in(app, username).await
}

fn al_mulk() -> Value {
    json!({
        "surah_name": "Al-Mulk",
        "ayah_range": "1-30",
        "total_ayah": 30,
        "date_started": "2024-01-01T00:00:00Z",
        "review_frequency": "weekly",
    })
}

#[tokio::test]
async fn health_is_plain_ok() {
    let (status, body) = send(&app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".into()));
}

#[tokio::test]
async fn register_echoes_account_and_rejects_duplicates() {
    let app = app();

    let body = json!({ "username": "aditira", "password": "password", "fullname": "Aditira Jamhuri" });
    let (status, value) = send(&app, Method::POST, "/users", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["status"], "Created");
    assert_eq!(value["user"]["fullname"], "Aditira Jamhuri");
    assert!(value["user"].get("password").is_none());

    let (status, value) = send(&app, Method::POST, "/users", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(value["error"], "username already registered");
}

#[tokio::test]
async fn malformed_input_is_bad_request() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, value) = send(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "username": "eddy", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].is_string());

    let (status, _) = send(&app, Method::POST, "/signin", None, Some(json!({ "username": "eddy" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sign_in_checks_password() {
    let app = app();
    assert_eq!(register(&app, "user").await, StatusCode::CREATED);

    let (status, value) = send(
        &app,
        Method::POST,
        "/signin",
        None,
        Some(json!({ "username": "user", "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "Logged in");
    assert_eq!(value["user"]["username"], "user");

    let claims = TokenAuthority::new(SECRET, Duration::hours(1))
        .verify_token(value["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.username, "user");

    let (status, value) = send(
        &app,
        Method::POST,
        "/signin",
        None,
        Some(json!({ "username": "user", "password": "wrongpassword" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["error"], "Invalid username or password");
    assert!(value.get("token").is_none());
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();
    let foreign = TokenAuthority::new("someone-else", Duration::hours(1))
        .issue(Uuid::new_v4(), "user")
        .unwrap();
    let expired = TokenAuthority::new(SECRET, Duration::hours(1))
        .issue_token(Uuid::new_v4(), "user", Duration::zero())
        .unwrap();

    let routes = [
        (Method::GET, "/memorizes"),
        (Method::POST, "/memorizes"),
        (Method::GET, "/memorizes/1"),
        (Method::PUT, "/memorizes/1"),
        (Method::DELETE, "/memorizes/1"),
        (Method::GET, "/photos"),
        (Method::POST, "/photos"),
        (Method::GET, "/photos/1"),
        (Method::DELETE, "/photos/1"),
    ];

    for (method, uri) in routes {
        for token in [None, Some("garbage"), Some(foreign.as_str()), Some(expired.as_str())] {
            let request = {
                let mut builder = Request::builder().method(method.clone()).uri(uri);
                if let Some(token) = token {
                    builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
                }
                builder.body(Body::empty()).unwrap()
            };
            let response = app.clone().oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        }
    }
}

#[tokio::test]
async fn memorize_lifecycle_is_owner_scoped() {
    let app = app();
    let user = user_with_token(&app, "user").await;
    let other = user_with_token(&app, "other").await;

    let (status, value) = send(&app, Method::POST, "/memorizes", Some(&user), Some(al_mulk())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = value["memorize_id"].as_i64().unwrap();
    assert!(id > 0);

    let uri = format!("/memorizes/{}", id);

    let (status, value) = send(&app, Method::GET, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["surah_name"], "Al-Mulk");
    assert_eq!(value["total_ayah"], 30);

    let (status, value) = send(&app, Method::GET, "/memorizes", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value.as_array().unwrap().len(), 1);

    // Invisible to anyone else
    let (_, value) = send(&app, Method::GET, "/memorizes", Some(&other), None).await;
    assert!(value.as_array().unwrap().is_empty());
    let (status, _) = send(&app, Method::GET, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut update = al_mulk();
    update["accuracy_level"] = json!("high");
    update["notes"] = json!("review ayah 15-20");
    let (status, value) = send(&app, Method::PUT, &uri, Some(&user), Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["id"], id);
    assert_eq!(value["accuracy_level"], "high");
    assert_eq!(value["notes"], "review ayah 15-20");

    let (status, _) = send(&app, Method::PUT, &uri, Some(&other), Some(update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, value) = send(&app, Method::DELETE, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "Memorize record deleted");

    let (status, value) = send(&app, Method::DELETE, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "Memorize record not found");

    let (status, _) = send(&app, Method::GET, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn memorize_input_is_validated() {
    let app = app();
    let user = user_with_token(&app, "user").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/memorizes",
        Some(&user),
        Some(json!({ "surah_name": "", "total_ayah": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/memorizes/abc", Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn photo_lifecycle() {
    let app = app();
    let user = user_with_token(&app, "user").await;

    let photo = json!({ "url": "https://example.com/photo.jpg", "caption": "A beautiful sunset" });
    let (status, value) = send(&app, Method::POST, "/photos", Some(&user), Some(photo)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = value["photo_id"].as_i64().unwrap();
    assert!(id > 0);

    let uri = format!("/photos/{}", id);
    let (status, value) = send(&app, Method::GET, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["caption"], "A beautiful sunset");

    let (_, value) = send(&app, Method::GET, "/photos", Some(&user), None).await;
    assert_eq!(value.as_array().unwrap().len(), 1);

    // Invisible to anyone else
    let other = user_with_token(&app, "other").await;
    let (status, value) = send(&app, Method::GET, "/photos", Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(value.as_array().unwrap().is_empty());
    let (status, value) = send(&app, Method::GET, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "Photo not found");
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, value) = send(&app, Method::DELETE, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "Photo deleted");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let (status, value) = send(&app(), Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "Page not found");
}

#[tokio::test]
async fn unsupported_verb_is_json_not_found() {
    let app = app();

    let (status, value) = send(&app, Method::GET, "/users", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "Page not found");

    let user = user_with_token(&app, "user").await;
    let photo = json!({ "url": "https://example.com/photo.jpg" });
    let (_, value) = send(&app, Method::POST, "/photos", Some(&user), Some(photo.clone())).await;
    let uri = format!("/photos/{}", value["photo_id"].as_i64().unwrap());

    let (status, value) = send(&app, Method::PUT, &uri, Some(&user), Some(photo)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "Page not found");
}

#[tokio::test]
async fn token_of_deleted_account_is_rejected() {
    let (app, state) = app_with_state();
    let old = user_with_token(&app, "user").await;

    let (status, _) = send(&app, Method::GET, "/memorizes", Some(&old), None).await;
    assert_eq!(status, StatusCode::OK);

    state.db.soft_delete_user("user").unwrap();

    let (status, value) = send(&app, Method::GET, "/memorizes", Some(&old), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["error"], "Unauthorized");
    let (status, _) = send(&app, Method::POST, "/memorizes", Some(&old), Some(al_mulk())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Same username, new account: the old token must not carry over
    let new = user_with_token(&app, "user").await;
    let (status, _) = send(&app, Method::GET, "/memorizes", Some(&old), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, value) = send(&app, Method::GET, "/memorizes", Some(&new), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(value.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sign_out_is_always_acknowledged() {
    let (status, value) = send(&app(), Method::POST, "/signout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "Logged out");
}
