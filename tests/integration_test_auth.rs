mod common;

use axum::http::StatusCode;
use common::{TestApp, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_defaults_to_attendee_and_token_works() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Alice",
        "email": "  Alice@Example.com ",
        "password": PASSWORD,
    }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "ATTENDEE");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.send("GET", "/api/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], body["userId"]);
    assert_eq!(me["name"], "Alice");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com", "ATTENDEE").await;

    let (status, body) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Alice Again",
        "email": "ALICE@example.com",
        "password": PASSWORD,
    }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already registered");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    let cases = [
        json!({ "name": "Bob", "email": "not-an-email", "password": PASSWORD }),
        json!({ "name": "Bob", "email": "bob@example.com", "password": "short" }),
        json!({ "name": "   ", "email": "bob@example.com", "password": PASSWORD }),
        json!({ "name": "Bob", "email": "bob@example.com", "password": PASSWORD, "role": "ADMIN" }),
        json!({ "name": "Bob", "email": "bob@example.com", "password": PASSWORD, "role": "SUPERUSER" }),
    ];

    for payload in cases {
        let (status, _) = app.send("POST", "/api/auth/register", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {} should be rejected", payload);
    }

    let count: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_malformed_register_body_is_a_validation_error() {
    let app = TestApp::new().await;

    let bodies = [
        r#"{"email":"a@b.io"}"#,
        r#"{"name":"Bob","email":"bob@example.com","password":12345678}"#,
        r#"{"name":"Bob","email":"#,
    ];

    for raw in bodies {
        let (status, body) = app.send_raw("POST", "/api/auth/register", None, Some(raw)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} should be rejected", raw);
        assert_eq!(body["message"], "Invalid request body");
    }

    let count: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_organizer_can_register() {
    let app = TestApp::new().await;
    let (status, body) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Olga",
        "email": "olga@example.com",
        "password": PASSWORD,
        "role": "organizer",
    }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "ORGANIZER");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com", "ATTENDEE").await;

    let (wrong_status, wrong_body) = app.send("POST", "/api/auth/login", None, Some(json!({
        "email": "alice@example.com",
        "password": "not-the-password",
    }))).await;

    let (unknown_status, unknown_body) = app.send("POST", "/api/auth/login", None, Some(json!({
        "email": "nobody@example.com",
        "password": PASSWORD,
    }))).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_returns_usable_token() {
    let app = TestApp::new().await;
    let (_, user_id) = app.register("Alice", "alice@example.com", "ATTENDEE").await;

    let token = app.login("ALICE@example.com", PASSWORD).await;
    let (status, me) = app.send("GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user_id.as_str());
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let app = TestApp::new().await;

    let (status, _) = app.send("GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("GET", "/api/tickets", Some("garbage.token.value"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("POST", "/api/events", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
