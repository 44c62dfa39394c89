// ==========================
// tests/integration/http_api_tests.rs
// ==========================
//! HTTP round-trips through the axum router: envelopes, status codes and
//! the error taxonomy as seen by a client.
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use backend_lib::config::Settings;
use backend_lib::routes::create_router;
use backend_lib::store::AccountStore;
use backend_lib::AppState;

use crate::test_utils::{build_service, RecordingMailer, TEST_CODE, TEST_SECRET};

fn test_app() -> (Router, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let (service, store, _) = build_service(mailer.clone(), true);
    let accounts: Arc<dyn AccountStore> = store;

    let mut settings = Settings::default();
    settings.jwt.secret = TEST_SECRET.to_string();

    let state = Arc::new(AppState::new(service, settings, accounts));
    (create_router(state), mailer)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn register_body(email: &str, rut: &str) -> Value {
    json!({
        "email": email,
        "password": "Valid1!x",
        "confirmPassword": "Valid1!x",
        "rut": rut,
        "firstName": "Ana",
        "lastName": "Soto",
        "birthDate": "1990-05-20",
        "phoneNumber": "912345678",
        "gender": "Female"
    })
}

#[tokio::test]
async fn test_register_verify_login_round_trip() {
    let (app, _mailer) = test_app();

    let (status, body) = call(
        &app,
        "POST",
        "/register",
        register_body("a@x.com", "11111111-1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration successful");
    assert!(body["data"].as_str().unwrap().contains("Check your email"));

    let (status, _) = call(
        &app,
        "POST",
        "/verify-email",
        json!({"email": "a@x.com", "verificationCode": TEST_CODE}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        "POST",
        "/login",
        json!({"email": "a@x.com", "password": "Valid1!x"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(!body["data"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_maps_to_validation_error() {
    let (app, _) = test_app();

    call(
        &app,
        "POST",
        "/register",
        register_body("a@x.com", "11111111-1"),
    )
    .await;
    let (status, body) = call(
        &app,
        "POST",
        "/register",
        register_body("a@x.com", "22222222-2"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");
}

#[tokio::test]
async fn test_malformed_rut_is_rejected_at_the_boundary() {
    let (app, _) = test_app();

    let (status, body) = call(
        &app,
        "POST",
        "/register",
        register_body("a@x.com", "11111111-2"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");
}

#[tokio::test]
async fn test_unconfirmed_login_is_unauthorized() {
    let (app, _) = test_app();

    call(
        &app,
        "POST",
        "/register",
        register_body("a@x.com", "11111111-1"),
    )
    .await;
    let (status, body) = call(
        &app,
        "POST",
        "/login",
        json!({"email": "a@x.com", "password": "Valid1!x"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_001");
}

#[tokio::test]
async fn test_recover_password_is_generic_for_unknown_emails() {
    let (app, mailer) = test_app();

    let (status, body) = call(
        &app,
        "POST",
        "/recover-password",
        json!({"email": "nobody@x.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]
        .as_str()
        .unwrap()
        .contains("If the email exists"));
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn test_resend_throttle_surfaces_remaining_seconds() {
    let (app, _) = test_app();

    call(
        &app,
        "POST",
        "/register",
        register_body("a@x.com", "11111111-1"),
    )
    .await;
    let (status, body) = call(
        &app,
        "POST",
        "/resend-email-verification-code",
        json!({"email": "a@x.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_001");
    assert!(body["error"]["remainingSeconds"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_reset_password_uses_patch() {
    let (app, _) = test_app();

    call(
        &app,
        "POST",
        "/register",
        register_body("a@x.com", "11111111-1"),
    )
    .await;
    call(
        &app,
        "POST",
        "/verify-email",
        json!({"email": "a@x.com", "verificationCode": TEST_CODE}),
    )
    .await;
    call(
        &app,
        "POST",
        "/recover-password",
        json!({"email": "a@x.com"}),
    )
    .await;

    let reset = json!({
        "email": "a@x.com",
        "verificationCode": TEST_CODE,
        "newPassword": "Fresh2!x",
        "confirmNewPassword": "Fresh2!x"
    });

    // wrong verb is refused by the router
    let (status, _) = call(&app, "POST", "/reset-password", reset.clone()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, body) = call(&app, "PATCH", "/reset-password", reset).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset");
}

#[tokio::test]
async fn test_logout_acknowledges_statelessly() {
    let (app, _) = test_app();
    let (status, body) = call(&app, "POST", "/logout", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Session closed");
}
