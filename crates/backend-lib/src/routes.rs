// ============================
// crates/backend-lib/src/routes.rs
// ============================

//! HTTP surface: the auth router and its handlers.
//!
//! Handlers validate request shape, delegate to the flows and wrap every
//! success in the `{message, data}` envelope. Failures convert through
//! `AppError::into_response`.
use axum::{
    extract::State,
    routing::{patch, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::error::AppError;
use crate::validation;
use crate::AppState;
use storefront_common::{
    GenericResponse, LoginRequest, RecoverPasswordRequest, RegisterRequest,
    ResendVerificationRequest, ResetPasswordRequest, VerifyEmailRequest,
};

/// Create the auth router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify-email", post(verify_email))
        .route(
            "/resend-email-verification-code",
            post(resend_email_verification_code),
        )
        .route("/recover-password", post(recover_password))
        .route("/reset-password", patch(reset_password))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<GenericResponse<String>>, AppError> {
    validation::validate_register(&req, &state.settings.password)?;
    let message = state.service.register(req).await?;
    Ok(Json(GenericResponse::new("Registration successful", message)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<GenericResponse<String>>, AppError> {
    validation::validate_login(&req)?;
    let (token, account_id) = state.service.login(req).await?;
    info!(%account_id, "login ok");
    Ok(Json(GenericResponse::new("Login successful", token)))
}

async fn logout() -> Json<GenericResponse<String>> {
    // sessions are stateless; the client discards the token
    Json(GenericResponse::new(
        "Session closed",
        "Sign out successful.".to_string(),
    ))
}

async fn verify_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<GenericResponse<String>>, AppError> {
    validation::validate_verify_email(&req)?;
    let message = state.service.verify_email(req).await?;
    Ok(Json(GenericResponse::new("Verification processed", message)))
}

async fn resend_email_verification_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResendVerificationRequest>,
) -> Result<Json<GenericResponse<String>>, AppError> {
    validation::validate_resend(&req)?;
    let message = state.service.resend_verification_code(req).await?;
    Ok(Json(GenericResponse::new("Request processed", message)))
}

async fn recover_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecoverPasswordRequest>,
) -> Result<Json<GenericResponse<String>>, AppError> {
    validation::validate_recover(&req)?;
    let message = state.service.recover_password(req).await?;
    Ok(Json(GenericResponse::new("Request processed", message)))
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<GenericResponse<String>>, AppError> {
    validation::validate_reset(&req, &state.settings.password)?;
    let message = state.service.reset_password(req).await?;
    Ok(Json(GenericResponse::new("Password reset", message)))
}
