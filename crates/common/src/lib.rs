// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the storefront auth API surface and the backend crates.
//! This module defines the account domain model and the request/response
//! payloads of the auth endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role name assigned to every freshly registered account.
pub const DEFAULT_ROLE: &str = "Customer";

/// A storefront account.
///
/// The password credential is deliberately absent: it is owned by the
/// credential verifier and never stored or compared by this crate.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    /// Stored lowercased; lookups are case-insensitive.
    pub email: String,
    /// Chilean national id, `XXXXXXXX-X` with a mod-11 check digit.
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub confirmed: bool,
    pub roles: Vec<String>,
    pub registered_at: DateTime<Utc>,
}

impl Account {
    /// Display name used in session claims and welcome mail.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// The account's primary role, falling back to the default.
    pub fn primary_role(&self) -> &str {
        self.roles.first().map_or(DEFAULT_ROLE, String::as_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// What a verification code is allowed to prove.
///
/// Codes are scoped per purpose: an email-verification code can never be
/// consumed by the password-reset flow and vice versa.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePurpose {
    EmailVerification,
    PasswordReset,
}

/// A single issued 6-digit code.
///
/// Several rows may exist simultaneously for the same (account, purpose);
/// only the most recently created one is ever consulted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerificationCode {
    pub id: u64,
    pub account_id: Uuid,
    pub purpose: CodePurpose,
    pub code: String,
    pub attempt_count: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// A code is active while its expiry lies in the future.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

// ---------- request payloads ----------

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub phone_number: String,
    pub gender: Gender,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub email: String,
    pub verification_code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecoverPasswordRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub verification_code: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

// ---------- response envelope ----------

/// The `{message, data}` envelope every auth endpoint answers with.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenericResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> GenericResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}
