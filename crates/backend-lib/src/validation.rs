// ============================
// crates/backend-lib/src/validation.rs
// ============================

//! Request-shape validation for the auth endpoints.
//!
//! Everything here runs at the HTTP boundary, before a flow is entered;
//! the flows themselves only see well-formed input.
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::PasswordRequirements;
use crate::error::AppError;
use storefront_common::{
    LoginRequest, RecoverPasswordRequest, RegisterRequest, ResendVerificationRequest,
    ResetPasswordRequest, VerifyEmailRequest,
};

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 20;

// Regex patterns for validation
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static RUT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{7,8}-[0-9kK]$").unwrap());
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚüÜñÑ\s\-]+$").unwrap());
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{9}$").unwrap());
static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid RUT: {0}")]
    InvalidRut(String),

    #[error("Invalid {field}: {reason}")]
    InvalidName {
        field: &'static str,
        reason: String,
    },

    #[error("Invalid phone number: must be exactly 9 digits")]
    InvalidPhone,

    #[error("Invalid birth date: must be in the past")]
    InvalidBirthDate,

    #[error("Invalid verification code: must be exactly 6 digits")]
    InvalidCodeShape,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type for validation operations
pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_email(email: &str) -> ValidationResult {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail("must not be empty".into()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail("too long".into()));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail("malformed address".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str, req: &PasswordRequirements) -> ValidationResult {
    let length = password.chars().count();
    if length < req.min_length {
        return Err(ValidationError::InvalidPassword(format!(
            "must be at least {} characters",
            req.min_length
        )));
    }
    if length > req.max_length {
        return Err(ValidationError::InvalidPassword(format!(
            "must be at most {} characters",
            req.max_length
        )));
    }
    if req.require_uppercase && !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::InvalidPassword(
            "must contain an uppercase letter".into(),
        ));
    }
    if req.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPassword(
            "must contain a digit".into(),
        ));
    }
    if req.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(ValidationError::InvalidPassword(
            "must contain a special character".into(),
        ));
    }
    Ok(())
}

/// Validate a Chilean RUT: `XXXXXXXX-X` shape plus mod-11 check digit.
pub fn validate_rut(rut: &str) -> ValidationResult {
    if !RUT_REGEX.is_match(rut) {
        return Err(ValidationError::InvalidRut(
            "expected format XXXXXXXX-X".into(),
        ));
    }
    let (digits, dv) = rut.split_once('-').expect("shape checked above");
    if rut_check_digit(digits) != dv.to_ascii_uppercase() {
        return Err(ValidationError::InvalidRut("check digit mismatch".into()));
    }
    Ok(())
}

fn rut_check_digit(digits: &str) -> String {
    let sum: u32 = digits
        .bytes()
        .rev()
        .zip([2u32, 3, 4, 5, 6, 7].into_iter().cycle())
        .map(|(b, factor)| u32::from(b - b'0') * factor)
        .sum();
    match 11 - (sum % 11) {
        11 => "0".to_string(),
        10 => "K".to_string(),
        d => d.to_string(),
    }
}

fn validate_name(value: &str, field: &'static str) -> ValidationResult {
    let length = value.chars().count();
    if length < MIN_NAME_LENGTH || length > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidName {
            field,
            reason: format!("must be {MIN_NAME_LENGTH}-{MAX_NAME_LENGTH} characters"),
        });
    }
    if !NAME_REGEX.is_match(value) {
        return Err(ValidationError::InvalidName {
            field,
            reason: "contains characters outside the Spanish alphabet".into(),
        });
    }
    Ok(())
}

pub fn validate_code_shape(code: &str) -> ValidationResult {
    if !CODE_REGEX.is_match(code) {
        return Err(ValidationError::InvalidCodeShape);
    }
    Ok(())
}

// ---------- per-endpoint validators ----------

pub fn validate_register(
    req: &RegisterRequest,
    password_req: &PasswordRequirements,
) -> ValidationResult {
    validate_email(&req.email)?;
    validate_password(&req.password, password_req)?;
    if req.password != req.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    validate_rut(&req.rut)?;
    validate_name(&req.first_name, "first name")?;
    validate_name(&req.last_name, "last name")?;
    if !PHONE_REGEX.is_match(&req.phone_number) {
        return Err(ValidationError::InvalidPhone);
    }
    if req.birth_date >= chrono::Utc::now().date_naive() {
        return Err(ValidationError::InvalidBirthDate);
    }
    Ok(())
}

pub fn validate_login(req: &LoginRequest) -> ValidationResult {
    validate_email(&req.email)?;
    if req.password.is_empty() {
        return Err(ValidationError::InvalidPassword("must not be empty".into()));
    }
    Ok(())
}

pub fn validate_verify_email(req: &VerifyEmailRequest) -> ValidationResult {
    validate_email(&req.email)?;
    validate_code_shape(&req.verification_code)
}

pub fn validate_resend(req: &ResendVerificationRequest) -> ValidationResult {
    validate_email(&req.email)
}

pub fn validate_recover(req: &RecoverPasswordRequest) -> ValidationResult {
    validate_email(&req.email)
}

pub fn validate_reset(
    req: &ResetPasswordRequest,
    password_req: &PasswordRequirements,
) -> ValidationResult {
    validate_email(&req.email)?;
    validate_code_shape(&req.verification_code)?;
    validate_password(&req.new_password, password_req)?;
    if req.new_password != req.confirm_new_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
