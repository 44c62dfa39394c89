// ============================
// crates/backend-lib/src/config.rs
// ============================

//! Configuration management.
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub jwt: JwtSettings,
    pub verification: VerificationSettings,
    pub reaper: ReaperSettings,
    pub email: EmailSettings,
    pub password: PasswordRequirements,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server bind host
    pub host: String,
    /// Server bind port
    pub port: u16,
    /// Log level filter used when RUST_LOG is absent
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    /// Symmetric signing secret. Must be provided by configuration;
    /// an empty value fails validation at startup.
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSettings {
    /// Lifetime of a 6-digit code in seconds
    pub code_ttl_secs: u64,
    /// Failed submissions tolerated before the lockout action fires
    pub max_attempts: i32,
    /// When false, registration creates accounts already confirmed
    /// and no email-verification code is issued.
    pub require_email_verification: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaperSettings {
    /// Days added to the current time to obtain the retention cutoff.
    /// Negative by convention: -30 keeps unconfirmed accounts for 30 days.
    pub offset_days: i64,
    /// Seconds between reaper passes
    pub interval_secs: u64,
    /// Delay ladder for retrying a failed invocation, in seconds
    pub retry_delays_secs: Vec<u64>,
    /// Upper bound on retry attempts per invocation
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    /// From header, e.g. "Storefront <no-reply@storefront.example>"
    pub from: String,
    pub verification_subject: String,
    pub welcome_subject: String,
    /// SMTP relay credentials. When absent, outgoing mail is logged
    /// instead of sent.
    pub smtp: Option<SmtpSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Password complexity requirements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            jwt: JwtSettings::default(),
            verification: VerificationSettings::default(),
            reaper: ReaperSettings::default(),
            email: EmailSettings::default(),
            password: PasswordRequirements::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
        }
    }
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            code_ttl_secs: 180,
            max_attempts: 5,
            require_email_verification: true,
        }
    }
}

impl Default for ReaperSettings {
    fn default() -> Self {
        Self {
            offset_days: -30,
            interval_secs: 60 * 60 * 24,
            retry_delays_secs: vec![60, 120, 300, 600, 900],
            max_attempts: 10,
        }
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            from: "Storefront <no-reply@storefront.example>".to_string(),
            verification_subject: "Your verification code".to_string(),
            welcome_subject: "Welcome to the store".to_string(),
            smtp: None,
        }
    }
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 20,
            require_uppercase: true,
            require_digit: true,
            require_special: true,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` and `STOREFRONT_*` env vars,
    /// layered over the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings from an explicit TOML file path.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("STOREFRONT_").split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations that must not reach a running server.
    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.trim().is_empty() {
            bail!("jwt.secret is not configured");
        }
        if self.verification.code_ttl_secs == 0 {
            bail!("verification.code_ttl_secs must be greater than zero");
        }
        if self.verification.max_attempts < 1 {
            bail!("verification.max_attempts must be at least 1");
        }
        // The offset is added to the current time: zero or negative keeps
        // the cutoff in the past. A positive value would reap accounts
        // younger than the retention window, so refuse it outright.
        if self.reaper.offset_days > 0 {
            bail!(
                "reaper.offset_days must be zero or negative (got {})",
                self.reaper.offset_days
            );
        }
        if self.reaper.retry_delays_secs.is_empty() {
            bail!("reaper.retry_delays_secs must not be empty");
        }
        Ok(())
    }
}
