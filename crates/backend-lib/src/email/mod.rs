// ============================
// crates/backend-lib/src/email/mod.rs
// ============================

//! Outgoing mail seam.
//!
//! The flows only know `send(recipient, subject, html_body)`. Whether a
//! delivery failure matters is the flow's decision: registration and
//! welcome mail swallow it, explicit resend/recovery propagate it.

pub mod templates;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{EmailSettings, SmtpSettings};
use crate::error::AppError;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

/// SMTP relay mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &EmailSettings, smtp: &SmtpSettings) -> Result<Self, AppError> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|err| AppError::Internal(format!("invalid from address: {err}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|err| AppError::Internal(format!("smtp transport setup failed: {err}")))?
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .port(smtp.port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|err| AppError::Delivery(format!("invalid recipient: {err}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|err| AppError::Delivery(format!("message build failed: {err}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| AppError::Delivery(format!("smtp send failed: {err}")))?;
        Ok(())
    }
}

/// Development fallback when no SMTP relay is configured: log the mail
/// instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), AppError> {
        info!(%to, %subject, "smtp not configured, logging mail instead of sending");
        Ok(())
    }
}

/// Subject/template-aware front over a [`Mailer`].
pub struct EmailNotifier {
    mailer: Arc<dyn Mailer>,
    settings: EmailSettings,
}

impl EmailNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, settings: EmailSettings) -> Self {
        Self { mailer, settings }
    }

    /// Pick the SMTP mailer when a relay is configured, the logging
    /// fallback otherwise.
    pub fn from_settings(settings: &EmailSettings) -> Result<Self, AppError> {
        let mailer: Arc<dyn Mailer> = match &settings.smtp {
            Some(smtp) => Arc::new(SmtpMailer::new(settings, smtp)?),
            None => Arc::new(LogMailer),
        };
        Ok(Self::new(mailer, settings.clone()))
    }

    pub async fn send_verification_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        let body = templates::render_verification_code(code);
        self.mailer
            .send(email, &self.settings.verification_subject, &body)
            .await?;
        info!(%email, "verification email sent");
        Ok(())
    }

    pub async fn send_welcome(&self, email: &str) -> Result<(), AppError> {
        let body = templates::render_welcome();
        self.mailer
            .send(email, &self.settings.welcome_subject, &body)
            .await?;
        info!(%email, "welcome email sent");
        Ok(())
    }
}
