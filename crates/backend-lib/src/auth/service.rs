// ============================
// crates/backend-lib/src/auth/service.rs
// ============================

//! The account flows: registration, login, email verification, code
//! resend, password recovery and reset.
//!
//! Each flow composes the code engine, token issuer and the external
//! seams (store, credential verifier, mailer) and returns a tagged
//! result; nothing here is thrown past the caller.
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{CodeEngine, CredentialVerifier, TokenIssuer};
use crate::email::EmailNotifier;
use crate::error::AppError;
use crate::store::{AccountStore, CodeStore};
use storefront_common::{
    Account, CodePurpose, LoginRequest, RecoverPasswordRequest, RegisterRequest,
    ResendVerificationRequest, ResetPasswordRequest, VerifyEmailRequest, DEFAULT_ROLE,
};

/// Generic recovery answer: account existence is never confirmed for
/// unknown emails.
const RECOVERY_MESSAGE: &str = "If the email exists, a recovery code will be sent.";

pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    codes: Arc<dyn CodeStore>,
    verifier: Arc<dyn CredentialVerifier>,
    notifier: EmailNotifier,
    engine: CodeEngine,
    tokens: TokenIssuer,
    require_email_verification: bool,
}

impl AccountService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        codes: Arc<dyn CodeStore>,
        verifier: Arc<dyn CredentialVerifier>,
        notifier: EmailNotifier,
        engine: CodeEngine,
        tokens: TokenIssuer,
        require_email_verification: bool,
    ) -> Self {
        Self {
            accounts,
            codes,
            verifier,
            notifier,
            engine,
            tokens,
            require_email_verification,
        }
    }

    /// Create an account and kick off email verification.
    ///
    /// Delivery of the first code is best-effort: a failed send is logged
    /// and swallowed, the account stays registered and the user can ask
    /// for a resend. The raw code never reaches the HTTP response.
    pub async fn register(&self, req: RegisterRequest) -> Result<String, AppError> {
        let email = req.email.trim().to_lowercase();

        if self.accounts.account_by_email(&email).await?.is_some() {
            return Err(AppError::Validation("email already registered".into()));
        }
        if self.accounts.account_by_rut(&req.rut).await?.is_some() {
            return Err(AppError::Validation("RUT already registered".into()));
        }

        self.accounts.ensure_role(DEFAULT_ROLE).await?;

        let account = Account {
            id: Uuid::new_v4(),
            email: email.clone(),
            rut: req.rut,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            gender: req.gender,
            birth_date: req.birth_date,
            confirmed: !self.require_email_verification,
            roles: vec![DEFAULT_ROLE.to_string()],
            registered_at: chrono::Utc::now(),
        };
        let account_id = account.id;

        self.accounts.insert_account(account).await?;
        self.verifier.create_credentials(account_id, &req.password).await?;

        if !self.require_email_verification {
            info!(%email, "account registered, auto-confirmed");
            return Ok("Account registered. You can sign in now.".into());
        }

        let issued = self
            .engine
            .generate(self.codes.as_ref(), account_id, CodePurpose::EmailVerification)
            .await?;
        if let Err(err) = self.notifier.send_verification_code(&email, &issued.code).await {
            warn!(%email, error = %err, "verification email failed, account stays registered");
        }

        info!(%email, "account registered, verification code issued");
        Ok("Account registered. Check your email to verify your account.".into())
    }

    /// Exchange credentials for a signed session token.
    pub async fn login(&self, req: LoginRequest) -> Result<(String, Uuid), AppError> {
        let email = req.email.trim().to_lowercase();

        let Some(account) = self.accounts.account_by_email(&email).await? else {
            return Err(AppError::Unauthorized("invalid credentials".into()));
        };
        // unconfirmed accounts never receive a session, long-lived or not
        if !account.confirmed {
            return Err(AppError::Unauthorized(
                "verify your email before signing in".into(),
            ));
        }
        if !self.verifier.check_password(account.id, &req.password).await? {
            return Err(AppError::Unauthorized("invalid credentials".into()));
        }

        let token = self
            .tokens
            .issue(&account, account.primary_role(), req.remember_me)?;
        info!(%email, "signed in");
        Ok((token, account.id))
    }

    /// Consume an email-verification code and confirm the account.
    ///
    /// The lockout action on the attempt limit deletes the account
    /// entirely; registration starts over.
    pub async fn verify_email(&self, req: VerifyEmailRequest) -> Result<String, AppError> {
        let email = req.email.trim().to_lowercase();

        let Some(account) = self.accounts.account_by_email(&email).await? else {
            return Err(AppError::NotFound("account not found".into()));
        };
        if account.confirmed {
            return Err(AppError::Validation("email already verified".into()));
        }

        let accounts = &self.accounts;
        let account_id = account.id;
        self.engine
            .validate(
                self.codes.as_ref(),
                account_id,
                CodePurpose::EmailVerification,
                &req.verification_code,
                || async move {
                    accounts.delete_account(account_id).await?;
                    warn!(%account_id, "attempt limit reached, unverified account deleted");
                    Ok(())
                },
            )
            .await?;

        self.accounts.set_confirmed(account_id).await?;

        if let Err(err) = self.notifier.send_welcome(&email).await {
            warn!(%email, error = %err, "welcome email failed");
        }

        info!(%email, "email verified");
        Ok("Email verified successfully. You can now sign in.".into())
    }

    /// Issue a fresh email-verification code on explicit user request.
    ///
    /// Unlike registration, delivery failure matters here and propagates.
    pub async fn resend_verification_code(
        &self,
        req: ResendVerificationRequest,
    ) -> Result<String, AppError> {
        let email = req.email.trim().to_lowercase();

        let Some(account) = self.accounts.account_by_email(&email).await? else {
            return Err(AppError::NotFound("account not found".into()));
        };
        if account.confirmed {
            return Err(AppError::Validation("email already verified".into()));
        }

        let issued = self
            .engine
            .generate(self.codes.as_ref(), account.id, CodePurpose::EmailVerification)
            .await?;
        self.notifier.send_verification_code(&email, &issued.code).await?;

        info!(%email, "verification code resent");
        Ok("Verification code resent to your email".into())
    }

    /// Start password recovery by issuing a reset code.
    ///
    /// Unknown emails get the generic answer and leave no trace; known
    /// accounts get explicit operational errors (unconfirmed, throttled).
    pub async fn recover_password(
        &self,
        req: RecoverPasswordRequest,
    ) -> Result<String, AppError> {
        let email = req.email.trim().to_lowercase();

        let Some(account) = self.accounts.account_by_email(&email).await? else {
            info!("password recovery for unknown email, answering generically");
            return Ok(RECOVERY_MESSAGE.into());
        };
        if !account.confirmed {
            return Err(AppError::Validation(
                "verify your email before recovering the password".into(),
            ));
        }

        let issued = self
            .engine
            .generate(self.codes.as_ref(), account.id, CodePurpose::PasswordReset)
            .await?;
        self.notifier.send_verification_code(&email, &issued.code).await?;

        info!(%email, "password recovery code sent");
        Ok(RECOVERY_MESSAGE.into())
    }

    /// Consume a reset code and rotate the credential.
    ///
    /// The lockout action here purges reset codes only; the account
    /// survives, in contrast with email verification.
    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<String, AppError> {
        let email = req.email.trim().to_lowercase();

        let Some(account) = self.accounts.account_by_email(&email).await? else {
            return Err(AppError::NotFound("account not found".into()));
        };
        if !account.confirmed {
            return Err(AppError::Validation(
                "verify your email before recovering the password".into(),
            ));
        }

        let account_id = account.id;
        self.engine
            .validate(
                self.codes.as_ref(),
                account_id,
                CodePurpose::PasswordReset,
                &req.verification_code,
                || async {
                    // the engine already purged the codes; nothing more
                    Ok(())
                },
            )
            .await?;

        // rotate through the verifier; the core never compares or stores
        // raw passwords
        let artifact = self.verifier.issue_reset_artifact(account_id).await?;
        self.verifier
            .apply_new_password(&artifact, &req.new_password)
            .await?;

        // sweep any reset codes issued concurrently with this call
        self.codes
            .purge_codes(account_id, Some(CodePurpose::PasswordReset))
            .await?;

        info!(%email, "password reset");
        Ok("Password reset successfully.".into())
    }
}
