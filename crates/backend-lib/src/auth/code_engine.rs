// ============================
// crates/backend-lib/src/auth/code_engine.rs
// ============================

//! 6-digit verification code engine: issuance, expiry, attempt tracking
//! and per-purpose rate limiting.
//!
//! The engine owns the code state machine and nothing else. It never
//! deletes accounts; when the attempt limit is reached it purges the
//! offending codes and hands control to the caller-supplied lockout
//! action, because the right punishment depends on the purpose.
use chrono::{Duration, Utc};
use metrics::counter;
use rand::{rngs::OsRng, Rng};
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::VerificationSettings;
use crate::error::AppError;
use crate::store::CodeStore;
use storefront_common::{CodePurpose, VerificationCode};

/// Randomness seam for code generation. Injected so tests can pin the
/// drawn codes.
pub trait CodeSource: Send + Sync {
    fn six_digit_code(&self) -> String;
}

/// Production code source: uniform draw from [100000, 999999] using
/// OS-provided entropy. Always exactly 6 digits, leading-zero-free by
/// construction.
pub struct OsRngCodes;

impl CodeSource for OsRngCodes {
    fn six_digit_code(&self) -> String {
        OsRng.gen_range(100_000..=999_999u32).to_string()
    }
}

/// A freshly issued code, returned to the flow for delivery only.
/// It never travels back to the HTTP caller.
#[derive(Debug)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: chrono::DateTime<Utc>,
}

pub struct CodeEngine {
    ttl: Duration,
    max_attempts: i32,
    codes: Arc<dyn CodeSource>,
}

impl CodeEngine {
    pub fn new(ttl_secs: u64, max_attempts: i32, codes: Arc<dyn CodeSource>) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
            max_attempts,
            codes,
        }
    }

    pub fn from_settings(settings: &VerificationSettings) -> Self {
        Self::new(
            settings.code_ttl_secs,
            settings.max_attempts,
            Arc::new(OsRngCodes),
        )
    }

    /// Issue a new code for (account, purpose).
    ///
    /// Refuses while the most recent code is still active. The check and
    /// the insert are not atomic against the store: two concurrent calls
    /// can both pass the check and leave two valid codes. Accepted as an
    /// abuse deterrent, not a mutual-exclusion guarantee.
    pub async fn generate(
        &self,
        store: &dyn CodeStore,
        account_id: Uuid,
        purpose: CodePurpose,
    ) -> Result<IssuedCode, AppError> {
        let now = Utc::now();
        if let Some(last) = store.latest_code(account_id, purpose).await? {
            if last.is_active(now) {
                let remaining_secs = (last.expires_at - now).num_seconds().max(1);
                return Err(AppError::Throttled { remaining_secs });
            }
        }

        let code = self.codes.six_digit_code();
        let expires_at = now + self.ttl;
        store
            .insert_code(VerificationCode {
                id: 0,
                account_id,
                purpose,
                code: code.clone(),
                attempt_count: 0,
                created_at: now,
                expires_at,
            })
            .await?;
        counter!("verification_codes.issued").increment(1);

        Ok(IssuedCode { code, expires_at })
    }

    /// Consume a submitted code against the most recent one on file.
    ///
    /// Exactly one outcome is produced per call: success, `NotFound`,
    /// `CodeExpired`, `CodeMismatch` or `AttemptsExceeded`. On the
    /// attempt limit, codes for (account, purpose) are purged and
    /// `on_lockout` runs before the failure is returned.
    pub async fn validate<F, Fut>(
        &self,
        store: &dyn CodeStore,
        account_id: Uuid,
        purpose: CodePurpose,
        submitted: &str,
        on_lockout: F,
    ) -> Result<(), AppError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<(), AppError>> + Send,
    {
        let now = Utc::now();
        let Some(latest) = store.latest_code(account_id, purpose).await? else {
            return Err(AppError::NotFound("no verification code on file".into()));
        };

        if now >= latest.expires_at {
            store.bump_attempts(account_id, purpose).await?;
            counter!("verification_codes.expired").increment(1);
            return Err(AppError::CodeExpired);
        }

        if submitted != latest.code {
            // Increment-then-compare is not guarded by a cross-request
            // lock; the counter can under-count under concurrency.
            let attempts = store.bump_attempts(account_id, purpose).await?;
            if attempts >= self.max_attempts {
                store.purge_codes(account_id, Some(purpose)).await?;
                on_lockout().await?;
                counter!("verification_codes.lockouts").increment(1);
                return Err(AppError::AttemptsExceeded);
            }
            return Err(AppError::CodeMismatch);
        }

        store.purge_codes(account_id, Some(purpose)).await?;
        counter!("verification_codes.consumed").increment(1);
        Ok(())
    }
}
