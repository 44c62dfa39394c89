// ============================
// crates/backend-lib/src/lib.rs
// ============================

//! Core backend-lib functionality for the storefront account service:
//! registration, email verification, password recovery, session tokens
//! and the unconfirmed-account reaper.

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod reaper;
pub mod routes;
pub mod store;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AccountService, CodeEngine, ScryptVerifier, TokenIssuer};
use crate::config::Settings;
use crate::email::EmailNotifier;
use crate::error::AppError;
use crate::store::{AccountStore, CodeStore, MemoryStore};

/// Application state shared across all handlers
pub struct AppState {
    /// The account flows
    pub service: Arc<AccountService>,
    /// Settings the handlers consult at the boundary
    pub settings: Arc<Settings>,
    /// Account store handle, also used to drive the reaper
    pub accounts: Arc<dyn AccountStore>,
}

impl AppState {
    pub fn new(
        service: AccountService,
        settings: Settings,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
            accounts,
        }
    }

    /// Wire the default collaborators: in-memory store, scrypt verifier,
    /// SMTP (or logging) mailer. Expects validated settings.
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let store = Arc::new(MemoryStore::new());
        let accounts: Arc<dyn AccountStore> = store.clone();
        let codes: Arc<dyn CodeStore> = store;
        let verifier = Arc::new(ScryptVerifier::new());
        let notifier = EmailNotifier::from_settings(&settings.email)?;
        let engine = CodeEngine::from_settings(&settings.verification);
        let tokens = TokenIssuer::new(&settings.jwt.secret);

        let service = AccountService::new(
            accounts.clone(),
            codes,
            verifier,
            notifier,
            engine,
            tokens,
            settings.verification.require_email_verification,
        );
        Ok(Self::new(service, settings, accounts))
    }
}
