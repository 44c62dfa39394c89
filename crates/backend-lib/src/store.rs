// ============================
// crates/backend-lib/src/store.rs
// ============================

//! Persistence seams and the in-memory implementation.
//!
//! The flows only ever talk to the [`AccountStore`] and [`CodeStore`]
//! traits; guarantees are per-row (no cross-row transactions), which is
//! all the flows are allowed to assume.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::error::AppError;
use storefront_common::{Account, CodePurpose, VerificationCode};

/// Account persistence contract.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert_account(&self, account: Account) -> Result<(), AppError>;

    async fn account_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    /// Case-insensitive email lookup.
    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    async fn account_by_rut(&self, rut: &str) -> Result<Option<Account>, AppError>;

    /// Returns false when the account no longer exists.
    async fn set_confirmed(&self, id: Uuid) -> Result<bool, AppError>;

    /// Returns false when the account no longer exists.
    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError>;

    /// Batch-delete unconfirmed accounts registered before the cutoff.
    /// Row-at-a-time: rows deleted before a failure stay deleted.
    async fn delete_unconfirmed_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;

    /// Create the role definition if it does not exist yet.
    async fn ensure_role(&self, name: &str) -> Result<(), AppError>;
}

/// Verification-code persistence contract.
#[async_trait]
pub trait CodeStore: Send + Sync {
    async fn insert_code(&self, code: VerificationCode) -> Result<(), AppError>;

    /// Most recently created code for (account, purpose).
    async fn latest_code(
        &self,
        account_id: Uuid,
        purpose: CodePurpose,
    ) -> Result<Option<VerificationCode>, AppError>;

    /// Increment the attempt counter of the latest code for
    /// (account, purpose) and return the post-increment count.
    /// Returns 0 when no such code remains.
    async fn bump_attempts(
        &self,
        account_id: Uuid,
        purpose: CodePurpose,
    ) -> Result<i32, AppError>;

    /// Delete codes for an account; `None` purges every purpose.
    async fn purge_codes(
        &self,
        account_id: Uuid,
        purpose: Option<CodePurpose>,
    ) -> Result<u64, AppError>;
}

/// In-memory implementation of both store traits.
#[derive(Default)]
pub struct MemoryStore {
    accounts: DashMap<Uuid, Account>,
    codes: DashMap<Uuid, Vec<VerificationCode>>,
    roles: DashSet<String>,
    next_code_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.next_code_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: Account) -> Result<(), AppError> {
        self.accounts.insert(account.id, account);
        Ok(())
    }

    async fn account_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .map(|a| a.clone()))
    }

    async fn account_by_rut(&self, rut: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.rut == rut)
            .map(|a| a.clone()))
    }

    async fn set_confirmed(&self, id: Uuid) -> Result<bool, AppError> {
        match self.accounts.get_mut(&id) {
            Some(mut account) => {
                account.confirmed = true;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError> {
        let removed = self.accounts.remove(&id).is_some();
        // codes cannot outlive their account
        self.codes.remove(&id);
        Ok(removed)
    }

    async fn delete_unconfirmed_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let stale: Vec<Uuid> = self
            .accounts
            .iter()
            .filter(|a| !a.confirmed && a.registered_at < cutoff)
            .map(|a| a.id)
            .collect();

        let mut deleted = 0;
        for id in stale {
            if self.accounts.remove(&id).is_some() {
                self.codes.remove(&id);
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn ensure_role(&self, name: &str) -> Result<(), AppError> {
        self.roles.insert(name.to_string());
        Ok(())
    }
}

#[async_trait]
impl CodeStore for MemoryStore {
    async fn insert_code(&self, mut code: VerificationCode) -> Result<(), AppError> {
        code.id = self.next_id();
        self.codes.entry(code.account_id).or_default().push(code);
        Ok(())
    }

    async fn latest_code(
        &self,
        account_id: Uuid,
        purpose: CodePurpose,
    ) -> Result<Option<VerificationCode>, AppError> {
        Ok(self.codes.get(&account_id).and_then(|rows| {
            rows.iter()
                .filter(|c| c.purpose == purpose)
                .max_by_key(|c| c.id)
                .cloned()
        }))
    }

    async fn bump_attempts(
        &self,
        account_id: Uuid,
        purpose: CodePurpose,
    ) -> Result<i32, AppError> {
        let Some(mut rows) = self.codes.get_mut(&account_id) else {
            return Ok(0);
        };
        let latest = rows
            .iter_mut()
            .filter(|c| c.purpose == purpose)
            .max_by_key(|c| c.id);
        match latest {
            Some(code) => {
                code.attempt_count += 1;
                Ok(code.attempt_count)
            },
            None => Ok(0),
        }
    }

    async fn purge_codes(
        &self,
        account_id: Uuid,
        purpose: Option<CodePurpose>,
    ) -> Result<u64, AppError> {
        match purpose {
            None => Ok(self
                .codes
                .remove(&account_id)
                .map_or(0, |(_, rows)| rows.len() as u64)),
            Some(purpose) => {
                let Some(mut rows) = self.codes.get_mut(&account_id) else {
                    return Ok(0);
                };
                let before = rows.len();
                rows.retain(|c| c.purpose != purpose);
                Ok((before - rows.len()) as u64)
            },
        }
    }
}
