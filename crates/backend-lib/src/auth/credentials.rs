// ============================
// crates/backend-lib/src/auth/credentials.rs
// ============================

//! Credential verifier seam.
//!
//! The verifier owns password hashing, comparison and rotation. The rest
//! of the crate holds no password material: flows hand plaintext straight
//! to this capability and forget it. Rotation goes through a one-shot
//! reset artifact so the flow that proved code possession never touches
//! the hash map directly.
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::{rngs::OsRng, RngCore};
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::error::AppError;

/// Reset artifacts expire shortly after issuance.
const ARTIFACT_TTL_SECS: i64 = 15 * 60;

/// Artifact entropy (32 bytes = 256 bits)
const ARTIFACT_BYTES: usize = 32;

/// Capability interface for everything password-shaped.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn create_credentials(&self, account_id: Uuid, password: &str) -> Result<(), AppError>;

    async fn check_password(&self, account_id: Uuid, password: &str) -> Result<bool, AppError>;

    /// Mint a one-shot artifact authorizing a password rotation.
    async fn issue_reset_artifact(&self, account_id: Uuid) -> Result<String, AppError>;

    /// Consume an artifact and install the new password.
    async fn apply_new_password(&self, artifact: &str, new_password: &str)
        -> Result<(), AppError>;
}

struct ResetArtifact {
    account_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Scrypt-backed implementation holding PHC-format hashes in memory.
#[derive(Default)]
pub struct ScryptVerifier {
    hashes: DashMap<Uuid, String>,
    artifacts: DashMap<String, ResetArtifact>,
}

impl ScryptVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_password(plain: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Scrypt
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AppError::Internal(format!("password hashing failed: {err}")))
    }

    fn verify_password(hash: &str, plain: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }

    fn random_artifact() -> String {
        let mut buffer = [0u8; ARTIFACT_BYTES];
        OsRng.fill_bytes(&mut buffer);
        URL_SAFE_NO_PAD.encode(buffer)
    }
}

#[async_trait]
impl CredentialVerifier for ScryptVerifier {
    async fn create_credentials(&self, account_id: Uuid, password: &str) -> Result<(), AppError> {
        let mut plain = password.to_string();
        let hash = Self::hash_password(&plain)?;
        plain.zeroize();
        self.hashes.insert(account_id, hash);
        Ok(())
    }

    async fn check_password(&self, account_id: Uuid, password: &str) -> Result<bool, AppError> {
        Ok(self
            .hashes
            .get(&account_id)
            .map(|hash| Self::verify_password(&hash, password))
            .unwrap_or(false))
    }

    async fn issue_reset_artifact(&self, account_id: Uuid) -> Result<String, AppError> {
        if !self.hashes.contains_key(&account_id) {
            return Err(AppError::NotFound("no credentials for account".into()));
        }
        let artifact = Self::random_artifact();
        self.artifacts.insert(
            artifact.clone(),
            ResetArtifact {
                account_id,
                expires_at: Utc::now() + Duration::seconds(ARTIFACT_TTL_SECS),
            },
        );
        Ok(artifact)
    }

    async fn apply_new_password(
        &self,
        artifact: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        // remove first: the artifact is spent whatever happens next
        let Some((_, entry)) = self.artifacts.remove(artifact) else {
            return Err(AppError::Unauthorized(
                "reset artifact invalid or expired".into(),
            ));
        };
        if Utc::now() >= entry.expires_at {
            return Err(AppError::Unauthorized(
                "reset artifact invalid or expired".into(),
            ));
        }

        let mut plain = new_password.to_string();
        let hash = Self::hash_password(&plain)?;
        plain.zeroize();
        self.hashes.insert(entry.account_id, hash);
        Ok(())
    }
}
