//! picstash/crates/auth-adapters/src/lib.rs
//!
//! Bearer-token identity resolution. Real user management lives in an
//! external identity service; this adapter only needs a stable owner id per
//! token so records and searches are scoped to their caller.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use domains::{AppError, IdentityProvider, Result};

/// Maps a bearer token to a deterministic `Uuid` via a salted SHA-256.
/// The salt keeps ids from being derivable from tokens alone.
pub struct HashedTokenIdentity {
    salt: String,
}

impl HashedTokenIdentity {
    /// Accepts a salt string (e.g., from an environment variable).
    pub fn new(salt: &str) -> Self {
        Self {
            salt: salt.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HashedTokenIdentity {
    async fn resolve(&self, bearer: &str) -> Result<Uuid> {
        if bearer.is_empty() {
            return Err(AppError::Unauthorized("missing bearer token".into()));
        }
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(bearer.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Ok(Uuid::from_bytes(bytes))
    }
}
