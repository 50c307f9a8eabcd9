//! Salted SHA-256 password credentials.
//!
//! A stored credential is `base64(salt) || base64(sha256(password || base64(salt)))`
//! with no separator. The salt is 16 random bytes, so its encoding is always
//! [`SALT_B64_LEN`] characters and the digest starts right after it.

use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::error;

pub const SALT_LEN: usize = 16;
pub const SALT_B64_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("stored credential is shorter than its {SALT_B64_LEN}-character salt prefix")]
    InvalidFormat,
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt).map_err(|e| {
        error!(error = %e, "os rng failed while generating salt");
        anyhow::anyhow!(e.to_string())
    })?;
    let salt_b64 = Base64::encode_string(&salt);
    let digest = salted_digest(plain, &salt_b64);
    Ok(format!("{salt_b64}{digest}"))
}

pub fn verify_password(plain: &str, stored: &str) -> Result<bool, CredentialError> {
    if stored.len() < SALT_B64_LEN || !stored.is_char_boundary(SALT_B64_LEN) {
        return Err(CredentialError::InvalidFormat);
    }
    let (salt_b64, expected) = stored.split_at(SALT_B64_LEN);
    let actual = salted_digest(plain, salt_b64);
    Ok(actual.as_bytes().ct_eq(expected.as_bytes()).into())
}

fn salted_digest(plain: &str, salt_b64: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hasher.update(salt_b64.as_bytes());
    Base64::encode_string(&hasher.finalize())
}
