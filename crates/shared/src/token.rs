//! Invite-token codec: generation, hashing and verification.
//!
//! Raw tokens are handed to the invitee (via email or the admin UI) and are
//! never persisted; only the Argon2id hash is stored. Verification is
//! proof-of-possession of the raw value.

use argon2::{
    password_hash::{rand_core::OsRng as HashOsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Error type for token hashing operations.
#[derive(Debug, Error)]
pub enum TokenHashError {
    #[error("Failed to hash token: {0}")]
    HashError(String),

    #[error("Failed to verify token: {0}")]
    VerifyError(String),

    #[error("Invalid token hash format")]
    InvalidHashFormat,
}

/// Bytes of entropy in a raw invite token.
const TOKEN_ENTROPY_BYTES: usize = 32;

/// Argon2id parameters following OWASP recommendations (2024).
/// - Memory: 19456 KiB (19 MiB)
/// - Iterations: 2
/// - Parallelism: 1
const MEMORY_COST: u32 = 19456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

/// Creates an Argon2id hasher with the parameters above.
fn create_argon2() -> Result<Argon2<'static>, TokenHashError> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| TokenHashError::HashError(format!("Failed to create Argon2 params: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Generates a raw invite token: 32 bytes of OS entropy, URL-safe
/// base64-encoded without padding (43 characters).
///
/// The value is unguessable and unique with overwhelming probability; it is
/// safe to embed directly in an invite link query parameter.
pub fn generate_invite_token() -> String {
    let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hashes a raw invite token with Argon2id.
///
/// Returns a PHC-formatted string that includes the algorithm, parameters,
/// salt and hash, so parameters can be upgraded without breaking stored
/// hashes.
pub fn hash_invite_token(raw: &str) -> Result<String, TokenHashError> {
    let salt = SaltString::generate(&mut HashOsRng);
    let argon2 = create_argon2()?;

    argon2
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TokenHashError::HashError(e.to_string()))
}

/// Verifies a raw invite token against a stored hash.
///
/// Comparison is constant-time with respect to the input. A mismatch is
/// `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_invite_token(raw: &str, hash: &str) -> Result<bool, TokenHashError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| TokenHashError::InvalidHashFormat)?;

    // The stored hash carries its own parameters.
    let argon2 = Argon2::default();

    match argon2.verify_password(raw.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(TokenHashError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_invite_token_length() {
        // 32 bytes -> 43 base64url chars without padding
        let token = generate_invite_token();
        assert_eq!(token.len(), 43);
    }

    #[test]
    fn test_generate_invite_token_unique() {
        let token1 = generate_invite_token();
        let token2 = generate_invite_token();
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_generate_invite_token_url_safe() {
        let token = generate_invite_token();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_hash_returns_phc_format() {
        let hash = hash_invite_token("some-raw-token").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$"));
        assert!(hash.contains("m=19456"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_hash_never_equals_raw() {
        let raw = generate_invite_token();
        let hash = hash_invite_token(&raw).unwrap();
        assert_ne!(raw, hash);
    }

    #[test]
    fn test_hash_produces_unique_hashes() {
        // Different salts should produce different hashes for the same input
        let hash1 = hash_invite_token("same-token").unwrap();
        let hash2 = hash_invite_token("same-token").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_matching_token() {
        let raw = generate_invite_token();
        let hash = hash_invite_token(&raw).unwrap();
        assert!(verify_invite_token(&raw, &hash).unwrap());
    }

    #[test]
    fn test_verify_non_matching_token() {
        let hash = hash_invite_token(&generate_invite_token()).unwrap();
        assert!(!verify_invite_token(&generate_invite_token(), &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let result = verify_invite_token("token", "not-a-phc-string");
        assert!(matches!(result, Err(TokenHashError::InvalidHashFormat)));
    }

    #[test]
    fn test_verify_uses_params_from_hash() {
        // Verification must work from the parameters embedded in the hash
        let hash = hash_invite_token("token").unwrap();
        assert!(verify_invite_token("token", &hash).unwrap());
    }

    #[test]
    fn test_token_hash_error_display() {
        let err = TokenHashError::HashError("boom".to_string());
        assert!(format!("{}", err).contains("boom"));

        let err = TokenHashError::InvalidHashFormat;
        assert!(format!("{}", err).contains("Invalid token hash format"));
    }
}
