//! Salted HMAC-SHA512 password hashing.
//!
//! Every password set draws a fresh 128-byte random salt, which is used as the
//! HMAC key over the UTF-8 password bytes. The 64-byte MAC is what gets stored.
//! Verification goes through [`Mac::verify_slice`], which compares in constant
//! time.

use crate::types::{AppError, Result};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Salt length in bytes (one SHA-512 block).
pub const SALT_LEN: usize = 128;
/// Stored hash length in bytes.
pub const HASH_LEN: usize = 64;

/// A stored salt/hash pair.
#[derive(Clone)]
pub struct PasswordDigest {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("hash", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

/// Derives and checks password hashes.
///
/// Holds a decoy digest so that a login for an unknown user performs the same
/// HMAC work as a login with a wrong password.
pub struct PasswordVerifier {
    decoy: PasswordDigest,
}

impl Default for PasswordVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordVerifier {
    pub fn new() -> Self {
        // Random bytes never match a real MAC
        let mut hash = vec![0u8; HASH_LEN];
        rand::rng().fill_bytes(&mut hash);

        Self {
            decoy: PasswordDigest {
                hash,
                salt: random_salt(),
            },
        }
    }

    /// Hash a new password under a freshly generated salt.
    pub fn derive(&self, password: &str) -> Result<PasswordDigest> {
        let salt = random_salt();
        let hash = compute_hash(&salt, password.as_bytes())?;
        Ok(PasswordDigest { hash, salt })
    }

    /// Check `password` against a stored salt/hash pair.
    pub fn verify(&self, password: &str, salt: &[u8], hash: &[u8]) -> Result<bool> {
        let mut mac = keyed(salt)?;
        mac.update(password.as_bytes());

        Ok(mac.verify_slice(hash).is_ok())
    }

    /// Burn the same work as [`verify`](Self::verify) for a login identifier
    /// that matched no user. Always `false`.
    pub fn verify_unknown(&self, password: &str) -> Result<bool> {
        self.verify(password, &self.decoy.salt, &self.decoy.hash)?;
        Ok(false)
    }
}

fn random_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

fn keyed(salt: &[u8]) -> Result<HmacSha512> {
    HmacSha512::new_from_slice(salt)
        .map_err(|e| AppError::Internal(format!("Invalid password salt: {}", e)))
}

fn compute_hash(salt: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    let mut mac = keyed(salt)?;
    mac.update(password);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_produces_fixed_sizes() {
        let verifier = PasswordVerifier::new();
        let digest = verifier.derive("Test123!").expect("should hash");

        assert_eq!(digest.salt.len(), SALT_LEN);
        assert_eq!(digest.hash.len(), HASH_LEN);
        assert_ne!(digest.hash, b"Test123!".to_vec());
    }

    #[test]
    fn test_password_verification_success() {
        let verifier = PasswordVerifier::new();
        let digest = verifier.derive("secure_password_456").expect("should hash");

        let is_valid = verifier
            .verify("secure_password_456", &digest.salt, &digest.hash)
            .expect("should verify");

        assert!(is_valid, "correct password should verify successfully");
    }

    #[test]
    fn test_password_verification_failure() {
        let verifier = PasswordVerifier::new();
        let digest = verifier.derive("correct_password").expect("should hash");

        let is_valid = verifier
            .verify("wrong_password", &digest.salt, &digest.hash)
            .expect("should verify");

        assert!(!is_valid, "wrong password should fail verification");
    }

    #[test]
    fn test_same_password_gets_new_salt_each_time() {
        let verifier = PasswordVerifier::new();
        let first = verifier.derive("repeated").expect("should hash");
        let second = verifier.derive("repeated").expect("should hash");

        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn test_hash_matches_plain_hmac_sha512() {
        let salt = vec![7u8; SALT_LEN];
        let mut mac = HmacSha512::new_from_slice(&salt).expect("any key length");
        mac.update("påssword".as_bytes());
        let expected = mac.finalize().into_bytes().to_vec();

        assert_eq!(
            compute_hash(&salt, "påssword".as_bytes()).expect("should hash"),
            expected
        );
    }

    #[test]
    fn test_truncated_hash_is_rejected() {
        let verifier = PasswordVerifier::new();
        let digest = verifier.derive("abcdef").expect("should hash");

        let is_valid = verifier
            .verify("abcdef", &digest.salt, &digest.hash[..32])
            .expect("should verify");

        assert!(!is_valid);
    }

    #[test]
    fn test_unknown_user_never_verifies() {
        let verifier = PasswordVerifier::new();
        assert!(!verifier.verify_unknown("anything").expect("should run"));
    }

    #[test]
    fn test_debug_redacts_material() {
        let digest = PasswordVerifier::new().derive("secret").expect("should hash");
        let rendered = format!("{:?}", digest);
        assert!(rendered.contains("<redacted>"));
    }
}
