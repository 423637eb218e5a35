//! Password hashing.
//!
//! bcrypt with a fixed cost of 12. Hashes are self-describing strings, so
//! lowering or raising the cost later only affects newly stored credentials.

use thiserror::Error;

/// bcrypt work factor for newly hashed passwords.
pub const HASH_COST: u32 = 12;

/// Failure while producing a password hash.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The hashing backend rejected the input.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Hash a plaintext password for storage.
///
/// # Errors
///
/// Returns [`CredentialError::Hashing`] if bcrypt rejects the input.
pub fn hash_password(plaintext: &str) -> Result<String, CredentialError> {
    bcrypt::hash(plaintext, HASH_COST).map_err(|err| CredentialError::Hashing(err.to_string()))
}

/// Check a plaintext password against a stored hash.
///
/// Fails closed: a malformed stored hash verifies as `false` rather than
/// surfacing an error a caller could mishandle.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(plaintext, stored_hash) {
        Ok(matches) => matches,
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash failed to parse");
            false
        }
    }
}
