//! Session tokens.
//!
//! Stateless HS256 JWTs. A token carries the user id, normalized email, and
//! role; possession of a token with a valid signature and a future `exp` is
//! the entire session state. There is no server-side session store and no
//! revocation list, so the expiry window is kept short.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use legitech_core::{Email, Role, UserId};

/// Sessions expire this many days after issuance.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Minimum accepted signing secret length, in bytes.
const MIN_SECRET_BYTES: usize = 32;

/// Token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token failed verification. Deliberately opaque: bad signature,
    /// garbage input, and expiry all collapse into this variant.
    #[error("invalid or expired token")]
    Invalid,

    /// Signing failed. Indicates a bug or a broken key, not bad user input.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// The configured signing secret is too short to accept.
    #[error("jwt secret rejected: {0}")]
    WeakSecret(String),
}

/// HS256 signing secret.
///
/// Enforces a minimum length at construction and redacts itself from Debug
/// output so it cannot leak through logs.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap a signing secret, rejecting anything shorter than 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::WeakSecret`] for short secrets.
    pub fn new(secret: impl Into<String>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenError::WeakSecret(format!(
                "must be at least {MIN_SECRET_BYTES} bytes, got {}",
                secret.len()
            )));
        }
        Ok(Self(secret))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID.
    pub sub: Uuid,
    /// Normalized email at issuance time.
    pub email: String,
    /// Role at issuance time. Admins bypass the entitlement gate.
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// Build claims for a user with a caller-chosen time to live.
    pub fn new(user_id: UserId, email: &Email, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: *user_id.as_uuid(),
            email: email.as_str().to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }
}

/// Sign claims into a compact JWT.
///
/// # Errors
///
/// Returns [`TokenError::Signing`] if encoding fails.
pub fn sign_token(key: &SecretKey, claims: &Claims) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )
    .map_err(|err| TokenError::Signing(err.to_string()))
}

/// Issue a session token with the standard expiry window.
///
/// # Errors
///
/// Returns [`TokenError::Signing`] if encoding fails.
pub fn issue_session(
    key: &SecretKey,
    user_id: UserId,
    email: &Email,
    role: Role,
) -> Result<String, TokenError> {
    let claims = Claims::new(user_id, email, role, Duration::days(TOKEN_TTL_DAYS));
    sign_token(key, &claims)
}

/// Verify a token and return its claims.
///
/// All failure modes map to [`TokenError::Invalid`]; callers get no signal
/// about what exactly was wrong with the presented token.
pub fn verify_token(key: &SecretKey, token: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(key.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)
}
