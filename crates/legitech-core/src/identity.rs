//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the LegiTech stack.
//! Each identifier is a distinct type — you cannot pass a [`UserId`] where a
//! [`LawId`] is expected.
//!
//! UUID-based identifiers ([`UserId`], [`LawId`]) are always valid by
//! construction. [`Email`] validates and normalizes at construction time:
//! surrounding whitespace is stripped and the address is lowercased, so two
//! registrations of `User@Example.com` and `user@example.com ` collide on the
//! same canonical address.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

/// A unique identifier for a registered user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new random user identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a user identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// A unique identifier for a tracked law or regulation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LawId(Uuid);

impl LawId {
    /// Create a new random law identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a law identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LawId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for LawId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LawId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Validated string newtypes
// ---------------------------------------------------------------------------

/// A normalized email address.
///
/// Stored trimmed and lowercased so lookups are case-insensitive by
/// construction.
///
/// # Validation
///
/// - Non-empty after trimming
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot with non-empty labels on both sides
/// - No whitespace inside the address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Email(String);

impl_validating_deserialize!(Email);

impl Email {
    /// Create an email from a raw string, normalizing and validating it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the value is empty or does not look
    /// like `local@domain.tld`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let normalized = value.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty("email"));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::malformed("email", "contains whitespace"));
        }

        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = match parts.next() {
            Some(d) => d,
            None => return Err(ValidationError::malformed("email", "missing '@'")),
        };
        if local.is_empty() {
            return Err(ValidationError::malformed("email", "empty local part"));
        }
        if domain.contains('@') {
            return Err(ValidationError::malformed("email", "multiple '@'"));
        }
        let dot = match domain.rfind('.') {
            Some(pos) => pos,
            None => return Err(ValidationError::malformed("email", "domain has no dot")),
        };
        if dot == 0 || dot + 1 == domain.len() {
            return Err(ValidationError::malformed("email", "malformed domain"));
        }

        Ok(Self(normalized))
    }

    /// Access the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Access role attached to a user account.
///
/// Admins bypass the membership entitlement gate; everyone else is subject
/// to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account, gated by membership state.
    #[default]
    User,
    /// Operator account with unconditional access to gated content.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role value, falling back to `User` for unknown input.
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "user" => Role::User,
            other => {
                tracing::warn!(role = other, "unknown role value, defaulting to user");
                Role::User
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
