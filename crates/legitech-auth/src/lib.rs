//! # LegiTech Auth
//!
//! Credential primitives: bcrypt password hashing ([`password`]) and HS256
//! session tokens ([`token`]).
//!
//! Two rules hold throughout:
//!
//! - Verification fails closed. A malformed stored hash or an undecodable
//!   token is a rejection, never an error the caller might accidentally
//!   treat as success.
//! - Rejections are opaque. Callers cannot distinguish a bad signature from
//!   an expired token, and the login surface built on top of this crate
//!   cannot distinguish an unknown email from a wrong password.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, CredentialError};
pub use token::{issue_session, verify_token, Claims, SecretKey, TokenError, TOKEN_TTL_DAYS};
