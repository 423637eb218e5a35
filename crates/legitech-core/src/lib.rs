//! # LegiTech Core
//!
//! Foundational types shared across the LegiTech compliance stack:
//!
//! - [`identity`]: uuid-backed identifier newtypes, the validated [`Email`]
//!   newtype, and caller [`Role`]s.
//! - [`industry`]: the industry catalog used to scope regulatory discovery.
//! - [`error`]: validation errors raised by the constructors above.
//!
//! Everything here is plain data. Persistence, HTTP, and AI concerns live in
//! the crates that build on top of this one.

pub mod error;
pub mod identity;
pub mod industry;

pub use error::ValidationError;
pub use identity::{Email, LawId, Role, UserId};
pub use industry::Industry;
