//! API route modules.
//!
//! - [`auth`]: registration and login (public).
//! - [`membership`]: membership status and activation (authenticated).
//! - [`laws`]: law listing, discovery, and enrichment (entitlement-gated).
//! - [`advisor`]: raw generation proxy (public) plus chat and evidence
//!   audit (entitlement-gated).

pub mod advisor;
pub mod auth;
pub mod laws;
pub mod membership;
