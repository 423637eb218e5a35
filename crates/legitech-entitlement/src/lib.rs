//! # LegiTech Entitlement
//!
//! Membership records and the gate that decides who sees paid content.
//!
//! - [`membership`]: the per-user membership record. At most one per user;
//!   expiry is lazy, applied on the next read after the end date passes.
//! - [`gate`]: pure evaluation from caller role plus membership record to
//!   one of five entitlement states, with a redirect hint for denials.
//!
//! Nothing here touches storage or HTTP. Callers load the record, call
//! [`Membership::refresh`], persist if it reports a transition, then ask the
//! gate for a verdict.

pub mod gate;
pub mod membership;

pub use gate::{evaluate, Entitlement};
pub use membership::{Membership, MembershipStatus, MembershipType, ANNUAL_DAYS, TRIAL_DAYS};
