//! The entitlement gate.
//!
//! Pure decision function from caller role plus membership record to an
//! [`Entitlement`] verdict. Callers are expected to have applied
//! [`Membership::refresh`] first, but the gate does not rely on it: a stale
//! active record past its end date is still judged expired.

use chrono::{DateTime, Utc};
use serde::Serialize;

use legitech_core::Role;

use crate::membership::Membership;

/// Verdict of the entitlement gate for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entitlement {
    /// No valid session. Denied, redirect to login.
    Unauthenticated,
    /// Valid session, no membership record. Denied, redirect to pricing.
    NoMembership,
    /// Valid session with a membership current at evaluation time. Granted.
    ActiveMember,
    /// Valid session whose membership has lapsed. Denied, redirect to
    /// pricing.
    ExpiredMember,
    /// Admin session. Granted regardless of membership state.
    AdminOverride,
}

impl Entitlement {
    /// Whether this verdict grants access to gated content.
    pub fn grants_access(&self) -> bool {
        matches!(self, Entitlement::ActiveMember | Entitlement::AdminOverride)
    }

    /// Where a denied caller should be sent. `None` for granting verdicts.
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Entitlement::Unauthenticated => Some("/login"),
            Entitlement::NoMembership | Entitlement::ExpiredMember => Some("/pricing"),
            Entitlement::ActiveMember | Entitlement::AdminOverride => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Entitlement::Unauthenticated => "unauthenticated",
            Entitlement::NoMembership => "no_membership",
            Entitlement::ActiveMember => "active_member",
            Entitlement::ExpiredMember => "expired_member",
            Entitlement::AdminOverride => "admin_override",
        }
    }
}

impl std::fmt::Display for Entitlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate the gate for a caller.
///
/// `role` is `None` when the request carried no valid session. The admin
/// override is checked before membership, so an admin with an expired (or
/// absent) membership is still granted access.
pub fn evaluate(
    role: Option<Role>,
    membership: Option<&Membership>,
    now: DateTime<Utc>,
) -> Entitlement {
    let role = match role {
        None => return Entitlement::Unauthenticated,
        Some(role) => role,
    };
    if role == Role::Admin {
        return Entitlement::AdminOverride;
    }
    match membership {
        None => Entitlement::NoMembership,
        Some(m) if m.is_current(now) => Entitlement::ActiveMember,
        Some(_) => Entitlement::ExpiredMember,
    }
}
