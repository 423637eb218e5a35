//! Membership records.
//!
//! Each user holds at most one membership. Registration grants a free
//! 30-day trial; activation upserts an annual membership in place. The
//! stored status is allowed to lag reality: nothing flips `active` to
//! `expired` when the clock passes the end date. The first read afterwards
//! calls [`Membership::refresh`] and persists the transition.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use legitech_core::UserId;

/// Trial memberships granted at registration run this many days.
pub const TRIAL_DAYS: i64 = 30;

/// Annual memberships run this many days from activation.
pub const ANNUAL_DAYS: i64 = 365;

/// Commercial tier of a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    /// Trial tier granted at registration.
    Free,
    /// Paid tier, one year per activation.
    #[default]
    Annual,
}

impl MembershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::Free => "free",
            MembershipType::Annual => "annual",
        }
    }

    fn period(&self) -> Duration {
        match self {
            MembershipType::Free => Duration::days(TRIAL_DAYS),
            MembershipType::Annual => Duration::days(ANNUAL_DAYS),
        }
    }
}

impl std::fmt::Display for MembershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored lifecycle state of a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Expired,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's membership record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub membership_type: MembershipType,
    pub status: MembershipStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Membership {
    /// Free trial granted at registration, active for 30 days from `now`.
    pub fn trial(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self::activate(user_id, MembershipType::Free, now)
    }

    /// Activate (or re-activate) a membership of the given tier starting at
    /// `now`. Replaces whatever record the user held before: activation
    /// after expiry starts a fresh period rather than extending the old one.
    pub fn activate(user_id: UserId, membership_type: MembershipType, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            membership_type,
            status: MembershipStatus::Active,
            start_date: now,
            end_date: now + membership_type.period(),
        }
    }

    /// Whether the membership grants access at `now`.
    ///
    /// Both conditions must hold: the stored status is `active` and the end
    /// date is still in the future. A record whose status lags (active but
    /// past its end date) does not grant access.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.status == MembershipStatus::Active && now < self.end_date
    }

    /// Apply lazy expiry. Returns `true` if the record transitioned and the
    /// caller must persist it. Idempotent: a second refresh at the same
    /// instant reports no transition.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == MembershipStatus::Active && now >= self.end_date {
            self.status = MembershipStatus::Expired;
            return true;
        }
        false
    }
}
